//! Network transport for the telebot client.
//!
//! Implements the [`Transport`](telebot_core::Transport) seam over HTTP.
//!
//! # Features
//!
//! - `http-client` (default): [`HttpTransport`], built on `reqwest`
//!
//! # Example
//!
//! ```rust,ignore
//! use telebot_core::HttpClientConfig;
//! use telebot_transport::HttpTransport;
//!
//! let transport = HttpTransport::new(HttpClientConfig::new(token))?;
//! ```

#[cfg(feature = "http-client")]
pub mod http_client;

#[cfg(feature = "http-client")]
pub use http_client::HttpTransport;
