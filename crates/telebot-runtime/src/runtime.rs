//! Process lifecycle for a polling bot.
//!
//! [`TelebotRuntime`] ties the pieces together: it loads and validates
//! configuration, installs logging, builds the HTTP transport and the
//! [`Bot`], and then drives a [`Poller`] until the process is asked to stop.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use telebot_runtime::TelebotRuntime;
//!
//! let runtime = TelebotRuntime::builder()
//!     .config_file("config/telebot.toml")
//!     .build()?;
//!
//! runtime.bot().register_command("ping", ping);
//! runtime.run().await?;
//! ```
//!
//! # Shutdown
//!
//! [`TelebotRuntime::run`] stops on Ctrl+C or SIGTERM. Shutdown is
//! cooperative: the poll in flight is allowed to finish, the cursor is not
//! advanced further, and handlers already spawned keep running on the
//! executor.

use std::future::Future;
use std::sync::Arc;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use telebot_core::Transport;
use telebot_framework::{Bot, Poller};
use telebot_transport::HttpTransport;

use crate::config::{ConfigLoader, TelebotConfig, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// A configured bot plus the loop that feeds it updates.
pub struct TelebotRuntime {
    config: TelebotConfig,
    bot: Bot,
    shutdown: CancellationToken,
}

impl TelebotRuntime {
    /// Creates a runtime builder.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from already-loaded configuration.
    ///
    /// Validates `config`, initializes logging from it and builds the HTTP
    /// transport.
    pub fn from_config(config: TelebotConfig) -> RuntimeResult<Self> {
        validate_config(&config)?;
        logging::init_from_config(&config.logging);

        let transport = HttpTransport::new(config.bot.to_client_config())?;
        info!(
            api_url = %config.bot.api_url,
            poll_timeout = config.polling.timeout_secs,
            "Telebot runtime configured"
        );
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a runtime over a caller-supplied transport.
    ///
    /// Neither validation nor logging setup happens here.
    pub fn with_transport(config: TelebotConfig, transport: Arc<dyn Transport>) -> Self {
        let bot = Bot::with_settings(transport, config.bot_settings());
        Self {
            config,
            bot,
            shutdown: CancellationToken::new(),
        }
    }

    /// Returns the effective configuration.
    pub fn config(&self) -> &TelebotConfig {
        &self.config
    }

    /// Returns the bot, for handler registration.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Asks every running poll loop of this runtime to stop.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Runs until Ctrl+C or SIGTERM.
    pub async fn run(&self) -> RuntimeResult<()> {
        self.run_until(wait_for_shutdown()).await
    }

    /// Runs until `shutdown` completes, [`shutdown`](Self::shutdown) is
    /// called, or polling gives up.
    pub async fn run_until<F>(&self, shutdown: F) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        let mut poller = Poller::start(self.bot.clone(), self.config.polling.to_poll_settings())
            .await
            .map_err(RuntimeError::Startup)?;

        let cancel = self.shutdown.child_token();
        let polling = poller.run(cancel.clone());
        tokio::pin!(polling);

        info!("Telebot runtime is running. Press Ctrl+C to stop.");
        tokio::select! {
            biased;
            _ = shutdown => {
                info!("Shutdown requested, finishing the current poll");
                cancel.cancel();
            }
            result = &mut polling => {
                return result.map_err(RuntimeError::Polling);
            }
        }

        polling.await.map_err(RuntimeError::Polling)?;
        info!("Telebot runtime stopped");
        Ok(())
    }
}

impl std::fmt::Debug for TelebotRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelebotRuntime")
            .field("config", &self.config)
            .field("bot", &self.bot)
            .field("shutdown", &self.shutdown.is_cancelled())
            .finish()
    }
}

/// Waits for Ctrl+C or, on Unix, SIGTERM.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c() => {}
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
                }
                return;
            }
            Err(err) => warn!(error = %err, "Failed to install SIGTERM handler"),
        }
    }

    ctrl_c().await;
}

async fn ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(err) => {
            error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for [`TelebotRuntime`] over a [`ConfigLoader`].
///
/// ```rust,ignore
/// let runtime = TelebotRuntime::builder()
///     .profile("production")
///     .set("bot.token", token)
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct RuntimeBuilder {
    loader: ConfigLoader,
}

impl RuntimeBuilder {
    /// Creates a builder with default config discovery.
    pub fn new() -> Self {
        Self {
            loader: ConfigLoader::new(),
        }
    }

    /// Loads this config file instead of searching.
    pub fn config_file(mut self, path: impl AsRef<std::path::Path>) -> Self {
        self.loader = self.loader.file(path);
        self
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.loader = self.loader.profile(profile);
        self
    }

    /// Adds a directory to search for config files.
    pub fn search_path(mut self, path: impl AsRef<std::path::Path>) -> Self {
        self.loader = self.loader.search_path(path);
        self
    }

    /// Enables `TELEBOT_*` environment variables (default).
    pub fn with_env(mut self) -> Self {
        self.loader = self.loader.with_env();
        self
    }

    /// Ignores `TELEBOT_*` environment variables.
    pub fn without_env(mut self) -> Self {
        self.loader = self.loader.without_env();
        self
    }

    /// Overrides a single dotted key.
    pub fn set<T: serde::Serialize>(mut self, key: &str, value: T) -> Self {
        self.loader = self.loader.set(key, value);
        self
    }

    /// Loads configuration and builds the runtime.
    pub fn build(self) -> RuntimeResult<TelebotRuntime> {
        let config = self.loader.load()?;
        TelebotRuntime::from_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigError, RetryConfig};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use telebot_core::error::TransportResult;
    use telebot_core::{ByteStream, EncodedBody, TransportError};

    /// Answers every call to a method with one fixed envelope.
    #[derive(Default)]
    struct FixedTransport {
        responses: HashMap<&'static str, serde_json::Value>,
        calls: Mutex<Vec<String>>,
    }

    impl FixedTransport {
        fn new(responses: &[(&'static str, serde_json::Value)]) -> Arc<Self> {
            Arc::new(Self {
                responses: responses.iter().cloned().collect(),
                calls: Mutex::default(),
            })
        }

        fn count(&self, method: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|m| *m == method).count()
        }
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn call(&self, method: &str, _body: EncodedBody) -> TransportResult<Vec<u8>> {
            self.calls.lock().unwrap().push(method.to_string());
            let response = self
                .responses
                .get(method)
                .cloned()
                .unwrap_or_else(|| json!({"ok": true, "result": true}));
            Ok(serde_json::to_vec(&response).unwrap())
        }

        async fn download(&self, file_path: &str) -> TransportResult<ByteStream> {
            Err(TransportError::Status {
                status: 404,
                body: file_path.to_string(),
            })
        }
    }

    fn identity() -> (&'static str, serde_json::Value) {
        ("getMe", json!({"ok": true, "result": {"id": 1, "first_name": "bot"}}))
    }

    fn config() -> TelebotConfig {
        let mut config = TelebotConfig::default();
        config.bot.token = "1:test".into();
        config.polling.retry = RetryConfig {
            max_retries: 0,
            ..RetryConfig::default()
        };
        config
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = TelebotRuntime::from_config(TelebotConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Config(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_bot_settings_follow_config() {
        let mut config = config();
        config.inline.cache_time_secs = 5;
        config.bot.unknown_command_text = "Eh?".into();

        let runtime = TelebotRuntime::with_transport(config, FixedTransport::new(&[]));
        assert_eq!(runtime.bot().settings().inline_cache_time, 5);
        assert_eq!(runtime.bot().settings().unknown_command_text, "Eh?");
    }

    #[tokio::test]
    async fn test_startup_failure() {
        let transport = FixedTransport::new(&[(
            "getMe",
            json!({"ok": false, "error_code": 401, "description": "Unauthorized"}),
        )]);
        let runtime = TelebotRuntime::with_transport(config(), transport.clone());

        let err = runtime.run_until(std::future::pending()).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Startup(_)));
        assert_eq!(err.api_code(), Some(401));
        assert_eq!(transport.count("getUpdates"), 0);
    }

    #[tokio::test]
    async fn test_shutdown_signal_stops_before_polling() {
        let transport = FixedTransport::new(&[identity()]);
        let runtime = TelebotRuntime::with_transport(config(), transport.clone());

        tokio_test::assert_ok!(runtime.run_until(async {}).await);
        assert_eq!(transport.count("getMe"), 1);
        assert_eq!(transport.count("getUpdates"), 0);
    }

    #[tokio::test]
    async fn test_shutdown_handle() {
        let transport = FixedTransport::new(&[identity()]);
        let runtime = TelebotRuntime::with_transport(config(), transport.clone());
        runtime.shutdown();

        tokio_test::assert_ok!(runtime.run_until(std::future::pending()).await);
        assert_eq!(transport.count("getUpdates"), 0);
    }

    #[tokio::test]
    async fn test_polling_gives_up() {
        let transport = FixedTransport::new(&[
            identity(),
            (
                "getUpdates",
                json!({"ok": false, "error_code": 409, "description": "Conflict"}),
            ),
        ]);
        let runtime = TelebotRuntime::with_transport(config(), transport.clone());

        let err = runtime.run_until(std::future::pending()).await.unwrap_err();
        assert!(matches!(err, RuntimeError::Polling(_)));
        assert_eq!(err.api_code(), Some(409));
        assert_eq!(transport.count("getUpdates"), 1);
    }
}
