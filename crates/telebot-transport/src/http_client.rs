//! HTTP transport implementation.
//!
//! | Operation | Verb | URL | Body |
//! |-----------|------|-----|------|
//! | API call | POST | `<api_url>/<prefix>bot<token>/<method>` | JSON or streamed multipart |
//! | File download | GET | `<api_url>/file/<prefix>bot<token>/<path>` | none |
//!
//! The HTTP status of an API call is not interpreted: the remote API answers
//! failures with 4xx statuses *and* a JSON envelope, which the caller
//! decodes. Only downloads, which have no envelope, map non-2xx statuses to
//! [`TransportError::Status`].

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, ClientBuilder};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, trace};

use telebot_core::codec::{EncodedBody, MultipartForm, PartBody};
use telebot_core::file::FileSource;
use telebot_core::{
    ByteStream, HttpClientConfig, InputFile, Transport, TransportError, TransportResult,
};

/// Maximum number of response body bytes kept in a status error.
const MAX_ERROR_BODY: usize = 512;

/// [`Transport`] over HTTP, built on a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpClientConfig,
}

impl HttpTransport {
    /// Creates a transport for the given endpoint configuration.
    pub fn new(config: HttpClientConfig) -> TransportResult<Self> {
        if config.token.is_empty() {
            return Err(TransportError::InvalidConfig("bot token is empty".into()));
        }
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::InvalidConfig(e.to_string()))?;

        info!(api_url = %config.api_url, timeout = ?config.timeout, "HTTP transport ready");
        Ok(Self { client, config })
    }

    /// Returns the endpoint configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Maps a request failure, keeping the token out of the message.
    fn request_error(&self, target: &str, err: reqwest::Error) -> TransportError {
        let err = err.without_url();
        if err.is_connect() || err.is_timeout() {
            TransportError::ConnectionFailed {
                url: format!("{}/…/{}", self.config.api_url, target),
                reason: err.to_string(),
            }
        } else {
            TransportError::Io(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, method: &str, body: EncodedBody) -> TransportResult<Vec<u8>> {
        let request = self.client.post(self.config.method_url(method));
        let request = match body {
            EncodedBody::Json(bytes) => {
                trace!(method, len = bytes.len(), "Sending JSON request");
                request.header(CONTENT_TYPE, "application/json").body(bytes)
            }
            EncodedBody::Multipart(form) => {
                trace!(method, parts = form.parts().len(), "Sending multipart request");
                request.multipart(build_form(form).await?)
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| self.request_error(method, e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.request_error(method, e))?;

        debug!(method, status = status.as_u16(), len = bytes.len(), "API response received");
        Ok(bytes.to_vec())
    }

    async fn download(&self, file_path: &str) -> TransportResult<ByteStream> {
        let response = self
            .client
            .get(self.config.file_url(file_path))
            .send()
            .await
            .map_err(|e| self.request_error(file_path, e))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let mut end = MAX_ERROR_BODY;
                while !body.is_char_boundary(end) {
                    end -= 1;
                }
                body.truncate(end);
            }
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(file_path, "Streaming file download");
        Ok(response
            .bytes_stream()
            .map_err(|e| TransportError::Io(e.without_url().to_string()))
            .boxed())
    }
}

/// Renders an encoded form as a `reqwest` form, opening file sources.
async fn build_form(form: MultipartForm) -> TransportResult<Form> {
    let mut rendered = Form::new();
    for part in form.into_parts() {
        let body = match part.body {
            PartBody::Text(text) => Part::text(text),
            PartBody::File(file) => file_part(&file).await?,
        };
        rendered = rendered.part(part.name, body);
    }
    Ok(rendered)
}

async fn file_part(file: &InputFile) -> TransportResult<Part> {
    let mut part = match file.source() {
        FileSource::Memory(bytes) => {
            Part::stream_with_length(Body::from(bytes.clone()), bytes.len() as u64)
        }
        FileSource::Path(path) => {
            let handle = tokio::fs::File::open(path).await?;
            Part::stream(Body::wrap_stream(ReaderStream::new(handle)))
        }
        FileSource::Reader(_) => {
            let reader = file.source().take_reader()?;
            Part::stream(Body::wrap_stream(ReaderStream::new(reader)))
        }
    };
    if let Some(name) = file.name() {
        part = part.file_name(name.to_string());
    }
    if let Some(mime) = file.mime_type() {
        part = part
            .mime_str(mime)
            .map_err(|e| TransportError::InvalidConfig(format!("invalid MIME type '{mime}': {e}")))?;
    }
    Ok(part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use telebot_core::codec::encode;
    use telebot_core::model::{SendDocument, SendMessage};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "123:test";

    fn transport(server: &MockServer) -> HttpTransport {
        HttpTransport::new(HttpClientConfig::new(TOKEN).with_api_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_json_call_posts_to_method_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:test/sendMessage"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
            .expect(1)
            .mount(&server)
            .await;

        let body = encode(&SendMessage::new(1, "hi")).unwrap();
        let bytes = transport(&server).call("sendMessage", body).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["ok"], true);

        let requests = server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent, json!({"chat_id": 1, "text": "hi"}));
    }

    #[tokio::test]
    async fn test_error_status_still_returns_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let body = encode(&SendMessage::new(1, "hi")).unwrap();
        let bytes = transport(&server).call("sendMessage", body).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["error_code"], 400);
    }

    #[tokio::test]
    async fn test_multipart_upload_from_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:test/sendDocument"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("report.txt");
        std::fs::write(&file_path, "quarterly numbers").unwrap();

        let request = SendDocument {
            caption: Some("Q3".into()),
            ..SendDocument::new(9, InputFile::from_path(&file_path))
        };
        let body = encode(&request).unwrap();
        assert!(body.is_streaming());
        transport(&server).call("sendDocument", body).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let content_type = requests[0]
            .headers
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data; boundary="));

        let sent = String::from_utf8_lossy(&requests[0].body);
        assert!(sent.contains(r#"name="chat_id""#));
        assert!(sent.contains(r#"filename="report.txt""#));
        assert!(sent.contains("Content-Type: text/plain"));
        assert!(sent.contains("quarterly numbers"));
        assert!(sent.contains("Q3"));
    }

    #[tokio::test]
    async fn test_reader_payload_cannot_be_sent_twice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let file = InputFile::from_reader(&b"voice bytes"[..]).with_name("note.ogg");
        let request = SendDocument::new(9, file);
        let transport = transport(&server);

        let first = encode(&request).unwrap();
        transport.call("sendDocument", first).await.unwrap();

        let second = encode(&request).unwrap();
        let err = transport.call("sendDocument", second).await.unwrap_err();
        assert!(matches!(err, TransportError::StreamConsumed));
    }

    #[tokio::test]
    async fn test_download_streams_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/file/bot123:test/documents/file_1.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"hello file".to_vec()))
            .mount(&server)
            .await;

        let stream = transport(&server)
            .download("documents/file_1.txt")
            .await
            .unwrap();
        let chunks: Vec<_> = stream.try_collect().await.unwrap();
        assert_eq!(chunks.concat(), b"hello file".to_vec());
    }

    #[tokio::test]
    async fn test_download_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let err = transport(&server).download("missing").await.err().unwrap();
        assert!(matches!(
            err,
            TransportError::Status { status: 404, ref body } if body == "Not Found"
        ));
    }

    #[tokio::test]
    async fn test_connection_failure_hides_token() {
        let config = HttpClientConfig::new(TOKEN).with_api_url("http://127.0.0.1:1");
        let transport = HttpTransport::new(config).unwrap();

        let body = encode(&SendMessage::new(1, "hi")).unwrap();
        let err = transport.call("sendMessage", body).await.unwrap_err();
        assert!(matches!(err, TransportError::ConnectionFailed { .. }));
        assert!(!err.to_string().contains(TOKEN));
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let err = HttpTransport::new(HttpClientConfig::new("")).unwrap_err();
        assert!(matches!(err, TransportError::InvalidConfig(_)));
    }
}
