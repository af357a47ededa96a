//! In-memory transport double shared by the framework tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use parking_lot::Mutex;
use serde_json::{Map, Value, json};

use telebot_core::codec::{EncodedBody, PartBody};
use telebot_core::model::Update;
use telebot_core::{ByteStream, Transport, TransportError, TransportResult};

/// Chat id used by [`message_json`].
pub const CHAT_ID: i64 = 100;

/// One request seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub body: EncodedBody,
}

impl Recorded {
    /// Request parameters as a JSON object. Multipart text parts are parsed
    /// as JSON where possible and file parts render as `<file NAME>`.
    pub fn params(&self) -> Value {
        match &self.body {
            EncodedBody::Json(bytes) => serde_json::from_slice(bytes).unwrap(),
            EncodedBody::Multipart(form) => {
                let mut map = Map::new();
                for part in form.parts() {
                    let value = match &part.body {
                        PartBody::Text(text) => serde_json::from_str(text)
                            .unwrap_or_else(|_| Value::String(text.clone())),
                        PartBody::File(file) => {
                            Value::String(format!("<file {}>", file.name().unwrap_or_default()))
                        }
                    };
                    map.insert(part.name.clone(), value);
                }
                Value::Object(map)
            }
        }
    }
}

/// A scripted [`Transport`].
///
/// Each call first consumes the next envelope queued with
/// [`enqueue`](Self::enqueue) for its method, then falls back to the fixed
/// envelope set with [`respond`](Self::respond), then to
/// `{"ok": true, "result": true}`.
#[derive(Default)]
pub struct MockTransport {
    queued: Mutex<HashMap<String, VecDeque<Value>>>,
    fixed: Mutex<HashMap<String, Value>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<Recorded>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: &str, envelope: Value) {
        self.fixed.lock().insert(method.to_string(), envelope);
    }

    pub fn enqueue(&self, method: &str, envelope: Value) {
        self.queued
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(envelope);
    }

    pub fn add_file(&self, path: &str, data: &[u8]) {
        self.files.lock().insert(path.to_string(), data.to_vec());
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().clone()
    }

    /// Parameters of every call to `method`, in call order.
    pub fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.method == method)
            .map(Recorded::params)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, method: &str, body: EncodedBody) -> TransportResult<Vec<u8>> {
        self.calls.lock().push(Recorded {
            method: method.to_string(),
            body,
        });
        let queued = self
            .queued
            .lock()
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        let envelope = queued
            .or_else(|| self.fixed.lock().get(method).cloned())
            .unwrap_or_else(|| json!({"ok": true, "result": true}));
        serde_json::to_vec(&envelope).map_err(|err| TransportError::Io(err.to_string()))
    }

    async fn download(&self, file_path: &str) -> TransportResult<ByteStream> {
        match self.files.lock().get(file_path) {
            Some(data) => {
                let chunk: TransportResult<Bytes> = Ok(Bytes::from(data.clone()));
                Ok(futures::stream::iter(vec![chunk]).boxed())
            }
            None => Err(TransportError::Status {
                status: 404,
                body: "Not Found".into(),
            }),
        }
    }
}

/// A message from `sender` in chat [`CHAT_ID`]. With `command_len`, the
/// text starts with a bot command entity of that length.
pub fn message_json(message_id: i64, sender: i64, text: &str, command_len: Option<usize>) -> Value {
    let entities: Vec<Value> = command_len
        .map(|length| json!({"type": "bot_command", "offset": 0, "length": length}))
        .into_iter()
        .collect();
    json!({
        "message_id": message_id,
        "from": {"id": sender, "first_name": "Tester"},
        "date": 1_700_000_000,
        "chat": {"id": CHAT_ID, "type": "private"},
        "text": text,
        "entities": entities
    })
}

pub fn update(value: Value) -> Update {
    serde_json::from_value(value).unwrap()
}

pub fn message_update(update_id: i64, sender: i64, text: &str, command_len: Option<usize>) -> Update {
    update(json!({
        "update_id": update_id,
        "message": message_json(update_id, sender, text, command_len)
    }))
}
