//! Request encoder.
//!
//! [`encode`] turns a [`Record`] into an [`EncodedBody`]. The choice of wire
//! format is all-or-nothing and is made by a pre-pass over the record's
//! field graph:
//!
//! - no file payload anywhere: one JSON document, keys in declaration order;
//! - a file payload anywhere: a multipart form with one part per top-level
//!   field.
//!
//! In multipart mode scalars use their natural string form, nested records
//! and lists are each JSON-encoded into a single string, and top-level file
//! fields become file parts. A file nested inside a record or list is
//! replaced in that JSON string by `attach://<field>_attach_<n>` and sent as
//! an extra part of that name after the top-level parts.

use serde_json::{Map, Number, Value};
use tracing::trace;

use crate::error::{EncodeError, EncodeResult};
use crate::file::InputFile;
use crate::record::{Field, FieldValue, Record, Scalar};

// =============================================================================
// Encoded Body
// =============================================================================

/// An encoded request body.
#[derive(Debug, Clone)]
pub enum EncodedBody {
    /// A serialized JSON document.
    Json(Vec<u8>),
    /// A multipart form, sent with streaming upload semantics.
    Multipart(MultipartForm),
}

impl EncodedBody {
    /// Returns the content type of the body.
    ///
    /// For multipart bodies the boundary parameter is added by the
    /// transport that renders the form.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) => "application/json",
            Self::Multipart(_) => "multipart/form-data",
        }
    }

    /// Returns `true` if the body must be uploaded as a stream rather than
    /// as a pre-sized buffer.
    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    /// Returns the JSON bytes, if this is a JSON body.
    pub fn as_json(&self) -> Option<&[u8]> {
        match self {
            Self::Json(bytes) => Some(bytes),
            Self::Multipart(_) => None,
        }
    }

    /// Returns the form, if this is a multipart body.
    pub fn as_multipart(&self) -> Option<&MultipartForm> {
        match self {
            Self::Json(_) => None,
            Self::Multipart(form) => Some(form),
        }
    }
}

/// An ordered list of form parts.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

impl MultipartForm {
    /// Returns the parts in emission order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Consumes the form, returning its parts.
    pub fn into_parts(self) -> Vec<Part> {
        self.parts
    }

    /// Returns the text value of the part named `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.body {
            PartBody::Text(text) if part.name == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns the file of the part named `name`.
    pub fn file(&self, name: &str) -> Option<&InputFile> {
        self.parts.iter().find_map(|part| match &part.body {
            PartBody::File(file) if part.name == name => Some(file),
            _ => None,
        })
    }

    fn push(&mut self, name: impl Into<String>, body: PartBody) {
        self.parts.push(Part {
            name: name.into(),
            body,
        });
    }
}

/// One named part of a multipart form.
#[derive(Debug, Clone)]
pub struct Part {
    /// The `name=` of the content disposition.
    pub name: String,
    /// The part body.
    pub body: PartBody,
}

/// The body of a form part.
#[derive(Debug, Clone)]
pub enum PartBody {
    /// A flattened string value.
    Text(String),
    /// A file payload, with its name and MIME type.
    File(InputFile),
}

// =============================================================================
// Encoding
// =============================================================================

/// Encodes a record as JSON, or as multipart if it holds a file anywhere.
pub fn encode(record: &dyn Record) -> EncodeResult<EncodedBody> {
    let fields = record.fields();
    if let Some(field) = fields.iter().find(|field| field.value.contains_file()) {
        trace!(field = field.name, "File payload present, encoding as multipart");
        encode_multipart(&fields).map(EncodedBody::Multipart)
    } else {
        encode_json(&fields).map(EncodedBody::Json)
    }
}

fn encode_json(fields: &[Field<'_>]) -> EncodeResult<Vec<u8>> {
    let mut attachments = Attachments::default();
    let object = fields_to_json(fields, &mut attachments)?;
    Ok(serde_json::to_vec(&object)?)
}

fn encode_multipart(fields: &[Field<'_>]) -> EncodeResult<MultipartForm> {
    let mut form = MultipartForm::default();
    let mut attachments = Attachments::default();

    for field in fields {
        let body = match &field.value {
            FieldValue::File(file) => PartBody::File((*file).clone()),
            FieldValue::Scalar(scalar) => PartBody::Text(scalar_to_string(field.name, *scalar)?),
            FieldValue::Raw(Value::String(text)) => PartBody::Text(text.clone()),
            FieldValue::Raw(value) => PartBody::Text(serde_json::to_string(value)?),
            FieldValue::Record(_) | FieldValue::List(_) => {
                attachments.field = field.name;
                let value = value_to_json(field.name, &field.value, &mut attachments)?;
                PartBody::Text(serde_json::to_string(&value)?)
            }
        };
        form.push(field.name, body);
    }

    for (name, file) in attachments.files {
        form.push(name, PartBody::File(file));
    }
    Ok(form)
}

/// Files found below a top-level field, collected as extra parts.
#[derive(Default)]
struct Attachments {
    field: &'static str,
    files: Vec<(String, InputFile)>,
}

impl Attachments {
    fn attach(&mut self, file: &InputFile) -> String {
        let name = format!("{}_attach_{}", self.field, self.files.len());
        let reference = format!("attach://{name}");
        self.files.push((name, file.clone()));
        reference
    }
}

fn fields_to_json(fields: &[Field<'_>], attachments: &mut Attachments) -> EncodeResult<Value> {
    let mut object = Map::with_capacity(fields.len());
    for field in fields {
        object.insert(
            field.name.to_string(),
            value_to_json(field.name, &field.value, attachments)?,
        );
    }
    Ok(Value::Object(object))
}

fn value_to_json(
    name: &'static str,
    value: &FieldValue<'_>,
    attachments: &mut Attachments,
) -> EncodeResult<Value> {
    match value {
        FieldValue::Scalar(Scalar::Str(text)) => Ok(Value::String((*text).to_string())),
        FieldValue::Scalar(Scalar::Int(int)) => Ok(Value::from(*int)),
        FieldValue::Scalar(Scalar::Float(float)) => finite(name, *float).map(Value::Number),
        FieldValue::Scalar(Scalar::Bool(flag)) => Ok(Value::Bool(*flag)),
        FieldValue::Raw(raw) => Ok((*raw).clone()),
        FieldValue::Record(record) => fields_to_json(&record.fields(), attachments),
        FieldValue::List(items) => items
            .iter()
            .map(|item| value_to_json(name, item, attachments))
            .collect::<EncodeResult<Vec<_>>>()
            .map(Value::Array),
        FieldValue::File(file) => Ok(Value::String(attachments.attach(file))),
    }
}

fn scalar_to_string(name: &'static str, scalar: Scalar<'_>) -> EncodeResult<String> {
    Ok(match scalar {
        Scalar::Str(text) => text.to_string(),
        Scalar::Int(int) => int.to_string(),
        Scalar::Float(float) => finite(name, float)?.to_string(),
        Scalar::Bool(flag) => flag.to_string(),
    })
}

fn finite(name: &'static str, float: f64) -> EncodeResult<Number> {
    Number::from_f64(float).ok_or_else(|| EncodeError::NonFiniteFloat {
        field: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use crate::record::ToField;

    record! {
        #[derive(Debug, Clone, Default)]
        struct Button {
            text: String,
            url: Option<String>,
        }
    }

    #[derive(Debug, Clone)]
    enum Media {
        Upload(InputFile),
        Existing(String),
    }

    impl ToField for Media {
        fn to_field(&self) -> Option<FieldValue<'_>> {
            match self {
                Self::Upload(file) => file.to_field(),
                Self::Existing(id) => id.to_field(),
            }
        }
    }

    record! {
        #[derive(Debug, Clone)]
        struct Post {
            chat_id: i64,
            media: Option<Media>,
            caption: Option<String>,
            rows: Option<Vec<Vec<Button>>>,
            latitude: Option<f64>,
            silent: Option<bool>,
        }
    }

    fn post() -> Post {
        Post {
            chat_id: 7,
            media: None,
            caption: None,
            rows: None,
            latitude: None,
            silent: None,
        }
    }

    fn upload() -> InputFile {
        InputFile::from_bytes("cat.png", b"png".to_vec())
    }

    fn parse(body: &EncodedBody) -> Value {
        serde_json::from_slice(body.as_json().expect("json body")).expect("valid json")
    }

    #[test]
    fn test_plain_record_encodes_as_json_in_order() {
        let record = Post {
            silent: Some(false),
            caption: Some("hi".into()),
            rows: Some(vec![vec![Button {
                text: "a".into(),
                url: None,
            }]]),
            ..post()
        };
        let body = encode(&record).unwrap();

        assert_eq!(body.content_type(), "application/json");
        assert!(!body.is_streaming());
        let text = std::str::from_utf8(body.as_json().unwrap()).unwrap();
        assert_eq!(
            text,
            r#"{"chat_id":7,"caption":"hi","rows":[[{"text":"a"}]],"silent":false}"#
        );
    }

    #[test]
    fn test_union_holding_id_stays_json() {
        let record = Post {
            media: Some(Media::Existing("AgAD".into())),
            ..post()
        };
        let body = encode(&record).unwrap();
        assert_eq!(parse(&body)["media"], "AgAD");
    }

    #[test]
    fn test_union_holding_file_switches_to_multipart() {
        let record = Post {
            media: Some(Media::Upload(upload())),
            caption: Some("look".into()),
            latitude: Some(1.5),
            silent: Some(true),
            ..post()
        };
        let body = encode(&record).unwrap();

        assert_eq!(body.content_type(), "multipart/form-data");
        assert!(body.is_streaming());
        let form = body.as_multipart().unwrap();
        let names: Vec<_> = form.parts().iter().map(|part| part.name.as_str()).collect();
        assert_eq!(names, vec!["chat_id", "media", "caption", "latitude", "silent"]);
        assert_eq!(form.text("chat_id"), Some("7"));
        assert_eq!(form.text("latitude"), Some("1.5"));
        assert_eq!(form.text("silent"), Some("true"));
        assert_eq!(form.file("media").and_then(InputFile::name), Some("cat.png"));
    }

    #[test]
    fn test_multipart_nested_fields_are_json_strings() {
        let rows = vec![vec![
            Button {
                text: "open".into(),
                url: Some("https://example.org".into()),
            },
            Button {
                text: "close".into(),
                url: None,
            },
        ]];
        let record = Post {
            media: Some(Media::Upload(upload())),
            rows: Some(rows),
            ..post()
        };
        let body = encode(&record).unwrap();
        let form = body.as_multipart().unwrap();

        let reparsed: Value = serde_json::from_str(form.text("rows").unwrap()).unwrap();
        assert_eq!(
            reparsed,
            serde_json::json!([[{"text": "open", "url": "https://example.org"}, {"text": "close"}]])
        );
    }

    #[test]
    fn test_nested_file_becomes_attachment_part() {
        record! {
            struct Item {
                kind: String => "type",
                media: InputFile,
            }
        }
        record! {
            struct Group {
                chat_id: i64,
                media: Vec<Item>,
            }
        }

        let record = Group {
            chat_id: 1,
            media: vec![
                Item {
                    kind: "photo".into(),
                    media: upload(),
                },
                Item {
                    kind: "photo".into(),
                    media: InputFile::from_bytes("dog.jpg", b"jpg".to_vec()),
                },
            ],
        };
        let body = encode(&record).unwrap();
        let form = body.as_multipart().unwrap();

        let names: Vec<_> = form.parts().iter().map(|part| part.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["chat_id", "media", "media_attach_0", "media_attach_1"]
        );
        let reparsed: Value = serde_json::from_str(form.text("media").unwrap()).unwrap();
        assert_eq!(reparsed[0]["media"], "attach://media_attach_0");
        assert_eq!(reparsed[1]["type"], "photo");
        assert_eq!(
            form.file("media_attach_1").and_then(InputFile::name),
            Some("dog.jpg")
        );
    }

    #[test]
    fn test_explicit_default_values_are_emitted() {
        let record = Post {
            caption: Some(String::new()),
            silent: Some(false),
            ..post()
        };
        let value = parse(&encode(&record).unwrap());
        assert_eq!(value["caption"], "");
        assert_eq!(value["silent"], false);
        assert!(value.get("latitude").is_none());
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let record = Post {
            latitude: Some(f64::NAN),
            ..post()
        };
        let err = encode(&record).unwrap_err();
        assert!(matches!(err, EncodeError::NonFiniteFloat { ref field } if field == "latitude"));

        let record = Post {
            media: Some(Media::Upload(upload())),
            latitude: Some(f64::INFINITY),
            ..post()
        };
        assert!(encode(&record).is_err());
    }
}
