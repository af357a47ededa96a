//! Result projection.
//!
//! [`project`] turns a decoded [`Envelope`] into the typed outcome of a call.
//! A failed envelope always becomes [`ApiError::Remote`]; a successful one
//! without a result always becomes [`Reply::Confirmed`]; otherwise the
//! per-call success factory decides.
//!
//! The factories in this module cover every shape the API returns:
//!
//! | Factory | Result |
//! |---------|--------|
//! | [`typed`] | a record, a list of records, or a bare integer |
//! | [`flag`] | a confirmation only |
//! | [`entity_or_confirmed`] | a record, or a confirmation when the result is empty (edit calls) |

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::decode::Envelope;
use crate::error::{ApiError, ApiResult};

/// The successful outcome of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    /// The call succeeded without a payload.
    Confirmed,
    /// The call returned a payload.
    Payload(T),
}

impl<T> Reply<T> {
    /// Returns `true` for [`Reply::Confirmed`].
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    /// Returns the payload, if any.
    pub fn payload(self) -> Option<T> {
        match self {
            Self::Confirmed => None,
            Self::Payload(value) => Some(value),
        }
    }

    /// Returns the payload, or [`ApiError::MissingResult`] for a bare
    /// confirmation.
    pub fn into_payload(self, method: &str) -> ApiResult<T> {
        self.payload().ok_or_else(|| ApiError::MissingResult {
            method: method.to_string(),
        })
    }
}

/// Projects an envelope into a typed reply.
pub fn project<T, F>(envelope: Envelope, factory: F) -> ApiResult<Reply<T>>
where
    F: FnOnce(Value) -> ApiResult<Reply<T>>,
{
    if !envelope.ok {
        return Err(ApiError::Remote {
            code: envelope.error_code.unwrap_or_default(),
            description: envelope.description.unwrap_or_default(),
        });
    }
    match envelope.result {
        None => Ok(Reply::Confirmed),
        Some(result) => factory(result),
    }
}

/// Deserializes the result as `T`.
pub fn typed<T: DeserializeOwned>(result: Value) -> ApiResult<Reply<T>> {
    serde_json::from_value(result)
        .map(Reply::Payload)
        .map_err(|err| ApiError::MalformedResponse(err.to_string()))
}

/// Discards the result, confirming success.
pub fn flag(_result: Value) -> ApiResult<Reply<bool>> {
    Ok(Reply::Confirmed)
}

/// Deserializes the result as `T`, unless it is an empty value such as
/// `true`, in which case the call is only confirmed.
pub fn entity_or_confirmed<T: DeserializeOwned>(result: Value) -> ApiResult<Reply<T>> {
    let empty = match &result {
        Value::Null | Value::Bool(_) => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        Ok(Reply::Confirmed)
    } else {
        typed(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        id: i64,
    }

    fn ok(result: Option<Value>) -> Envelope {
        Envelope {
            ok: true,
            result,
            ..Envelope::default()
        }
    }

    #[test]
    fn test_absent_result_is_confirmed_for_every_factory() {
        assert!(project(ok(None), typed::<Item>).unwrap().is_confirmed());
        assert!(project(ok(None), typed::<Vec<Item>>).unwrap().is_confirmed());
        assert!(project(ok(None), flag).unwrap().is_confirmed());
        assert!(project(ok(None), entity_or_confirmed::<Item>).unwrap().is_confirmed());
    }

    #[test]
    fn test_failed_envelope_is_remote_error() {
        let envelope = Envelope {
            ok: false,
            result: Some(json!({"id": 1})),
            description: Some("x".into()),
            error_code: Some(32),
        };
        let err = project(envelope, typed::<Item>).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Remote { code: 32, ref description } if description == "x"
        ));
    }

    #[test]
    fn test_typed_factories() {
        let reply = project(ok(Some(json!({"id": 5}))), typed::<Item>).unwrap();
        assert_eq!(reply, Reply::Payload(Item { id: 5 }));

        let reply = project(ok(Some(json!([{"id": 1}, {"id": 2}]))), typed::<Vec<Item>>).unwrap();
        assert_eq!(reply.payload().map(|items| items.len()), Some(2));

        let reply = project(ok(Some(json!(12))), typed::<i64>).unwrap();
        assert_eq!(reply.into_payload("getChatMembersCount").unwrap(), 12);
    }

    #[test]
    fn test_typed_mismatch_is_malformed() {
        let err = project(ok(Some(json!("nope"))), typed::<Item>).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn test_entity_or_confirmed() {
        let reply = project(ok(Some(json!(true))), entity_or_confirmed::<Item>).unwrap();
        assert!(reply.is_confirmed());

        let reply = project(ok(Some(json!({"id": 9}))), entity_or_confirmed::<Item>).unwrap();
        assert_eq!(reply, Reply::Payload(Item { id: 9 }));
    }

    #[test]
    fn test_confirmed_into_payload_is_missing_result() {
        let err = Reply::<Item>::Confirmed.into_payload("getMe").unwrap_err();
        assert!(matches!(err, ApiError::MissingResult { ref method } if method == "getMe"));
    }
}
