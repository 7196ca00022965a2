//! # Response Envelope
//!
//! Every backend response arrives as `{code, message, data}`. Code 200 is
//! the only success; any other code, or a body that does not parse, is a
//! failure with a displayable message.

use serde::{Deserialize, Serialize};

use domains::{Error, Result};

/// The envelope code signalling success.
pub const SUCCESS_CODE: i32 = 200;

/// Generic wrapper around every backend payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de>"
))]
pub struct Envelope<T> {
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// A successful envelope carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: None,
            data: Some(data),
        }
    }

    /// A failure envelope with a business code and message.
    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Unwraps the envelope, mapping any non-200 code to [`Error::Api`].
    pub fn into_data(self) -> Result<Option<T>> {
        if self.code == SUCCESS_CODE {
            Ok(self.data)
        } else {
            Err(Error::Api {
                code: self.code,
                message: self
                    .message
                    .unwrap_or_else(|| "request failed".to_string()),
            })
        }
    }

    /// Like [`Envelope::into_data`] but treats a missing payload on a
    /// successful envelope as a decode failure.
    pub fn require_data(self) -> Result<T> {
        self.into_data()?
            .ok_or_else(|| Error::Decode("successful response carried no data".to_string()))
    }

    /// For endpoints whose payload is void: only the code matters.
    pub fn ack(self) -> Result<()> {
        self.into_data().map(|_| ())
    }
}

/// An envelope with no meaningful payload (like, delete, report acks).
pub type VoidEnvelope = Envelope<serde_json::Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_code_unwraps_data() {
        let envelope: Envelope<i32> = serde_json::from_str(r#"{"code":200,"data":5}"#).unwrap();
        assert_eq!(envelope.require_data().unwrap(), 5);
    }

    #[test]
    fn business_failure_surfaces_code_and_message() {
        let envelope: Envelope<i32> =
            serde_json::from_str(r#"{"code":403,"message":"not your post"}"#).unwrap();
        let err = envelope.require_data().unwrap_err();
        assert_eq!(
            err,
            Error::Api {
                code: 403,
                message: "not your post".to_string()
            }
        );
    }

    #[test]
    fn failure_without_a_message_still_displays_something() {
        let envelope: Envelope<i32> = serde_json::from_str(r#"{"code":500}"#).unwrap();
        match envelope.into_data().unwrap_err() {
            Error::Api { code, message } => {
                assert_eq!(code, 500);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn void_ack_ignores_whatever_data_holds() {
        let envelope: VoidEnvelope = serde_json::from_str(r#"{"code":200,"data":null}"#).unwrap();
        assert!(envelope.ack().is_ok());
    }

    #[test]
    fn missing_data_on_success_is_a_decode_error() {
        let envelope: Envelope<i32> = serde_json::from_str(r#"{"code":200}"#).unwrap();
        assert!(matches!(
            envelope.require_data().unwrap_err(),
            Error::Decode(_)
        ));
    }
}
