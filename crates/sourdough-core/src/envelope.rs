//! Uniform response envelope shared by the gateway server and its clients

use serde::{Deserialize, Serialize};

/// `{ success, data?, error?, message? }`
///
/// A successful envelope carries `data` (or only a `message`), a failed one
/// carries `error`. Absent fields are omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Successful envelope carrying only a message
    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
        }
    }

    /// Failed envelope
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }

    /// Convert into a `Result`, keeping the optional payload on success
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "Unknown error".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_are_omitted() {
        let env = Envelope::ok(json!({"id": "1"}));
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({"success": true, "data": {"id": "1"}})
        );

        let env: Envelope<()> = Envelope::failure("boom");
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({"success": false, "error": "boom"})
        );
    }

    #[test]
    fn test_message_only_envelope_deserializes_without_data() {
        let env: Envelope<()> =
            serde_json::from_value(json!({"success": true, "message": "gone"})).unwrap();
        assert!(env.success);
        assert_eq!(env.data, None);
        assert_eq!(env.message.as_deref(), Some("gone"));
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Contact {
        name: String,
    }

    #[test]
    fn test_payload_type_needs_no_default() {
        let env: Envelope<Contact> =
            serde_json::from_value(json!({"success": true, "data": {"name": "Ada"}})).unwrap();
        assert_eq!(
            env.data,
            Some(Contact {
                name: "Ada".to_string()
            })
        );

        let env: Envelope<Contact> =
            serde_json::from_value(json!({"success": false, "error": "gone"})).unwrap();
        assert_eq!(env.data, None);
        assert_eq!(env.into_result(), Err("gone".to_string()));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(Envelope::ok(5).into_result(), Ok(Some(5)));
        assert_eq!(
            Envelope::<i32>::failure("nope").into_result(),
            Err("nope".to_string())
        );
    }
}
