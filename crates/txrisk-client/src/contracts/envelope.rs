use serde::Serialize;
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// Version of the JSON contract, bumped only on breaking shape changes.
pub const CONTRACT_VERSION: &str = "v1";

#[derive(Debug, Clone, Serialize)]
pub struct SuccessEnvelope {
    pub ok: bool,
    pub command: String,
    pub version: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureEnvelope {
    pub ok: bool,
    pub version: String,
    pub error: ErrorContract,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorContract {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
}

pub fn success<T>(command: &str, data: T) -> ClientResult<SuccessEnvelope>
where
    T: Serialize,
{
    let json_data = serde_json::to_value(data)
        .map_err(|err| ClientError::internal_serialization(&err.to_string()))?;
    Ok(SuccessEnvelope {
        ok: true,
        command: command.to_string(),
        version: CONTRACT_VERSION.to_string(),
        data: json_data,
    })
}

pub fn failure_from_error(error: &ClientError) -> FailureEnvelope {
    FailureEnvelope {
        ok: false,
        version: CONTRACT_VERSION.to_string(),
        error: ErrorContract {
            code: error.code.clone(),
            message: error.message.clone(),
            recovery_steps: error.recovery_steps.clone(),
        },
        data: error.data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CONTRACT_VERSION, failure_from_error, success};
    use crate::ClientError;

    #[test]
    fn success_wraps_payload_with_version() {
        let envelope = success("rules", json!({ "amount_threshold": 10000.0 }));
        assert!(envelope.is_ok());
        if let Ok(envelope) = envelope {
            assert!(envelope.ok);
            assert_eq!(envelope.command, "rules");
            assert_eq!(envelope.version, CONTRACT_VERSION);
            assert_eq!(envelope.data["amount_threshold"], json!(10000.0));
        }
    }

    #[test]
    fn failure_keeps_row_data() {
        let envelope = failure_from_error(&ClientError::invalid_amount(3, "abc"));
        assert!(!envelope.ok);
        assert_eq!(envelope.version, "v1");
        assert_eq!(envelope.error.code, "malformed_input");
        assert_eq!(envelope.data.map(|data| data["row"].clone()), Some(json!(3)));
    }

    #[test]
    fn failure_without_data_serializes_without_the_field() {
        let envelope = failure_from_error(&ClientError::new(
            "export_failed",
            "disk full",
            vec!["retry".to_string()],
        ));
        let value = serde_json::to_value(&envelope);
        assert!(value.is_ok());
        if let Ok(value) = value {
            assert_eq!(value["ok"], json!(false));
            assert_eq!(value["error"]["recovery_steps"][0], json!("retry"));
            assert!(value.get("data").is_none());
        }
    }
}
