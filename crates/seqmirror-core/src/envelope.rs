use serde::{Deserialize, Serialize};

/// Uniform wrapper the controller returns for every action.
///
/// Wire fields are PascalCase. A missing `StatusCode` reads as 0, which
/// callers treat the same as "no status" (the controller omits it on some
/// error paths).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(rename = "Success", default)]
    pub success: bool,
    #[serde(rename = "Response", default)]
    pub response: Option<T>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "StatusCode", default)]
    pub status_code: u16,
}

impl<T> Envelope<T> {
    /// A successful 200 envelope carrying `response`.
    pub fn ok(response: T) -> Self {
        Self {
            success: true,
            response: Some(response),
            error: None,
            status_code: 200,
        }
    }

    /// A rejected envelope with an error message and status code.
    pub fn failed(error: impl Into<String>, status_code: u16) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
            status_code,
        }
    }

    /// Error message for logging, tolerant of absent `Error` fields.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn deserializes_wire_shape() {
        let env: Envelope<Value> = serde_json::from_value(json!({
            "Success": true,
            "Response": {"Connected": true},
            "Error": null,
            "StatusCode": 200,
            "Type": "API"
        }))
        .unwrap();
        assert!(env.success);
        assert_eq!(env.status_code, 200);
        assert_eq!(env.response.unwrap()["Connected"], json!(true));
    }

    #[test]
    fn missing_status_code_reads_as_zero() {
        let env: Envelope<Value> =
            serde_json::from_value(json!({"Success": false, "Error": "boom"})).unwrap();
        assert_eq!(env.status_code, 0);
        assert_eq!(env.error_message(), "boom");
    }

    #[test]
    fn null_response_is_none() {
        let env: Envelope<String> =
            serde_json::from_value(json!({"Success": true, "Response": null})).unwrap();
        assert!(env.response.is_none());
        assert_eq!(env.error_message(), "unknown error");
    }
}
