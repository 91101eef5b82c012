//! Invocation request and result models.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ActionError, ActionResult};

/// JSON object returned by a successful action.
pub type Payload = Map<String, Value>;

/// Named parameters passed to an action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionParams(Map<String, Value>);

impl ActionParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the raw parameter string.
    ///
    /// Absent, malformed or non-object input yields an empty parameter set.
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        if raw.trim().is_empty() {
            return Self::default();
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Self(map),
            Ok(other) => {
                tracing::warn!(
                    kind = json_kind(&other),
                    "Action parameters are not a JSON object, using no parameters"
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Action parameters are not valid JSON, using no parameters"
                );
                Self::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expand the parameters into a typed argument struct.
    pub fn parse<T: DeserializeOwned>(&self) -> ActionResult<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| ActionError::invalid_params(format!("Invalid parameters: {}", e)))
    }
}

impl From<Map<String, Value>> for ActionParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One invocation, built once from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub action: String,
    pub params: ActionParams,
}

/// Outcome of one invocation, printed as a single JSON line.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationResult {
    Success {
        payload: Payload,
    },
    Failure {
        error: String,
        /// Set when the action ran and failed.
        action: Option<String>,
        /// Set when the action does not exist.
        available_actions: Option<Vec<String>>,
    },
}

impl InvocationResult {
    pub fn success(mut payload: Payload) -> Self {
        payload.remove("success");
        InvocationResult::Success { payload }
    }

    pub fn failure(action: impl Into<String>, error: impl Into<String>) -> Self {
        InvocationResult::Failure {
            error: error.into(),
            action: Some(action.into()),
            available_actions: None,
        }
    }

    pub fn not_found(action: &str, available_actions: Vec<String>) -> Self {
        InvocationResult::Failure {
            error: format!("Action '{}' not found", action),
            action: None,
            available_actions: Some(available_actions),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success { .. })
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        match self {
            InvocationResult::Success { payload } => {
                out.insert("success".to_string(), Value::Bool(true));
                for (key, value) in payload {
                    out.insert(key.clone(), value.clone());
                }
            }
            InvocationResult::Failure {
                error,
                action,
                available_actions,
            } => {
                out.insert("success".to_string(), Value::Bool(false));
                out.insert("error".to_string(), Value::String(error.clone()));
                if let Some(action) = action {
                    out.insert("action".to_string(), Value::String(action.clone()));
                }
                if let Some(available) = available_actions {
                    out.insert(
                        "available_actions".to_string(),
                        Value::Array(available.iter().cloned().map(Value::String).collect()),
                    );
                }
            }
        }
        Value::Object(out)
    }

    /// Compact single-line JSON rendering.
    pub fn to_line(&self) -> String {
        self.to_json().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct HelloParams {
        #[serde(default = "default_name")]
        name: String,
    }

    fn default_name() -> String {
        "World".to_string()
    }

    #[test]
    fn test_decode_absent_and_blank() {
        assert!(ActionParams::decode(None).is_empty());
        assert!(ActionParams::decode(Some("")).is_empty());
        assert!(ActionParams::decode(Some("  ")).is_empty());
    }

    #[test]
    fn test_decode_malformed_is_empty() {
        assert!(ActionParams::decode(Some("not-json")).is_empty());
        assert!(ActionParams::decode(Some("{\"name\":")).is_empty());
    }

    #[test]
    fn test_decode_non_object_is_empty() {
        assert!(ActionParams::decode(Some("[1, 2]")).is_empty());
        assert!(ActionParams::decode(Some("\"text\"")).is_empty());
        assert!(ActionParams::decode(Some("null")).is_empty());
    }

    #[test]
    fn test_parse_with_defaults() {
        let params = ActionParams::decode(Some("{}"));
        let parsed: HelloParams = params.parse().unwrap();
        assert_eq!(parsed.name, "World");

        let params = ActionParams::decode(Some(r#"{"name":"Ops"}"#));
        let parsed: HelloParams = params.parse().unwrap();
        assert_eq!(parsed.name, "Ops");
    }

    #[test]
    fn test_parse_unknown_argument_fails() {
        let params = ActionParams::decode(Some(r#"{"nmae":"Ops"}"#));
        let err = params.parse::<HelloParams>().unwrap_err();
        assert!(matches!(err, ActionError::InvalidParams(_)));
        assert!(err.to_string().contains("nmae"));
    }

    #[test]
    fn test_success_rendering() {
        let payload = json!({"message": "hi", "success": false});
        let result = InvocationResult::success(payload.as_object().unwrap().clone());
        assert!(result.is_success());
        assert_eq!(result.to_json(), json!({"success": true, "message": "hi"}));
    }

    #[test]
    fn test_failure_rendering() {
        let result = InvocationResult::failure("hello_world", "boom");
        assert_eq!(
            result.to_json(),
            json!({"success": false, "error": "boom", "action": "hello_world"})
        );
    }

    #[test]
    fn test_not_found_rendering() {
        let result = InvocationResult::not_found(
            "does_not_exist",
            vec!["get_datastore_key".to_string(), "hello_world".to_string()],
        );
        assert_eq!(
            result.to_json(),
            json!({
                "success": false,
                "error": "Action 'does_not_exist' not found",
                "available_actions": ["get_datastore_key", "hello_world"]
            })
        );
    }

    #[test]
    fn test_line_is_single_line() {
        let mut payload = Payload::new();
        payload.insert("text".to_string(), json!("a\nb"));
        let line = InvocationResult::success(payload).to_line();
        assert!(!line.contains('\n'));
        let back: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(back["text"], "a\nb");
    }
}
