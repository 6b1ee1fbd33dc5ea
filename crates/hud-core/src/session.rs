use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One value of a per-agent `sessions.json` map.
///
/// Gateways attach more fields than the HUD models; anything unknown
/// rides along in `extra` instead of being dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub token_usage: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Row of the session list view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub key: String,
    pub session_id: Option<String>,
    pub updated_at: Option<String>,
    pub channel: Option<String>,
    pub model: Option<String>,
    pub token_usage: Option<Value>,
}

/// Transcript line normalized for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl TranscriptEntry {
    /// Normalize a raw transcript line. `ts` and `type` are accepted as
    /// fallbacks for `timestamp` and `role`; object content is carried
    /// as its JSON text.
    pub fn from_line(line: &Value) -> Self {
        let timestamp = field_str(line, "timestamp").or_else(|| field_str(line, "ts"));
        let role = field_str(line, "role").or_else(|| field_str(line, "type"));
        let content = match line.get("content") {
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Object(_) | Value::Array(_))) => {
                serde_json::to_string(v).unwrap_or_default()
            }
            _ => String::new(),
        };
        Self {
            timestamp,
            role,
            content,
        }
    }
}

fn field_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
