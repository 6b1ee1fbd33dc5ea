use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of persona bullets surfaced as capabilities.
pub const CAPABILITY_LIMIT: usize = 10;

/// Identity block attached to an agent in the gateway config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentIdentity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

/// One entry of `agents.list[]` in the gateway config, projected down
/// to the fields the HUD exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub identity: Option<AgentIdentity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Active,
    Idle,
}

impl AgentStatus {
    /// Active when the last update is strictly inside the window ending
    /// at `now_millis`.
    pub fn classify(updated_at_millis: Option<i64>, now_millis: i64, window_millis: i64) -> Self {
        match updated_at_millis {
            Some(at) if at > now_millis - window_millis => AgentStatus::Active,
            _ => AgentStatus::Idle,
        }
    }
}

/// Overview row for one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSummary {
    pub id: String,
    pub name: Option<String>,
    pub model: Option<String>,
    pub identity: Option<AgentIdentity>,
    pub status: AgentStatus,
    pub capabilities: Vec<String>,
    pub last_active: Option<String>,
    pub token_usage: Option<Value>,
}

/// Full detail for one agent, including its persona and identity
/// documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDetail {
    pub id: String,
    pub name: Option<String>,
    pub model: Option<String>,
    pub identity: Option<AgentIdentity>,
    pub persona: Option<String>,
    pub identity_md: Option<String>,
    pub last_active: Option<String>,
    pub token_usage: Option<Value>,
    pub session_count: usize,
}

/// First `- ` bullet lines of a persona document, shown as the agent's
/// capability list.
pub fn capabilities_from_persona(persona: &str) -> Vec<String> {
    persona
        .lines()
        .filter_map(|line| line.strip_prefix("- "))
        .take(CAPABILITY_LIMIT)
        .map(|rest| rest.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_extraction() {
        let persona = "# Scout\n\nA research agent.\n\n- web search\n-no space\n- summarize threads  \n  - indented bullet\n";
        let caps = capabilities_from_persona(persona);
        assert_eq!(caps, vec!["web search", "summarize threads"]);
    }

    #[test]
    fn test_capabilities_capped() {
        let persona: String = (0..20).map(|i| format!("- cap {}\n", i)).collect();
        let caps = capabilities_from_persona(&persona);
        assert_eq!(caps.len(), CAPABILITY_LIMIT);
        assert_eq!(caps[0], "cap 0");
        assert_eq!(caps[9], "cap 9");
    }

    #[test]
    fn test_capabilities_empty_persona() {
        assert!(capabilities_from_persona("").is_empty());
    }

    #[test]
    fn test_status_window_boundary() {
        let now = 1_700_000_000_000;
        let window = 30 * 60 * 1000;
        assert_eq!(
            AgentStatus::classify(Some(now - window), now, window),
            AgentStatus::Idle
        );
        assert_eq!(
            AgentStatus::classify(Some(now - window + 1), now, window),
            AgentStatus::Active
        );
        assert_eq!(AgentStatus::classify(None, now, window), AgentStatus::Idle);
    }

    #[test]
    fn test_agent_record_tolerates_sparse_config() {
        let record: AgentRecord = serde_json::from_value(serde_json::json!({
            "id": "scout",
            "identity": {"name": "Scout", "emoji": "🔭"},
            "unknownField": true,
        }))
        .unwrap();
        assert_eq!(record.id, "scout");
        assert!(record.name.is_none());
        assert_eq!(record.identity.unwrap().name.as_deref(), Some("Scout"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(AgentStatus::Active).unwrap(),
            serde_json::json!("active")
        );
    }
}
