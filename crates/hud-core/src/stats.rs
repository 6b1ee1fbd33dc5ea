use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTotals {
    pub total: usize,
    pub active: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CronTotals {
    pub total: usize,
    pub enabled: usize,
    pub last_run_statuses: Vec<String>,
}

/// Aggregate report over the whole gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub agents: AgentTotals,
    pub cron: CronTotals,
    pub token_usage: u64,
}

/// Sum the numeric leaves of a token-usage map, descending one level
/// into grouped counters. Gateways report usage either flat
/// (`{"input": 10}`) or grouped by model (`{"claude": {"input": 10}}`).
pub fn sum_usage(usage: &Value) -> u64 {
    let Some(map) = usage.as_object() else {
        return 0;
    };
    let mut total = 0;
    for val in map.values() {
        match val {
            Value::Number(n) => total += n.as_u64().unwrap_or(0),
            Value::Object(inner) => {
                for v in inner.values() {
                    if let Some(n) = v.as_u64() {
                        total += n;
                    }
                }
            }
            _ => {}
        }
    }
    total
}
