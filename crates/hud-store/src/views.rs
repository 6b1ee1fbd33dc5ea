//! Derived views composed from store reads. These are the read models
//! the CLI prints.

use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use hud_core::{
    AgentDetail, AgentStatus, AgentSummary, AgentTotals, CronTotals, Error, Result,
    SessionSummary, StatsReport, TranscriptEntry, capabilities_from_persona, sum_usage,
};

use crate::store::{GatewayStore, main_session_key};

/// One overview row per configured agent: status against the active
/// window, capability bullets from the persona, main-session usage.
pub async fn agent_overview(store: &GatewayStore) -> Result<Vec<AgentSummary>> {
    let agents = store.agents().await?;
    let now = now_millis();
    let window = store.config().active_window_secs as i64 * 1000;

    let mut summaries = Vec::with_capacity(agents.len());
    for agent in agents {
        let sessions = store.agent_sessions(&agent.id).await?;
        let main = sessions.get(&main_session_key(&agent.id));
        let updated_at = main.and_then(|s| s.updated_at);

        let docs = store.agent_identity(&agent.id).await?;
        let capabilities = docs
            .persona
            .as_deref()
            .map(capabilities_from_persona)
            .unwrap_or_default();

        summaries.push(AgentSummary {
            status: AgentStatus::classify(updated_at, now, window),
            capabilities,
            last_active: updated_at.and_then(rfc3339_from_millis),
            token_usage: main.and_then(|s| s.token_usage.clone()),
            id: agent.id,
            name: agent.name,
            model: agent.model,
            identity: agent.identity,
        });
    }
    Ok(summaries)
}

/// Full detail for one agent, or [`Error::AgentNotFound`].
pub async fn agent_detail(store: &GatewayStore, id: &str) -> Result<AgentDetail> {
    let agents = store.agents().await?;
    let agent = agents
        .into_iter()
        .find(|a| a.id == id)
        .ok_or_else(|| Error::AgentNotFound(id.to_string()))?;

    let sessions = store.agent_sessions(id).await?;
    let docs = store.agent_identity(id).await?;
    let main = sessions.get(&main_session_key(id));
    let updated_at = main.and_then(|s| s.updated_at);

    Ok(AgentDetail {
        persona: docs.persona,
        identity_md: docs.identity,
        last_active: updated_at.and_then(rfc3339_from_millis),
        token_usage: main.and_then(|s| s.token_usage.clone()),
        session_count: sessions.len(),
        id: agent.id,
        name: agent.name,
        model: agent.model,
        identity: agent.identity,
    })
}

/// All sessions of one agent, sorted by key. The channel falls back to
/// the key prefix when the session does not carry one.
pub async fn session_list(store: &GatewayStore, id: &str) -> Result<Vec<SessionSummary>> {
    ensure_agent(store, id).await?;
    let sessions = store.agent_sessions(id).await?;

    let mut list = Vec::with_capacity(sessions.len());
    for (key, info) in sessions {
        let channel = info.channel.or_else(|| {
            key.split(':')
                .next()
                .filter(|prefix| !prefix.is_empty())
                .map(str::to_string)
        });
        list.push(SessionSummary {
            session_id: info.session_id,
            updated_at: info.updated_at.and_then(rfc3339_from_millis),
            channel,
            model: info.model,
            token_usage: info.token_usage,
            key,
        });
    }
    Ok(list)
}

/// Tail of the agent's main-session transcript. Agents without a main
/// session have no activity. The limit falls back to the configured
/// default and is clamped to the configured maximum.
pub async fn recent_activity(
    store: &GatewayStore,
    id: &str,
    limit: Option<usize>,
) -> Result<Vec<TranscriptEntry>> {
    ensure_agent(store, id).await?;
    let Some(session_id) = store.main_session_id(id).await? else {
        return Ok(Vec::new());
    };
    let limit = limit
        .unwrap_or(store.config().default_transcript_limit)
        .min(store.config().max_transcript_limit);
    store.session_transcript(id, &session_id, limit).await
}

/// Aggregate counts over every agent and cron job.
pub async fn gateway_stats(store: &GatewayStore) -> Result<StatsReport> {
    let agents = store.agents().await?;
    let now = now_millis();
    let window = store.config().active_window_secs as i64 * 1000;

    let mut active = 0;
    let mut token_usage = 0u64;
    for agent in &agents {
        let sessions = store.agent_sessions(&agent.id).await?;
        let main = sessions.get(&main_session_key(&agent.id));
        let updated_at = main.and_then(|s| s.updated_at);
        if AgentStatus::classify(updated_at, now, window) == AgentStatus::Active {
            active += 1;
        }
        for session in sessions.values() {
            if let Some(usage) = &session.token_usage {
                token_usage += sum_usage(usage);
            }
        }
    }

    let jobs = store.cron_jobs().await?;
    let mut enabled = 0;
    let mut last_run_statuses = Vec::new();
    for job in &jobs {
        // A job is enabled unless it says otherwise.
        if job.get("enabled").and_then(Value::as_bool) != Some(false) {
            enabled += 1;
        }
        if let Some(status) = job.pointer("/state/lastStatus").and_then(Value::as_str) {
            last_run_statuses.push(status.to_string());
        }
    }

    Ok(StatsReport {
        agents: AgentTotals {
            total: agents.len(),
            active,
        },
        cron: CronTotals {
            total: jobs.len(),
            enabled,
            last_run_statuses,
        },
        token_usage,
    })
}

async fn ensure_agent(store: &GatewayStore, id: &str) -> Result<()> {
    let agents = store.agents().await?;
    if agents.iter().any(|a| a.id == id) {
        Ok(())
    } else {
        Err(Error::AgentNotFound(id.to_string()))
    }
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

fn rfc3339_from_millis(millis: i64) -> Option<String> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
