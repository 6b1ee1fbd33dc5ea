//! Read-only access to a gateway's on-disk state.
//!
//! Every read that can carry credential material is redacted here,
//! before anything downstream sees it. Identifier checks run before
//! any path is built, so a bad agent or session id never reaches the
//! filesystem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use hud_core::{AgentRecord, Error, Result, SessionInfo, TranscriptEntry};
use hud_redact::Redactor;

/// Store tunables, usually taken from the config file.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Window in which a session update counts as activity, in seconds.
    pub active_window_secs: u64,
    /// Transcript entries returned when the caller gives no limit.
    pub default_transcript_limit: usize,
    /// Hard ceiling on transcript entries per read.
    pub max_transcript_limit: usize,
    /// Transcript content is cut to this many characters before
    /// redaction.
    pub max_content_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            active_window_secs: 1800,
            default_transcript_limit: 20,
            max_transcript_limit: 50,
            max_content_len: 200,
        }
    }
}

/// Persona and identity documents for one agent, already text-redacted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityDocs {
    pub persona: Option<String>,
    pub identity: Option<String>,
}

/// The `sessions.json` key under which an agent's main session lives.
pub fn main_session_key(agent_id: &str) -> String {
    format!("agent:{}:main", agent_id)
}

/// Read-only view over one gateway base directory.
pub struct GatewayStore {
    base: PathBuf,
    redactor: Arc<Redactor>,
    config: StoreConfig,
}

impl GatewayStore {
    pub fn new(base: impl Into<PathBuf>, redactor: Arc<Redactor>, config: StoreConfig) -> Self {
        Self {
            base: base.into(),
            redactor,
            config,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    /// Agents declared in `gateway.json`, projected down to the fields
    /// the HUD exposes. Entries that do not parse are skipped.
    pub async fn agents(&self) -> Result<Vec<AgentRecord>> {
        let raw = self.read_json(&self.base.join("gateway.json")).await?;
        let list = raw
            .pointer("/agents/list")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut agents = Vec::with_capacity(list.len());
        for entry in list {
            match serde_json::from_value::<AgentRecord>(entry) {
                Ok(agent) => agents.push(agent),
                Err(e) => warn!("Skipping malformed agent entry: {}", e),
            }
        }
        Ok(agents)
    }

    /// Full gateway config as a structurally redacted tree.
    pub async fn gateway_config(&self) -> Result<Value> {
        let raw = self.read_json(&self.base.join("gateway.json")).await?;
        Ok(self.redactor.redact(&raw))
    }

    /// Session map for one agent, redacted before it is typed. A
    /// missing file is an empty map, not an error.
    pub async fn agent_sessions(&self, agent_id: &str) -> Result<BTreeMap<String, SessionInfo>> {
        let dir = self.agent_dir(agent_id)?;
        let path = dir.join("sessions").join("sessions.json");
        let Some(raw) = self.read_json_optional(&path).await? else {
            return Ok(BTreeMap::new());
        };

        let clean = self.redactor.redact(&raw);
        let Some(entries) = clean.as_object() else {
            warn!("Ignoring non-object sessions file {}", path.display());
            return Ok(BTreeMap::new());
        };

        let mut sessions = BTreeMap::new();
        for (key, val) in entries {
            match serde_json::from_value::<SessionInfo>(val.clone()) {
                Ok(info) => {
                    sessions.insert(key.clone(), info);
                }
                Err(e) => warn!("Skipping malformed session entry '{}': {}", key, e),
            }
        }
        Ok(sessions)
    }

    /// Persona and identity documents, text-redacted. Missing files
    /// are `None`.
    pub async fn agent_identity(&self, agent_id: &str) -> Result<IdentityDocs> {
        let workspace = self.agent_dir(agent_id)?.join("workspace");
        let persona = self.read_doc(&workspace.join("PERSONA.md")).await?;
        let identity = self.read_doc(&workspace.join("IDENTITY.md")).await?;
        Ok(IdentityDocs { persona, identity })
    }

    /// Tail of a session transcript: the last `limit` well-formed JSONL
    /// entries, content truncated then text-redacted. A missing file is
    /// an empty list.
    pub async fn session_transcript(
        &self,
        agent_id: &str,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<TranscriptEntry>> {
        let dir = self.agent_dir(agent_id)?;
        let session_id = canonical_session_id(session_id)?;
        let path = dir.join("sessions").join(format!("{}.jsonl", session_id));

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut lines = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(parsed) => lines.push(parsed),
                Err(e) => warn!(
                    "Skipping malformed transcript line in {}: {}",
                    path.display(),
                    e
                ),
            }
        }

        let limit = limit.min(self.config.max_transcript_limit);
        let start = lines.len().saturating_sub(limit);
        let entries = lines[start..]
            .iter()
            .map(|line| {
                let mut entry = TranscriptEntry::from_line(line);
                entry.content = self
                    .redactor
                    .redact_text(truncate_chars(&entry.content, self.config.max_content_len));
                entry
            })
            .collect();
        Ok(entries)
    }

    /// Session id of the agent's main session, if it has one.
    pub async fn main_session_id(&self, agent_id: &str) -> Result<Option<String>> {
        let sessions = self.agent_sessions(agent_id).await?;
        Ok(sessions
            .get(&main_session_key(agent_id))
            .and_then(|s| s.session_id.clone()))
    }

    /// All cron jobs, redacted. A missing file is an empty list.
    pub async fn cron_jobs(&self) -> Result<Vec<Value>> {
        let path = self.base.join("cron").join("jobs.json");
        let Some(raw) = self.read_json_optional(&path).await? else {
            return Ok(Vec::new());
        };
        let clean = self.redactor.redact(&raw);
        Ok(clean
            .get("jobs")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// One cron job, matched by `id` or by `name`.
    pub async fn cron_job(&self, id_or_name: &str) -> Result<Value> {
        let jobs = self.cron_jobs().await?;
        jobs.into_iter()
            .find(|job| {
                job.get("id").and_then(Value::as_str) == Some(id_or_name)
                    || job.get("name").and_then(Value::as_str) == Some(id_or_name)
            })
            .ok_or_else(|| Error::JobNotFound(id_or_name.to_string()))
    }

    fn agent_dir(&self, agent_id: &str) -> Result<PathBuf> {
        validate_agent_id(agent_id)?;
        Ok(self.base.join("agents").join(agent_id))
    }

    async fn read_json(&self, path: &Path) -> Result<Value> {
        debug!("Reading {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn read_json_optional(&self, path: &Path) -> Result<Option<Value>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_doc(&self, path: &Path) -> Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(self.redactor.redact_text(&content))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Agent ids address a single directory component. Anything that could
/// change the path shape is rejected before touching the filesystem.
fn validate_agent_id(agent_id: &str) -> Result<()> {
    if agent_id.is_empty()
        || agent_id == "."
        || agent_id == ".."
        || agent_id.contains('/')
        || agent_id.contains('\\')
    {
        return Err(Error::InvalidIdentifier(format!(
            "agent id '{}'",
            agent_id
        )));
    }
    Ok(())
}

/// Session ids must be UUIDs; the canonical hyphenated form is what
/// reaches the filesystem.
fn canonical_session_id(session_id: &str) -> Result<String> {
    let parsed = Uuid::parse_str(session_id)
        .map_err(|_| Error::InvalidIdentifier(format!("session id '{}'", session_id)))?;
    Ok(parsed.as_hyphenated().to_string())
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hud_redact::REDACTION_MARKER;
    use tempfile::TempDir;

    fn store_at(dir: &TempDir) -> GatewayStore {
        GatewayStore::new(
            dir.path(),
            Arc::new(Redactor::default()),
            StoreConfig::default(),
        )
    }

    fn github_pat() -> String {
        format!("ghp_{}", "b".repeat(36))
    }

    async fn write_file(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, content).await.unwrap();
    }

    #[tokio::test]
    async fn test_agents_projects_config_list() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "gateway.json",
            r#"{
                "agents": {
                    "list": [
                        {"id": "scout", "name": "Scout", "model": "claude", "extra": 1},
                        {"id": "ops"}
                    ]
                },
                "other": {}
            }"#,
        )
        .await;

        let agents = store_at(&dir).agents().await.unwrap();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0].id, "scout");
        assert_eq!(agents[0].name.as_deref(), Some("Scout"));
        assert!(agents[1].model.is_none());
    }

    #[tokio::test]
    async fn test_agents_requires_gateway_config() {
        let dir = TempDir::new().unwrap();
        let err = store_at(&dir).agents().await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_agents_skips_malformed_entries() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "gateway.json",
            r#"{"agents": {"list": [{"id": "scout"}, {"name": "no id"}, 42]}}"#,
        )
        .await;

        let agents = store_at(&dir).agents().await.unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].id, "scout");
    }

    #[tokio::test]
    async fn test_gateway_config_is_redacted() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "gateway.json",
            &format!(
                r#"{{"channels": {{"telegram": {{"botToken": "plain"}}}}, "key": "{}"}}"#,
                github_pat()
            ),
        )
        .await;

        let config = store_at(&dir).gateway_config().await.unwrap();
        assert_eq!(config["channels"]["telegram"]["botToken"], REDACTION_MARKER);
        assert_eq!(config["key"], REDACTION_MARKER);
    }

    #[tokio::test]
    async fn test_agent_sessions_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let sessions = store_at(&dir).agent_sessions("scout").await.unwrap();
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_agent_sessions_redacts_values() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "agents/scout/sessions/sessions.json",
            r#"{
                "agent:scout:main": {
                    "sessionId": "0a8ddd6a-9e42-4c5c-b0d6-1a6b4b8c2f10",
                    "updatedAt": 1700000000000,
                    "apiKey": "should-not-survive",
                    "tokenUsage": {"input": 10}
                }
            }"#,
        )
        .await;

        let sessions = store_at(&dir).agent_sessions("scout").await.unwrap();
        let main = &sessions["agent:scout:main"];
        assert_eq!(
            main.session_id.as_deref(),
            Some("0a8ddd6a-9e42-4c5c-b0d6-1a6b4b8c2f10")
        );
        assert_eq!(main.extra["apiKey"], REDACTION_MARKER);
        assert_eq!(main.token_usage.as_ref().unwrap()["input"], 10);
    }

    #[tokio::test]
    async fn test_agent_id_checked_before_io() {
        let dir = TempDir::new().unwrap();
        let store = store_at(&dir);
        for bad in ["", ".", "..", "a/b", "a\\b", "../scout"] {
            let err = store.agent_sessions(bad).await.unwrap_err();
            assert!(
                matches!(err, Error::InvalidIdentifier(_)),
                "id {:?} should be rejected",
                bad
            );
        }
    }

    #[tokio::test]
    async fn test_session_id_must_be_uuid() {
        let dir = TempDir::new().unwrap();
        let err = store_at(&dir)
            .session_transcript("scout", "../../etc/passwd", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn test_transcript_tail_truncation_and_redaction() {
        let dir = TempDir::new().unwrap();
        let session = "0a8ddd6a-9e42-4c5c-b0d6-1a6b4b8c2f10";

        let mut lines = String::new();
        for i in 0..30 {
            lines.push_str(&format!(
                "{{\"role\": \"assistant\", \"content\": \"message {}\"}}\n",
                i
            ));
        }
        lines.push_str("\n");
        lines.push_str("not json at all\n");
        lines.push_str(&format!(
            "{{\"role\": \"user\", \"content\": \"token {} and padding {}\"}}\n",
            github_pat(),
            "x".repeat(300)
        ));

        write_file(
            &dir,
            &format!("agents/scout/sessions/{}.jsonl", session),
            &lines,
        )
        .await;

        let store = store_at(&dir);
        let entries = store.session_transcript("scout", session, 5).await.unwrap();
        assert_eq!(entries.len(), 5);

        let last = entries.last().unwrap();
        assert!(last.content.contains(REDACTION_MARKER));
        assert!(!last.content.contains(&github_pat()));
        assert!(last.content.chars().count() <= store.config().max_content_len);

        // First four of the tail are the ordinary trailing messages.
        assert_eq!(entries[0].content, "message 26");
    }

    #[tokio::test]
    async fn test_transcript_truncation_is_char_safe() {
        let dir = TempDir::new().unwrap();
        let session = "0a8ddd6a-9e42-4c5c-b0d6-1a6b4b8c2f10";
        let content = "é".repeat(300);
        write_file(
            &dir,
            &format!("agents/scout/sessions/{}.jsonl", session),
            &format!("{{\"content\": \"{}\"}}\n", content),
        )
        .await;

        let entries = store_at(&dir)
            .session_transcript("scout", session, 5)
            .await
            .unwrap();
        assert_eq!(entries[0].content.chars().count(), 200);
    }

    #[tokio::test]
    async fn test_transcript_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let entries = store_at(&dir)
            .session_transcript("scout", "0a8ddd6a-9e42-4c5c-b0d6-1a6b4b8c2f10", 5)
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_main_session_id_lookup() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "agents/scout/sessions/sessions.json",
            r#"{
                "agent:scout:main": {"sessionId": "0a8ddd6a-9e42-4c5c-b0d6-1a6b4b8c2f10"},
                "agent:scout:telegram": {"sessionId": "ffffffff-ffff-4fff-bfff-ffffffffffff"}
            }"#,
        )
        .await;

        let store = store_at(&dir);
        assert_eq!(
            store.main_session_id("scout").await.unwrap().as_deref(),
            Some("0a8ddd6a-9e42-4c5c-b0d6-1a6b4b8c2f10")
        );
        assert!(store.main_session_id("ops").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_identity_docs_redacted_and_optional() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "agents/scout/workspace/PERSONA.md",
            &format!("# Scout\n\n- search\n\ndeploy key: {}\n", github_pat()),
        )
        .await;

        let docs = store_at(&dir).agent_identity("scout").await.unwrap();
        let persona = docs.persona.unwrap();
        assert!(persona.contains(REDACTION_MARKER));
        assert!(!persona.contains(&github_pat()));
        assert!(docs.identity.is_none());
    }

    #[tokio::test]
    async fn test_cron_jobs_and_lookup() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "cron/jobs.json",
            r#"{
                "jobs": [
                    {"id": "j1", "name": "digest", "enabled": true, "token": "x"},
                    {"id": "j2", "name": "cleanup", "enabled": false}
                ]
            }"#,
        )
        .await;

        let store = store_at(&dir);
        let jobs = store.cron_jobs().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0]["token"], REDACTION_MARKER);

        let by_name = store.cron_job("digest").await.unwrap();
        assert_eq!(by_name["id"], "j1");
        let by_id = store.cron_job("j2").await.unwrap();
        assert_eq!(by_id["name"], "cleanup");

        let err = store.cron_job("nope").await.unwrap_err();
        assert!(matches!(err, Error::JobNotFound(_)));
    }

    #[tokio::test]
    async fn test_cron_jobs_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store_at(&dir).cron_jobs().await.unwrap().is_empty());
    }
}
