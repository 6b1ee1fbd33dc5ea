pub mod activity;
pub mod agent;
pub mod agents;
pub mod config;
pub mod cron;
pub mod sessions;
pub mod stats;

use anyhow::Result;
use serde::Serialize;

use hud_redact::Redactor;

/// Run a payload through a final redaction pass and print it as pretty JSON.
///
/// Every command emits through here, so nothing reaches stdout without
/// the redactor seeing it first.
pub fn emit<T: Serialize>(redactor: &Redactor, payload: &T) -> Result<()> {
    let value = redactor.sanitize(payload)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
