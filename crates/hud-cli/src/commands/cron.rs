use anyhow::Result;
use serde_json::json;

use hud_store::GatewayStore;

use crate::cli::CronCommands;

use super::emit;

pub async fn handle(cmd: CronCommands, store: &GatewayStore) -> Result<()> {
    match cmd {
        CronCommands::List => list(store).await,
        CronCommands::Show { job } => show(store, job).await,
    }
}

async fn list(store: &GatewayStore) -> Result<()> {
    let jobs = store.cron_jobs().await?;
    emit(store.redactor(), &json!({ "jobs": jobs }))
}

async fn show(store: &GatewayStore, job: String) -> Result<()> {
    let job = store.cron_job(&job).await?;
    emit(store.redactor(), &job)
}
