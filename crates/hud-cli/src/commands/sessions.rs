use anyhow::Result;
use serde_json::json;

use hud_store::GatewayStore;

use super::emit;

pub async fn handle(store: &GatewayStore, id: &str) -> Result<()> {
    let sessions = hud_store::session_list(store, id).await?;
    emit(store.redactor(), &json!({ "sessions": sessions }))
}
