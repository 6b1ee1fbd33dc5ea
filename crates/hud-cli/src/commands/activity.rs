use anyhow::Result;
use serde_json::json;

use hud_store::GatewayStore;

use super::emit;

pub async fn handle(store: &GatewayStore, id: &str, limit: Option<usize>) -> Result<()> {
    let entries = hud_store::recent_activity(store, id, limit).await?;
    emit(store.redactor(), &json!({ "activity": entries }))
}
