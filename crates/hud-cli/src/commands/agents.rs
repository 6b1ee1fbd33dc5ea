use anyhow::Result;
use serde_json::json;

use hud_store::GatewayStore;

use super::emit;

pub async fn handle(store: &GatewayStore) -> Result<()> {
    let agents = hud_store::agent_overview(store).await?;
    emit(store.redactor(), &json!({ "agents": agents }))
}
