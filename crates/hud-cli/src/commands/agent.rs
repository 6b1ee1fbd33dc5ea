use anyhow::Result;

use hud_store::GatewayStore;

use super::emit;

pub async fn handle(store: &GatewayStore, id: &str) -> Result<()> {
    let detail = hud_store::agent_detail(store, id).await?;
    emit(store.redactor(), &detail)
}
