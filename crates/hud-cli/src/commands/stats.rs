use anyhow::Result;

use hud_store::GatewayStore;

use super::emit;

pub async fn handle(store: &GatewayStore) -> Result<()> {
    let report = hud_store::gateway_stats(store).await?;
    emit(store.redactor(), &report)
}
