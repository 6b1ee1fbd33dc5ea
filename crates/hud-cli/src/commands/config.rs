use anyhow::Result;

use hud_store::GatewayStore;

use super::emit;

pub async fn handle(store: &GatewayStore) -> Result<()> {
    let config = store.gateway_config().await?;
    emit(store.redactor(), &config)
}
