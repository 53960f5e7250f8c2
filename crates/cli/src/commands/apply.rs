use std::sync::Arc;

use anyhow::Result;
use docmigrate_core::{COMPLETION_MESSAGE, MigrationStep};
use docmigrate_service::MigrationService;
use docmigrate_storage::StoreBackend;

pub(crate) async fn run(storage: Arc<StoreBackend>, step: &MigrationStep) -> Result<()> {
    let service = MigrationService::new(storage);
    let report = service.apply(step).await?;
    println!("{COMPLETION_MESSAGE}");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
