use std::sync::Arc;

use anyhow::{Result, bail};
use docmigrate_core::MigrationStep;
use docmigrate_service::MigrationService;
use docmigrate_storage::StoreBackend;

pub(crate) async fn run(storage: Arc<StoreBackend>, step: &MigrationStep) -> Result<()> {
    let service = MigrationService::new(storage);
    let report = service.verify(step).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.is_satisfied() {
        bail!("step {} not fully applied: {} item(s) missing", report.step_id, report.missing.len());
    }
    Ok(())
}
