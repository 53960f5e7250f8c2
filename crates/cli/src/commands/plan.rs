use anyhow::Result;
use docmigrate_core::MigrationStep;

pub(crate) fn run(step: &MigrationStep) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(step)?);
    Ok(())
}
