use std::path::Path;

use stocktake_core::Domain;

use crate::commands::common::open_cache;
use crate::error::CliError;

pub async fn run_show(domain: &str, db_path: &Path) -> Result<(), CliError> {
    let domain: Domain = domain.parse()?;
    let cache = open_cache(db_path)?;
    let rows = cache.snapshot_rows(domain).await;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
