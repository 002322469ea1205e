use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

use crate::data::record::Record;
use crate::data::user::User;

/// Parse a JSON array of users
pub fn load_users_from_str(json: &str) -> Result<Vec<User>> {
    let users: Vec<User> =
        serde_json::from_str(json).with_context(|| "Failed to parse users JSON")?;
    ensure_unique_ids(&users)?;
    Ok(users)
}

/// Load a JSON file holding an array of users
pub fn load_users_json<P: AsRef<Path>>(path: P) -> Result<Vec<User>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open JSON file: {:?}", path.as_ref()))?;
    let reader = BufReader::new(file);

    let users: Vec<User> = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse users from {:?}", path.as_ref()))?;
    ensure_unique_ids(&users)?;

    info!("Loaded {} users from {:?}", users.len(), path.as_ref());
    Ok(users)
}

/// Load a JSON file holding an array of arbitrary objects as records
pub fn load_records_json<P: AsRef<Path>>(path: P) -> Result<Vec<JsonValue>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open JSON file: {:?}", path.as_ref()))?;
    let reader = BufReader::new(file);

    let records: Vec<JsonValue> =
        serde_json::from_reader(reader).with_context(|| "Failed to parse JSON file")?;
    if let Some(position) = records.iter().position(|r| !r.is_object()) {
        bail!("JSON data must be an array of objects (element {} is not)", position);
    }
    ensure_unique_ids(&records)?;

    info!("Loaded {} records from {:?}", records.len(), path.as_ref());
    Ok(records)
}

fn ensure_unique_ids<R: Record>(records: &[R]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        let id = record.id();
        if !seen.insert(id.clone()) {
            bail!("Duplicate record id: {}", id);
        }
    }
    Ok(())
}
