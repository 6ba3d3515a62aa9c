//! Durable record migration runner.
//!
//! Every record written by the store is wrapped in an envelope carrying an
//! explicit `schema_version` tag.  On load, [`upgrade`] brings older
//! envelopes up to [`CURRENT_SCHEMA_VERSION`] before the payload is
//! deserialized, so each migration runs exactly once per record.

pub mod v001_envelope;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;
use crate::Result;

/// Current schema version.  Bump this and add a new migration module whenever
/// the record layout changes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Versioned wrapper around a single durable record.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub schema_version: u32,
    pub data: Value,
}

impl Envelope {
    /// Wrap a payload at the current schema version.
    pub fn current(data: Value) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            data,
        }
    }
}

/// Parse a raw stored document and run any pending migrations, returning the
/// payload at the current schema version.
///
/// Documents written before versioning existed are bare JSON values; these
/// are treated as version 0.  A document from a newer schema than this build
/// understands is refused rather than partially read.
pub fn upgrade(key: &str, raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw)?;

    let (mut version, mut data) = match parse_envelope(&value) {
        Some((version, data)) => (version, data),
        None => (0, value),
    };

    tracing::debug!(key, current_version = version, target_version = CURRENT_SCHEMA_VERSION, "checking record migrations");

    if version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::Migration(format!(
            "record '{key}' has schema version {version}, newest supported is {CURRENT_SCHEMA_VERSION}"
        )));
    }

    if version < 1 {
        tracing::info!(key, "applying migration v001_envelope");
        data = v001_envelope::up(data);
        version = 1;
    }

    // Future migrations would be added here:
    // if version < 2 {
    //     data = v002_xxx::up(data);
    //     version = 2;
    // }

    debug_assert_eq!(version, CURRENT_SCHEMA_VERSION);
    Ok(data)
}

fn parse_envelope(value: &Value) -> Option<(u32, Value)> {
    let obj = value.as_object()?;
    let version = obj.get("schema_version")?.as_u64()? as u32;
    let data = obj.get("data")?.clone();
    Some((version, data))
}
