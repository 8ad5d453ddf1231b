//! Serialized form of the entry list kept under [`crate::ENTRIES_KEY`].
//!
//! ```json
//! {"version": 1, "entries": [{"id": "...", "guestName": "Ana", ...}]}
//! ```
//!
//! A bare JSON array of entries (the layout written before the payload was
//! versioned) is still accepted on read and treated as version 1.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::Entry;

pub const PAYLOAD_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported payload version {0}")]
    UnsupportedVersion(u64),

    #[error("payload is neither an entry list nor a versioned object")]
    UnexpectedShape,
}

#[derive(Serialize)]
struct PayloadRef<'a> {
    version: u32,
    entries: &'a [Entry],
}

#[derive(Deserialize)]
struct VersionedPayload {
    entries: Vec<Entry>,
}

pub fn encode(entries: &[Entry]) -> Result<String, PayloadError> {
    Ok(serde_json::to_string(&PayloadRef {
        version: PAYLOAD_VERSION,
        entries,
    })?)
}

pub fn decode(raw: &str) -> Result<Vec<Entry>, PayloadError> {
    match serde_json::from_str::<Value>(raw)? {
        legacy @ Value::Array(_) => Ok(serde_json::from_value(legacy)?),
        Value::Object(map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or(PayloadError::UnexpectedShape)?;
            if version != u64::from(PAYLOAD_VERSION) {
                return Err(PayloadError::UnsupportedVersion(version));
            }
            let payload: VersionedPayload = serde_json::from_value(Value::Object(map))?;
            Ok(payload.entries)
        }
        _ => Err(PayloadError::UnexpectedShape),
    }
}
