use std::fs;
use std::path::Path;

use matchlog_models::{EventSchema, IngestError, Result};
use serde_json::Value;

/// Reads a match export and parses every entry of its `events` array.
/// Any failing event aborts the whole load.
pub fn load_events<S: EventSchema>(path: impl AsRef<Path>) -> Result<Vec<S::Event>> {
    let path = path.as_ref();
    tracing::info!("📂 Loading {} events from {}", S::NAME, path.display());

    let bytes = fs::read(path).map_err(|source| {
        tracing::error!("❌ Cannot read {}: {}", path.display(), source);
        IngestError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let events = parse_document::<S>(&bytes).inspect_err(|e| {
        tracing::error!("❌ Failed to load {}: {}", path.display(), e);
    })?;

    tracing::info!("✅ Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

/// Decodes a whole document and parses its `events` array in order.
pub fn parse_document<S: EventSchema>(bytes: impl AsRef<[u8]>) -> Result<Vec<S::Event>> {
    let document: Value = serde_json::from_slice(bytes.as_ref())?;

    let root = document
        .as_object()
        .ok_or_else(|| IngestError::decode("top-level document must be a JSON object"))?;
    let events = root
        .get("events")
        .ok_or_else(|| IngestError::decode("top-level document has no `events` key"))?
        .as_array()
        .ok_or_else(|| IngestError::decode("`events` must be an array"))?;

    tracing::debug!("📊 Document holds {} raw {} events", events.len(), S::NAME);
    parse_events::<S>(events)
}

/// Parses raw event objects, keeping their order. The first failure is
/// returned with the position and, when readable, the id of the culprit.
pub fn parse_events<S: EventSchema>(raw: &[Value]) -> Result<Vec<S::Event>> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| {
            S::parse_event(value).map_err(|source| {
                let event_id = value.get("id").and_then(Value::as_u64);
                tracing::warn!("⚠️  Event #{} (id {:?}) rejected: {}", index, event_id, source);
                IngestError::Event {
                    index,
                    event_id,
                    source: Box::new(source),
                }
            })
        })
        .collect()
}
