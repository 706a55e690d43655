//! Text-backed strategies compared with the line diff.

use std::fmt::Debug;

use serde::Serialize;

use crate::diff::lines::LineDiff;
use crate::errors::{Result, SnapCheckError};
use crate::format::strategy::FormatStrategy;

fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn is_empty_text(bytes: &[u8]) -> bool {
    decode_text(bytes).is_empty()
}

fn encode_text(text: &String) -> Result<Vec<u8>> {
    Ok(text.as_bytes().to_vec())
}

fn text_strategy<V: ?Sized + 'static>(
    extension: &str,
    serialize: impl Fn(&V) -> Result<String> + Send + Sync + 'static,
) -> FormatStrategy<V, String> {
    FormatStrategy::new(
        Some(extension),
        LineDiff::default(),
        serialize,
        decode_text,
        encode_text,
    )
    .with_empty_reference(is_empty_text)
}

/// Plain text, stored verbatim as `.txt`
pub fn lines() -> FormatStrategy<str, String> {
    text_strategy("txt", |value: &str| Ok(value.to_string()))
}

/// Pretty-printed JSON with object keys in sorted order
///
/// Serialization fails for values `serde_json` rejects, such as maps with
/// non-string keys.
pub fn json<T: Serialize + ?Sized + 'static>() -> FormatStrategy<T, String> {
    text_strategy("json", |value: &T| {
        // Round-tripping through `Value` sorts keys (BTreeMap-backed map).
        let value = serde_json::to_value(value).map_err(|e| SnapCheckError::Serialization {
            message: e.to_string(),
        })?;
        serde_json::to_string_pretty(&value).map_err(|e| {
            SnapCheckError::Serialization {
                message: e.to_string(),
            }
            .into()
        })
    })
}

/// Structural dump through the value's `Debug` implementation
pub fn dump<T: Debug + ?Sized + 'static>() -> FormatStrategy<T, String> {
    text_strategy("txt", |value: &T| Ok(format!("{:#?}\n", value)))
}
