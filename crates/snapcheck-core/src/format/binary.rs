use crate::diff::bytes::BytesDiff;
use crate::format::strategy::FormatStrategy;

/// Opaque binary data stored as `.bin`
pub fn bytes() -> FormatStrategy<[u8], Vec<u8>> {
    FormatStrategy::new(
        Some("bin"),
        BytesDiff,
        |value: &[u8]| Ok(value.to_vec()),
        |stored: &[u8]| stored.to_vec(),
        |format: &Vec<u8>| Ok(format.clone()),
    )
}
