use sha2::{Digest, Sha256};

/// SHA256 of `content` as lowercase hex, used to correlate writes in logs
pub fn content_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
