//! BLAKE3 helpers for cache keys and vector point ids.

/// Full 32-byte BLAKE3 hash of `text`; used as the embedding cache key.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// 64-bit hash of `data` (first 8 bytes of BLAKE3, little-endian).
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Deterministic point id for chunk `chunk_index` of `source_id`.
///
/// Re-ingesting the same source overwrites its existing points instead of duplicating them.
#[inline]
pub fn passage_point_id(source_id: &str, chunk_index: usize) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(source_id.as_bytes());
    hasher.update(b"\0");
    hasher.update(&(chunk_index as u64).to_le_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}
