use sha2::{Digest, Sha256};

/// Length of generated ids, in hex characters.
pub const ID_LEN: usize = 16;

/// Derive an entry id from its URI and a disambiguating stamp and sequence number.
pub fn derive_id(uri: &str, stamp: i64, seq: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uri.as_bytes());
    hasher.update([0u8]);
    hasher.update(stamp.to_be_bytes());
    hasher.update(seq.to_be_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..ID_LEN].to_string()
}

/// Produces ids that differ across sessions (wall-clock stamp) and within a
/// session even when many URIs are added in the same instant (counter).
#[derive(Debug, Default)]
pub struct IdGenerator {
    seq: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_for(&mut self, uri: &str) -> String {
        self.seq += 1;
        let stamp = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_else(|| chrono::Utc::now().timestamp());
        derive_id(uri, stamp, self.seq)
    }
}
