use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    path::Path,
    time::Duration,
};

/// A content-derived identifier for a rendered clip.
///
/// Two render requests with the same source, text and time range map to
/// the same id, so the output file can be reused.
///
/// The id comes from std's `DefaultHasher`, whose output may change between
/// Rust releases. It is stable within one build only: after a toolchain
/// upgrade, previously cached renders are no longer found and get encoded
/// again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipId {
    pub numeric: u64,
    /// Full 16-character hex form, used as the output file stem.
    pub hex: String,
}

impl ClipId {
    pub fn new(
        path: &Path,
        text: &str,
        start: Duration,
        end: Duration,
    ) -> Self {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        text.hash(&mut hasher);
        start.hash(&mut hasher);
        end.hash(&mut hasher);
        let numeric = hasher.finish();
        Self {
            numeric,
            hex: format!("{numeric:016x}"),
        }
    }
}

impl std::fmt::Display for ClipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex)
    }
}
