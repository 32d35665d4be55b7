use crate::error::{Error, Result};

/// Identifier of a single indexed caption line.
///
/// Rendered as `"{caption_id}:{line}"`. The text index works on lines, so
/// every hit carries one of these and is folded back into its caption.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId {
    pub caption_id: String,
    /// Position of the line within the caption, counting empty lines.
    pub line: usize,
}

impl EntryId {
    pub fn new(caption_id: &str, line: usize) -> Self {
        Self {
            caption_id: caption_id.to_string(),
            line,
        }
    }

    /// Parse an entry id read back from the index.
    ///
    /// Splits on the first `:`; caption ids never contain one.
    pub fn parse(raw: &str) -> Result<Self> {
        let (caption_id, line) = raw
            .split_once(':')
            .ok_or_else(|| Error::InvalidEntryId(raw.to_string()))?;
        let line = line
            .parse()
            .map_err(|_| Error::InvalidEntryId(raw.to_string()))?;
        Ok(Self {
            caption_id: caption_id.to_string(),
            line,
        })
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.caption_id, self.line)
    }
}
