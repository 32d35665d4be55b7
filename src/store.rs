//! The caption/episode store and the query engine on top of it.
//!
//! A [`StoreBuilder`] owns the only index writer and takes `&mut self` for
//! every write, so table updates and the index commit for an episode can
//! never interleave with anything else. [`StoreBuilder::finish`] consumes
//! the builder and yields an immutable [`Store`] that can be shared across
//! threads and searched without locking.

use std::collections::HashMap;

use tantivy::IndexWriter;

use crate::{
    entry_id::EntryId,
    episode::{Caption, Episode, SearchResult},
    error::{Error, Result},
    tantivy_index::{CaptionIndex, WRITER_MEMORY_BUDGET},
};

/// Line hits fetched from the text index per query.
pub const DEFAULT_HIT_LIMIT: usize = 10;

/// Cross-reference tables between captions and episodes.
#[derive(Debug, Default)]
struct Tables {
    episodes_by_id: HashMap<String, Episode>,
    captions_by_id: HashMap<String, Caption>,
    episodes_by_caption_id: HashMap<String, String>,
}

/// Counts describing a built store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub episodes: usize,
    pub captions: usize,
    pub entries: u64,
}

/// Write side of the store, used only while the library is being built.
pub struct StoreBuilder {
    tables: Tables,
    index: CaptionIndex,
    writer: IndexWriter,
    hit_limit: usize,
}

impl StoreBuilder {
    pub fn new() -> Result<Self> {
        let index = CaptionIndex::open_in_ram()?;
        let writer = index.writer(WRITER_MEMORY_BUDGET)?;
        Ok(Self {
            tables: Tables::default(),
            index,
            writer,
            hit_limit: DEFAULT_HIT_LIMIT,
        })
    }

    /// Set how many line hits a search considers before de-duplication.
    pub fn with_hit_limit(mut self, hit_limit: usize) -> Self {
        self.hit_limit = hit_limit;
        self
    }

    /// Register an episode and commit its caption lines as one batch.
    ///
    /// Every non-empty line becomes an index entry keyed
    /// `caption_id:line_index` with its text lowercased. Returns the number
    /// of entries committed. The tables are only updated once the commit
    /// has succeeded.
    pub fn index_episode(&mut self, episode: Episode) -> Result<usize> {
        let mut staged = 0;
        for caption in &episode.subtitles {
            for (line, text) in caption.text.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                let entry = EntryId::new(&caption.id, line);
                if let Err(e) = self.index.add_entry(
                    &self.writer,
                    &entry,
                    &text.to_lowercase(),
                ) {
                    self.writer.rollback()?;
                    return Err(e);
                }
                staged += 1;
            }
        }
        self.writer.commit()?;

        for caption in &episode.subtitles {
            self.tables
                .captions_by_id
                .insert(caption.id.clone(), caption.clone());
            self.tables
                .episodes_by_caption_id
                .insert(caption.id.clone(), episode.id.clone());
        }
        self.tables.episodes_by_id.insert(episode.id.clone(), episode);

        Ok(staged)
    }

    /// Publish everything indexed so far as a read-only store.
    pub fn finish(self) -> Result<Store> {
        self.writer.wait_merging_threads()?;
        self.index.reload()?;
        Ok(Store {
            tables: self.tables,
            index: self.index,
            hit_limit: self.hit_limit,
        })
    }
}

impl std::fmt::Debug for StoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreBuilder")
            .field("episodes", &self.tables.episodes_by_id.len())
            .finish_non_exhaustive()
    }
}

/// Immutable corpus plus its text index.
#[derive(Debug)]
pub struct Store {
    tables: Tables,
    index: CaptionIndex,
    hit_limit: usize,
}

impl Store {
    /// Find captions matching `query`.
    ///
    /// Line hits are folded into one result per caption; when several lines
    /// of a caption match, the score of the last hit seen is kept. The
    /// returned order carries no meaning, see
    /// [`shape_results`](crate::search::shape_results).
    ///
    /// A hit whose caption is not registered fails the whole query with
    /// [`Error::NotFound`] rather than being skipped.
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let hits = self.index.search(query, self.hit_limit)?;

        let mut by_caption: HashMap<String, SearchResult> = HashMap::new();
        for hit in hits {
            let entry = EntryId::parse(&hit.entry_id)?;
            let episode_id = self
                .tables
                .episodes_by_caption_id
                .get(&entry.caption_id)
                .ok_or_else(|| Error::NotFound {
                    kind: "episode for caption",
                    name: entry.caption_id.clone(),
                })?;
            let caption = self
                .tables
                .captions_by_id
                .get(&entry.caption_id)
                .ok_or_else(|| Error::NotFound {
                    kind: "caption",
                    name: entry.caption_id.clone(),
                })?;

            by_caption.insert(
                entry.caption_id,
                SearchResult {
                    episode_id: episode_id.clone(),
                    caption: caption.clone(),
                    confidence: f64::from(hit.score),
                },
            );
        }

        Ok(by_caption.into_values().collect())
    }

    pub fn episode(&self, id: &str) -> Option<&Episode> {
        self.tables.episodes_by_id.get(id)
    }

    pub fn caption(&self, id: &str) -> Option<&Caption> {
        self.tables.captions_by_id.get(id)
    }

    /// The episode that owns caption `caption_id`.
    pub fn episode_for_caption(&self, caption_id: &str) -> Option<&Episode> {
        let episode_id = self.tables.episodes_by_caption_id.get(caption_id)?;
        self.episode(episode_id)
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            episodes: self.tables.episodes_by_id.len(),
            captions: self.tables.captions_by_id.len(),
            entries: self.index.num_entries(),
        }
    }
}
