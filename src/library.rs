use std::path::Path;

use rayon::prelude::*;

use crate::{
    episode::{Caption, Episode, new_id},
    error::Result,
    store::{Store, StoreBuilder},
    subtitle::SubtitleSource,
    walker,
};

/// Turn a video path into an episode with fresh episode and caption ids.
pub fn parse_episode(
    source: &dyn SubtitleSource,
    path: &Path,
) -> Result<Episode> {
    let cues = source.parse(path)?;
    let subtitles = cues
        .into_iter()
        .map(|cue| Caption {
            id: new_id(),
            start: cue.start,
            end: cue.end,
            text: cue.lines,
        })
        .collect();

    Ok(Episode {
        id: new_id(),
        path: path.to_path_buf(),
        subtitles,
    })
}

/// Scan `root` and build a searchable store from every video found.
///
/// Videos whose subtitles cannot be parsed are logged and left out. A walk
/// or index failure aborts the build and nothing is returned.
pub fn build_index(root: &Path, source: &dyn SubtitleSource) -> Result<Store> {
    build_index_with(root, source, StoreBuilder::new()?)
}

/// Like [`build_index`], filling a pre-configured builder.
pub fn build_index_with(
    root: &Path,
    source: &dyn SubtitleSource,
    mut builder: StoreBuilder,
) -> Result<Store> {
    tracing::info!(root = %root.display(), "building caption index");
    let videos = walker::discover_videos(root)?;

    // Parse in parallel; episodes are still indexed one at a time in walk
    // order.
    let parsed: Vec<_> = videos
        .par_iter()
        .map(|path| (path, parse_episode(source, path)))
        .collect();

    let mut skipped = 0;
    for (path, episode) in parsed {
        let episode = match episode {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "skipping video with unreadable subtitles"
                );
                skipped += 1;
                continue;
            }
        };

        let captions = episode.subtitles.len();
        let entries = builder.index_episode(episode).inspect_err(|e| {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "failed to index episode"
            );
        })?;
        tracing::debug!(
            path = %path.display(),
            captions,
            entries,
            "indexed episode"
        );
    }

    let store = builder.finish()?;
    let stats = store.stats();
    tracing::info!(
        episodes = stats.episodes,
        captions = stats.captions,
        entries = stats.entries,
        skipped,
        "caption index ready"
    );
    Ok(store)
}
