use serde::Serialize;

use crate::{
    episode::SearchResult,
    error::Result,
    store::Store,
};

/// Results trimmed by [`shape_results`] when there are more than this many.
pub const TRIMMED_RESULTS: usize = 3;

/// Body of a search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// Order and trim raw results for presentation.
///
/// Sorts ascending by confidence, then drops the first
/// [`TRIMMED_RESULTS`] entries if there are more than that. The remaining
/// list is still ascending, so the best match comes last.
pub fn shape_results(mut results: Vec<SearchResult>) -> Vec<SearchResult> {
    results.sort_by(|a, b| a.confidence.total_cmp(&b.confidence));
    if results.len() > TRIMMED_RESULTS {
        results.drain(..TRIMMED_RESULTS);
    }
    results
}

/// Run a query and shape its results.
pub fn execute_search(store: &Store, query: &str) -> Result<Vec<SearchResult>> {
    store.search(query).map(shape_results)
}

/// Format results for human-readable terminal output.
pub fn format_human(results: &[SearchResult], store: &Store) {
    if results.is_empty() {
        println!("No results found.");
        return;
    }

    for r in results {
        let path = store
            .episode(&r.episode_id)
            .map(|e| e.path.display().to_string())
            .unwrap_or_default();
        println!(
            "[{:.3}] {} {}-{}",
            r.confidence,
            path,
            format_timestamp(r.caption.start),
            format_timestamp(r.caption.end),
        );
        for line in &r.caption.text {
            println!("     {line}");
        }
    }
    println!("\n{} result(s)", results.len());
}

/// Format results as the same JSON body the HTTP API returns.
pub fn format_json(results: Vec<SearchResult>) -> Result<()> {
    let body = SearchResponse { results };
    println!("{}", serde_json::to_string(&body)?);
    Ok(())
}

fn format_timestamp(d: std::time::Duration) -> String {
    let total = d.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        total / 3600,
        (total / 60) % 60,
        total % 60,
        d.subsec_millis()
    )
}
