//! quotegif - quote search over the subtitle tracks of a video library.
//!
//! At startup a library directory is scanned, every video's `.en.srt`
//! sibling is parsed, and each caption line goes into an in-memory
//! [Tantivy](https://github.com/quickwit-oss/tantivy) index. Queries come
//! back as whole captions attributed to their episode, and any caption can
//! be rendered as a GIF with `ffmpeg`.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//!
//! use quotegif::{SrtFiles, library, search};
//!
//! let root = Path::new("/media/tv");
//! let store = library::build_index(root, &SrtFiles).unwrap();
//! for r in search::execute_search(&store, "general kenobi").unwrap() {
//!     println!("{} [{:.3}] {:?}", r.episode_id, r.confidence, r.caption.text);
//! }
//! ```

pub mod cli;
pub mod clip_id;
pub mod config;
pub mod entry_id;
pub mod episode;
pub mod error;
pub mod library;
pub mod render;
pub mod search;
pub mod server;
pub mod store;
pub mod subtitle;
pub mod tantivy_index;
pub mod walker;

pub use episode::{Caption, Episode, SearchResult};
pub use error::{Error, Result};
pub use render::Renderer;
pub use store::{Store, StoreBuilder};
pub use subtitle::{SrtFiles, SubtitleSource};
