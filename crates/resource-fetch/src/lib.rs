//! Resolves and downloads the resources a game client needs before it can run.
//!
//! The crate decides, from what is already on disk, which music tracks,
//! sound clips and bundle parts are still missing, submits keyed requests for
//! them to a [`DownloadEngine`], and exposes a non-blocking
//! [`ResourceFetcher::poll`] that collects results in a fixed order while
//! advancing a single "next resource" status line.
//!
//! # Design principles
//!
//! - **Non-blocking**: `poll` only performs keyed lookups and returns promptly
//! - **Engine-agnostic**: Network I/O lives behind [`DownloadEngine`]
//! - **Strictly ordered**: No status is shown before every earlier item resolved
//!
//! # Example
//!
//! ```ignore
//! use resource_fetch::{FsStorage, HttpEngine, Layout, ResourceFetcher};
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let mut engine = HttpEngine::new(runtime.handle().clone());
//! let mut fetcher = ResourceFetcher::new(Layout::new("."), FsStorage);
//!
//! let inventory = fetcher.scan()?;
//! println!("{} resources, {:.2} MB", inventory.missing_count(), inventory.download_size_mb());
//!
//! fetcher.dispatch(&mut engine, |status| println!("{status}"))?;
//! while !fetcher.poll(&mut engine, |status| println!("{status}"))? {
//!     std::thread::sleep(std::time::Duration::from_millis(100));
//! }
//! ```

pub mod config;
pub mod engine;
mod error;
mod fetcher;
pub mod inventory;
pub mod manifest;
pub mod patcher;
pub mod progress;
pub mod storage;

pub use config::{Layout, Sources};
pub use engine::{DownloadEngine, FetchResult, HttpEngine, MemoryEngine};
pub use error::{Error, Result};
pub use fetcher::{Bundle, ResourceFetcher};
pub use inventory::Inventory;
pub use manifest::{BundlePart, Manifest, MusicTrack, ResourceKind, SoundCategory};
pub use patcher::{CategoryPatcher, CategoryProgress, ClipArchive};
pub use progress::{ProgressCursor, Status};
pub use storage::{FsStorage, MemoryStorage, Storage};
