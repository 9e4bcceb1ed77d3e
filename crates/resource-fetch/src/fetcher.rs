//! The resource fetcher: scan, dispatch, then poll until ready.
//!
//! Resources resolve in a fixed order that mirrors the single progress line
//! shown to the user:
//!
//! 1. Missing music tracks, in manifest order
//! 2. Each missing sound category, clip by clip
//! 3. The bundle parts, when `default.zip` is absent
//!
//! The fetcher keeps an explicit position in that order, so each
//! [`poll`](ResourceFetcher::poll) resumes where the previous one stopped and
//! never looks past an item whose result has not arrived.

use std::collections::HashMap;

use crate::config::{Layout, Sources};
use crate::engine::{DownloadEngine, FetchResult};
use crate::error::Result;
use crate::inventory::Inventory;
use crate::manifest::{BundlePart, Manifest, ResourceKind};
use crate::patcher::{CategoryPatcher, CategoryProgress};
use crate::progress::{ProgressCursor, Status};
use crate::storage::Storage;

/// One step of the resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Music track, by manifest index.
    Music(usize),
    /// Sound category, by index into the fetcher's patchers.
    Category(usize),
    Bundle(BundlePart),
}

/// Result of looking up a single keyed item.
enum ItemPoll {
    Pending,
    Failed,
    Data(Vec<u8>),
}

/// The four bundle payloads, handed over once all have arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub classic_jar: Vec<u8>,
    pub modern_jar: Vec<u8>,
    pub terrain_patch: Vec<u8>,
    pub gui_patch: Vec<u8>,
}

/// Coordinates scanning, dispatching and polling of every required resource.
///
/// # Example
///
/// ```ignore
/// let mut fetcher = ResourceFetcher::new(Layout::new(app_dir), FsStorage);
/// fetcher.scan()?;
/// fetcher.dispatch(&mut engine, |status| println!("{status}"))?;
/// while !fetcher.poll(&mut engine, |status| println!("{status}"))? {
///     // Render a frame, then poll again.
/// }
/// ```
pub struct ResourceFetcher<S: Storage> {
    manifest: Manifest,
    sources: Sources,
    layout: Layout,
    storage: S,
    inventory: Option<Inventory>,
    steps: Vec<Step>,
    /// Index of the first unresolved step.
    position: usize,
    patchers: Vec<CategoryPatcher>,
    bundle: HashMap<BundlePart, Vec<u8>>,
    /// Music payload taken from the engine whose write has not succeeded yet.
    unwritten: Option<Vec<u8>>,
    cursor: ProgressCursor,
    failure: Option<String>,
    dispatched: bool,
    done: bool,
}

impl<S: Storage> ResourceFetcher<S> {
    /// Create a fetcher with the standard manifest and default endpoints.
    #[must_use]
    pub fn new(layout: Layout, storage: S) -> Self {
        Self {
            manifest: Manifest::standard(),
            sources: Sources::default(),
            layout,
            storage,
            inventory: None,
            steps: Vec::new(),
            position: 0,
            patchers: Vec::new(),
            bundle: HashMap::new(),
            unwritten: None,
            cursor: ProgressCursor::default(),
            failure: None,
            dispatched: false,
            done: false,
        }
    }

    /// Use custom endpoints.
    #[must_use]
    pub fn with_sources(mut self, sources: Sources) -> Self {
        self.sources = sources;
        self
    }

    /// Use a custom manifest.
    #[must_use]
    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Check which resources are already present and compute the totals.
    ///
    /// Only the first call scans; later calls return the same inventory.
    pub fn scan(&mut self) -> Result<&Inventory> {
        let inventory = match self.inventory.take() {
            Some(inventory) => inventory,
            None => {
                let inventory = Inventory::scan(&self.manifest, &self.layout, &self.storage)?;
                self.cursor = ProgressCursor::new(inventory.missing_count());
                inventory
            }
        };
        Ok(&*self.inventory.insert(inventory))
    }

    /// Submit a request for every missing resource and emit the first status.
    ///
    /// Scans first if [`scan`](Self::scan) has not been called. Requests are
    /// only submitted once; repeated calls do nothing.
    pub fn dispatch<E, F>(&mut self, engine: &mut E, mut set_status: F) -> Result<()>
    where
        E: DownloadEngine + ?Sized,
        F: FnMut(Status),
    {
        if self.dispatched {
            return Ok(());
        }
        self.scan()?;
        let Some(inventory) = self.inventory.as_ref() else {
            return Ok(());
        };

        for (index, track) in self.manifest.music.iter().enumerate() {
            if inventory.music_present(index) {
                continue;
            }
            let url = self.sources.music_url(index, track);
            tracing::debug!(key = track.name, url = %url, "Requesting music track");
            engine.submit(&url, track.name);
            self.steps.push(Step::Music(index));
        }

        for &category in self.manifest.categories {
            let mut patcher = if inventory.category_present(category) {
                CategoryPatcher::already_present(category)
            } else {
                CategoryPatcher::new(category)
            };
            patcher.fetch_files(&self.sources, &mut *engine);
            if !patcher.is_done() {
                self.steps.push(Step::Category(self.patchers.len()));
            }
            self.patchers.push(patcher);
        }

        if !inventory.bundle_present() {
            for part in BundlePart::ALL {
                tracing::debug!(key = part.key(), "Requesting bundle part");
                engine.submit(self.sources.bundle_url(part), part.key());
                self.steps.push(Step::Bundle(part));
            }
        }

        self.dispatched = true;
        tracing::info!(requests = self.steps.len(), "Dispatched resource requests");

        if let Some(name) = self.step_name(0) {
            let status = self.cursor.advance(&name);
            set_status(status);
        }
        Ok(())
    }

    /// Collect whatever results have arrived, in resolution order.
    ///
    /// Returns `Ok(true)` once every resource is ready, and keeps returning it
    /// without further work. Returns `Ok(false)` while something is pending,
    /// and forever after a resource failed to download. Storage errors are
    /// returned as errors.
    pub fn poll<E, F>(&mut self, engine: &mut E, mut set_status: F) -> Result<bool>
    where
        E: DownloadEngine + ?Sized,
        F: FnMut(Status),
    {
        if self.done {
            return Ok(true);
        }
        if !self.dispatched || self.failure.is_some() {
            return Ok(false);
        }

        while let Some(&step) = self.steps.get(self.position) {
            let next_name = self.step_name(self.position + 1);

            match step {
                Step::Music(index) => {
                    let track = self.manifest.music[index];
                    let data = match self.unwritten.take() {
                        Some(data) => data,
                        None => match self.take_item(
                            &mut *engine,
                            track.name,
                            track.name,
                            ResourceKind::MusicTrack,
                            &mut set_status,
                        ) {
                            ItemPoll::Data(data) => data,
                            ItemPoll::Pending | ItemPoll::Failed => return Ok(false),
                        },
                    };
                    // The engine hands each result out once, so the payload is
                    // held for the next poll until it is on disk.
                    if let Err(e) = self.storage.write(&self.layout.music_path(&track), &data) {
                        self.unwritten = Some(data);
                        return Err(e);
                    }
                }
                Step::Category(index) => {
                    let progress = self.patchers[index].check_downloaded(
                        &mut *engine,
                        &self.layout,
                        &self.storage,
                        &mut self.cursor,
                        next_name.as_deref(),
                        &mut set_status,
                    )?;
                    match progress {
                        CategoryProgress::Pending => return Ok(false),
                        CategoryProgress::Failed(key) => {
                            set_status(Status::Failed { name: key.clone() });
                            self.failure = Some(key);
                            return Ok(false);
                        }
                        // The patcher already advanced the status line.
                        CategoryProgress::Done => {
                            self.position += 1;
                            continue;
                        }
                    }
                }
                Step::Bundle(part) => {
                    let data = match self.take_item(
                        &mut *engine,
                        part.key(),
                        part.failure_name(),
                        part.kind(),
                        &mut set_status,
                    ) {
                        ItemPoll::Data(data) => data,
                        ItemPoll::Pending | ItemPoll::Failed => return Ok(false),
                    };
                    self.bundle.insert(part, data);
                }
            }

            self.position += 1;
            if let Some(name) = next_name {
                set_status(self.cursor.advance(&name));
            } else if step == Step::Bundle(BundlePart::GuiPatch) {
                set_status(Status::CreatingBundle);
            }
        }

        self.done = true;
        tracing::info!(resources = self.cursor.total(), "All resources ready");
        Ok(true)
    }

    /// Look up one keyed item, recording and reporting a failure.
    fn take_item<E, F>(
        &mut self,
        engine: &mut E,
        key: &str,
        name: &str,
        kind: ResourceKind,
        set_status: &mut F,
    ) -> ItemPoll
    where
        E: DownloadEngine + ?Sized,
        F: FnMut(Status),
    {
        match engine.try_get_result(key) {
            None => ItemPoll::Pending,
            Some(FetchResult::Failed) => {
                tracing::error!(key, ?kind, "Failed to download resource");
                set_status(Status::Failed {
                    name: name.to_string(),
                });
                self.failure = Some(name.to_string());
                ItemPoll::Failed
            }
            Some(FetchResult::Data(data)) => {
                tracing::info!(key, ?kind, bytes = data.len(), "Got resource");
                ItemPoll::Data(data)
            }
        }
    }

    /// Status name of the step at `position`, if there is one.
    fn step_name(&self, position: usize) -> Option<String> {
        match *self.steps.get(position)? {
            Step::Music(index) => Some(self.manifest.music[index].name.to_string()),
            Step::Category(index) => self.patchers[index].next_name().map(str::to_string),
            Step::Bundle(part) => Some(part.status_name().to_string()),
        }
    }

    /// Whether every resource is ready.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Name of the resource that failed to download, freezing progress.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// The scan result, once [`scan`](Self::scan) has run.
    #[must_use]
    pub fn inventory(&self) -> Option<&Inventory> {
        self.inventory.as_ref()
    }

    /// The progress cursor.
    #[must_use]
    pub fn cursor(&self) -> ProgressCursor {
        self.cursor
    }

    /// The patcher for each manifest category, in manifest order.
    #[must_use]
    pub fn patchers(&self) -> &[CategoryPatcher] {
        &self.patchers
    }

    /// Take the bundle payloads once all four parts have arrived.
    ///
    /// Returns `None` before that, or if the bundle was already taken.
    pub fn take_bundle(&mut self) -> Option<Bundle> {
        if !BundlePart::ALL.iter().all(|part| self.bundle.contains_key(part)) {
            return None;
        }
        let mut take = |part: BundlePart| self.bundle.remove(&part).unwrap_or_default();
        Some(Bundle {
            classic_jar: take(BundlePart::ClassicJar),
            modern_jar: take(BundlePart::ModernJar),
            terrain_patch: take(BundlePart::TerrainPatch),
            gui_patch: take(BundlePart::GuiPatch),
        })
    }

    /// The storage resources are written to.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The local path scheme.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}
