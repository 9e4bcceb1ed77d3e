//! Per-category sound clip resolution.
//!
//! Each [`SoundCategory`] is fetched clip by clip and packed into a single
//! archive (`audio/dig.bin`, `audio/step.bin`). The archive is only written
//! once every clip has arrived, so a present archive is always complete.

use bytes::{BufMut, BytesMut};

use crate::config::{Layout, Sources};
use crate::engine::{DownloadEngine, FetchResult};
use crate::error::{Error, Result};
use crate::manifest::SoundCategory;
use crate::progress::{ProgressCursor, Status};
use crate::storage::Storage;

/// Append-only builder for a category archive.
///
/// The archive is a plain concatenation of records, in clip order:
///
/// | field       | encoding         |
/// |-------------|------------------|
/// | name length | `u16` LE         |
/// | name        | UTF-8            |
/// | data length | `u32` LE         |
/// | data        | raw clip bytes   |
#[derive(Debug, Default)]
pub struct ClipArchive {
    buf: BytesMut,
    clips: usize,
}

impl ClipArchive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one clip record.
    ///
    /// Leaves the archive untouched if the name or data length does not fit
    /// its length field.
    pub fn push(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let name_len = u16::try_from(name.len()).map_err(|_| Error::Archive {
            name: name.to_string(),
            detail: format!("name is {} bytes, limit is {}", name.len(), u16::MAX),
        })?;
        let data_len = u32::try_from(data.len()).map_err(|_| Error::Archive {
            name: name.to_string(),
            detail: format!("data is {} bytes, limit is {}", data.len(), u32::MAX),
        })?;

        self.buf.reserve(2 + name.len() + 4 + data.len());
        self.buf.put_u16_le(name_len);
        self.buf.put_slice(name.as_bytes());
        self.buf.put_u32_le(data_len);
        self.buf.put_slice(data);
        self.clips += 1;
        Ok(())
    }

    /// Number of clips appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clips
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips == 0
    }

    /// The encoded records so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipState {
    /// Primary request submitted.
    Requested,
    /// Primary yielded no data, fallback request submitted.
    Fallback,
    Resolved,
    Failed,
}

#[derive(Debug)]
struct Clip {
    name: &'static str,
    key: String,
    fallback_url: Option<String>,
    state: ClipState,
}

impl Clip {
    fn fallback_key(&self) -> String {
        format!("{}_fallback", self.key)
    }
}

/// Outcome of checking a category for new results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryProgress {
    /// At least one clip has not arrived yet.
    Pending,
    /// A clip failed on every source; carries the clip key.
    Failed(String),
    /// Every clip arrived and the archive was written.
    Done,
}

/// Resolves every clip of one sound category.
///
/// `done` flips from false to true exactly once, when the last clip arrives,
/// or at construction when the category archive is already on disk.
#[derive(Debug)]
pub struct CategoryPatcher {
    category: SoundCategory,
    clips: Vec<Clip>,
    /// Index of the first clip that is not resolved yet.
    next: usize,
    archive: Option<ClipArchive>,
    done: bool,
}

impl CategoryPatcher {
    /// Create a patcher for a category whose archive is missing.
    #[must_use]
    pub fn new(category: SoundCategory) -> Self {
        let clips = category
            .clips()
            .iter()
            .map(|&name| Clip {
                name,
                key: category.clip_key(name),
                fallback_url: None,
                state: ClipState::Requested,
            })
            .collect();

        Self {
            category,
            clips,
            next: 0,
            archive: Some(ClipArchive::new()),
            done: false,
        }
    }

    /// Create a patcher for a category whose archive is already present.
    #[must_use]
    pub fn already_present(category: SoundCategory) -> Self {
        Self {
            category,
            clips: Vec::new(),
            next: 0,
            archive: None,
            done: true,
        }
    }

    /// The category this patcher resolves.
    #[must_use]
    pub fn category(&self) -> SoundCategory {
        self.category
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Key of the first clip still expected, shown as the next resource.
    #[must_use]
    pub fn next_name(&self) -> Option<&str> {
        self.clips.get(self.next).map(|clip| clip.key.as_str())
    }

    /// Submit one request per missing clip.
    pub fn fetch_files<E: DownloadEngine + ?Sized>(&mut self, sources: &Sources, engine: &mut E) {
        if self.done {
            return;
        }

        for clip in &mut self.clips {
            clip.fallback_url = sources.clip_fallback_url(self.category, clip.name);
            engine.submit(&sources.clip_url(self.category, clip.name), &clip.key);
        }

        tracing::debug!(
            category = self.category.name(),
            clips = self.clips.len(),
            "Requested sound clips"
        );
    }

    /// Collect every clip result that has arrived, in clip order.
    ///
    /// Stops at the first clip without a result. Each arrival advances the
    /// status line to the following clip, or to `next_phase` after the last
    /// clip. When the last clip arrives the archive is written to its
    /// category path.
    pub fn check_downloaded<E, S, F>(
        &mut self,
        engine: &mut E,
        layout: &Layout,
        storage: &S,
        cursor: &mut ProgressCursor,
        next_phase: Option<&str>,
        set_status: &mut F,
    ) -> Result<CategoryProgress>
    where
        E: DownloadEngine + ?Sized,
        S: Storage + ?Sized,
        F: FnMut(Status),
    {
        if self.done {
            return Ok(CategoryProgress::Done);
        }

        while let Some(clip) = self.clips.get_mut(self.next) {
            match clip.state {
                ClipState::Failed => return Ok(CategoryProgress::Failed(clip.key.clone())),
                ClipState::Resolved => {
                    self.next += 1;
                    continue;
                }
                ClipState::Requested | ClipState::Fallback => {}
            }

            let key = if clip.state == ClipState::Fallback {
                clip.fallback_key()
            } else {
                clip.key.clone()
            };

            let Some(result) = engine.try_get_result(&key) else {
                return Ok(CategoryProgress::Pending);
            };

            match result {
                FetchResult::Data(data) => {
                    tracing::info!(key = %key, bytes = data.len(), "Got resource");
                    if let Some(archive) = self.archive.as_mut()
                        && let Err(e) = archive.push(clip.name, &data)
                    {
                        tracing::error!(key = %key, "{}", e);
                        clip.state = ClipState::Failed;
                        return Ok(CategoryProgress::Failed(clip.key.clone()));
                    }
                    clip.state = ClipState::Resolved;
                    self.next += 1;

                    if let Some(next) = self.clips.get(self.next) {
                        set_status(cursor.advance(&next.key));
                    } else if let Some(next_phase) = next_phase {
                        set_status(cursor.advance(next_phase));
                    }
                }
                FetchResult::Failed => {
                    if clip.state == ClipState::Requested
                        && let Some(url) = clip.fallback_url.as_deref()
                    {
                        tracing::warn!(key = %key, url, "Clip unavailable, trying fallback source");
                        engine.submit(url, &clip.fallback_key());
                        clip.state = ClipState::Fallback;
                        return Ok(CategoryProgress::Pending);
                    }

                    tracing::error!(key = %key, "Clip unavailable from every source");
                    clip.state = ClipState::Failed;
                    return Ok(CategoryProgress::Failed(clip.key.clone()));
                }
            }
        }

        // Kept until the write succeeds, so a failed write is retried on the
        // next check.
        if let Some(archive) = self.archive.as_ref() {
            let path = layout.category_path(self.category);
            storage.write(&path, archive.as_bytes())?;
            tracing::info!(
                category = self.category.name(),
                clips = archive.len(),
                path = %path.display(),
                "Wrote sound archive"
            );
        }
        self.archive = None;

        self.done = true;
        Ok(CategoryProgress::Done)
    }
}
