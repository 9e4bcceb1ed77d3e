//! One-shot scan of which resources are already on disk.

use crate::config::Layout;
use crate::error::Result;
use crate::manifest::{BundlePart, Manifest, SoundCategory};
use crate::storage::Storage;

/// Presence of every manifest entry, plus totals over the missing ones.
///
/// Computed once by [`Inventory::scan`] and never updated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    music_present: Vec<bool>,
    categories_present: Vec<(SoundCategory, bool)>,
    bundle_present: bool,
    missing_count: usize,
    missing_kb: u32,
}

impl Inventory {
    /// Check every manifest entry against local storage.
    ///
    /// Creates the audio directory if it does not exist yet. That is the only
    /// write this performs.
    pub fn scan<S: Storage + ?Sized>(
        manifest: &Manifest,
        layout: &Layout,
        storage: &S,
    ) -> Result<Self> {
        storage.create_dir_all(&layout.audio_dir())?;

        let mut missing_count = 0;
        let mut missing_kb = 0;

        let bundle_present = storage.exists(&layout.default_zip_path());
        if !bundle_present {
            missing_count += BundlePart::ALL.len();
            missing_kb += manifest.bundle_size_kb();
        }

        let music_present: Vec<bool> = manifest
            .music
            .iter()
            .map(|track| {
                let present = storage.exists(&layout.music_path(track));
                if !present {
                    missing_count += 1;
                    missing_kb += track.size_kb;
                }
                present
            })
            .collect();

        let categories_present = manifest
            .categories
            .iter()
            .map(|&category| {
                let present = storage.exists(&layout.category_path(category));
                if !present {
                    missing_count += category.clips().len();
                    missing_kb += category.size_kb();
                }
                (category, present)
            })
            .collect();

        let inventory = Self {
            music_present,
            categories_present,
            bundle_present,
            missing_count,
            missing_kb,
        };

        tracing::info!(
            missing = inventory.missing_count,
            size_mb = inventory.download_size_mb(),
            "Scanned local resources"
        );

        Ok(inventory)
    }

    /// Whether nothing needs to be downloaded.
    #[must_use]
    pub fn all_present(&self) -> bool {
        self.missing_count == 0
    }

    /// Number of resources that will be fetched.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.missing_count
    }

    /// Approximate download size in kilobytes.
    #[must_use]
    pub fn missing_kilobytes(&self) -> u32 {
        self.missing_kb
    }

    /// Approximate download size in megabytes, for display.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn download_size_mb(&self) -> f32 {
        self.missing_kb as f32 / 1024.0
    }

    /// Whether the music track at `index` in the manifest is already present.
    #[must_use]
    pub fn music_present(&self, index: usize) -> bool {
        self.music_present.get(index).copied().unwrap_or(false)
    }

    /// Whether a category's archive is already present.
    #[must_use]
    pub fn category_present(&self, category: SoundCategory) -> bool {
        self.categories_present
            .iter()
            .any(|&(c, present)| c == category && present)
    }

    /// Whether `default.zip` is already present, making the bundle unnecessary.
    #[must_use]
    pub fn bundle_present(&self) -> bool {
        self.bundle_present
    }
}
