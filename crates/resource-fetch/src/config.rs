//! Remote endpoints and the local file layout.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::manifest::{BundlePart, MusicTrack, SoundCategory};

const CLASSIC_JAR_URL: &str =
    "http://s3.amazonaws.com/Minecraft.Download/versions/c0.30_01c/c0.30_01c.jar";
const MODERN_JAR_URL: &str = "http://s3.amazonaws.com/Minecraft.Download/versions/1.6.2/1.6.2.jar";
const TERRAIN_PATCH_URL: &str = "http://static.classicube.net/terrain-patch.png";
const GUI_PATCH_URL: &str = "http://static.classicube.net/gui.png";
const DIG_SOUNDS_URL: &str = "http://s3.amazonaws.com/MinecraftResources/sound3/dig/";
const STEP_SOUNDS_URL: &str = "http://s3.amazonaws.com/MinecraftResources/newsound/step/";
const DIG_FALLBACK_URL: &str = "http://s3.amazonaws.com/MinecraftResources/sound3/random/";
const MUSIC_URL: &str = "http://s3.amazonaws.com/MinecraftResources/music/";
const NEW_MUSIC_URL: &str = "http://s3.amazonaws.com/MinecraftResources/newmusic/";

/// Number of leading music tracks served from the legacy music endpoint.
const LEGACY_MUSIC_TRACKS: usize = 3;

/// Remote locations of every resource.
///
/// Defaults are the fixed, versioned endpoints. Any field can be overridden
/// from JSON; missing fields keep their default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Sources {
    pub classic_jar: String,
    pub modern_jar: String,
    pub terrain_patch: String,
    pub gui_patch: String,
    /// Base URL for dig clips, ending in `/`.
    pub dig_sounds: String,
    /// Base URL for step clips, ending in `/`.
    pub step_sounds: String,
    /// Base URL tried for a dig clip when the primary yields no data.
    pub dig_fallback: Option<String>,
    /// Base URL tried for a step clip when the primary yields no data.
    pub step_fallback: Option<String>,
    pub music: String,
    pub new_music: String,
    /// Tracks with a manifest index below this come from `music`, the rest
    /// from `new_music`.
    pub legacy_music_tracks: usize,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            classic_jar: CLASSIC_JAR_URL.to_string(),
            modern_jar: MODERN_JAR_URL.to_string(),
            terrain_patch: TERRAIN_PATCH_URL.to_string(),
            gui_patch: GUI_PATCH_URL.to_string(),
            dig_sounds: DIG_SOUNDS_URL.to_string(),
            step_sounds: STEP_SOUNDS_URL.to_string(),
            dig_fallback: Some(DIG_FALLBACK_URL.to_string()),
            step_fallback: None,
            music: MUSIC_URL.to_string(),
            new_music: NEW_MUSIC_URL.to_string(),
            legacy_music_tracks: LEGACY_MUSIC_TRACKS,
        }
    }
}

impl Sources {
    /// Parse overrides from a JSON document and validate the result.
    pub fn from_json(json: &str) -> Result<Self> {
        let sources: Sources = serde_json::from_str(json).map_err(|e| Error::Config {
            context: "sources",
            detail: e.to_string(),
        })?;
        sources.validate()?;
        Ok(sources)
    }

    /// Check that every base URL can have a file name appended to it.
    pub fn validate(&self) -> Result<()> {
        let bases = [
            ("dig_sounds", Some(&self.dig_sounds)),
            ("step_sounds", Some(&self.step_sounds)),
            ("dig_fallback", self.dig_fallback.as_ref()),
            ("step_fallback", self.step_fallback.as_ref()),
            ("music", Some(&self.music)),
            ("new_music", Some(&self.new_music)),
        ];
        for (name, base) in bases {
            if let Some(base) = base
                && !base.ends_with('/')
            {
                return Err(Error::Config {
                    context: "sources",
                    detail: format!("{name} must end with '/', got '{base}'"),
                });
            }
        }
        Ok(())
    }

    /// URL of a bundle part.
    #[must_use]
    pub fn bundle_url(&self, part: BundlePart) -> &str {
        match part {
            BundlePart::ClassicJar => &self.classic_jar,
            BundlePart::ModernJar => &self.modern_jar,
            BundlePart::TerrainPatch => &self.terrain_patch,
            BundlePart::GuiPatch => &self.gui_patch,
        }
    }

    /// URL of a music track, chosen by its position in the manifest.
    #[must_use]
    pub fn music_url(&self, index: usize, track: &MusicTrack) -> String {
        let base = if index < self.legacy_music_tracks {
            &self.music
        } else {
            &self.new_music
        };
        format!("{base}{}.ogg", track.name)
    }

    /// Primary URL of a sound clip.
    #[must_use]
    pub fn clip_url(&self, category: SoundCategory, clip: &str) -> String {
        let base = match category {
            SoundCategory::Dig => &self.dig_sounds,
            SoundCategory::Step => &self.step_sounds,
        };
        format!("{base}{clip}.ogg")
    }

    /// Fallback URL of a sound clip, if the category has one.
    #[must_use]
    pub fn clip_fallback_url(&self, category: SoundCategory, clip: &str) -> Option<String> {
        let base = match category {
            SoundCategory::Dig => self.dig_fallback.as_ref(),
            SoundCategory::Step => self.step_fallback.as_ref(),
        };
        base.map(|base| format!("{base}{clip}.ogg"))
    }
}

/// Local paths, all rooted at the application directory.
#[derive(Debug, Clone)]
pub struct Layout {
    app_dir: PathBuf,
}

impl Layout {
    #[must_use]
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
        }
    }

    /// Root directory everything is stored under.
    #[must_use]
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// `<appDir>/audio`
    #[must_use]
    pub fn audio_dir(&self) -> PathBuf {
        self.app_dir.join("audio")
    }

    /// `<appDir>/audio/<track>.ogg`
    #[must_use]
    pub fn music_path(&self, track: &MusicTrack) -> PathBuf {
        self.audio_dir().join(format!("{}.ogg", track.name))
    }

    /// `<appDir>/audio/<category>.bin`
    #[must_use]
    pub fn category_path(&self, category: SoundCategory) -> PathBuf {
        self.audio_dir().join(format!("{}.bin", category.name()))
    }

    /// `<appDir>/default.zip`, whose presence decides whether the bundle is
    /// fetched at all.
    #[must_use]
    pub fn default_zip_path(&self) -> PathBuf {
        self.app_dir.join("default.zip")
    }
}
