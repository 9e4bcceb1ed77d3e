//! The compiled-in list of resources the client needs before it can run.
//!
//! Sizes are approximate and in kilobytes; they only feed the progress
//! display, never verification.

/// The kind of a required resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// A game archive (jar).
    Archive,
    /// A PNG overlay applied on top of the archive textures.
    ImagePatch,
    /// A short sound effect, packed into its category's archive.
    SoundClip,
    /// A background music track.
    MusicTrack,
}

/// A background music track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MusicTrack {
    /// Track name, doubling as the fetch key and the local file stem.
    pub name: &'static str,
    /// Approximate download size in kilobytes.
    pub size_kb: u32,
}

impl MusicTrack {
    #[must_use]
    pub const fn new(name: &'static str, size_kb: u32) -> Self {
        Self { name, size_kb }
    }
}

/// The music tracks, in resolution order.
pub const MUSIC_TRACKS: &[MusicTrack] = &[
    MusicTrack::new("calm1", 2472),
    MusicTrack::new("calm2", 1931),
    MusicTrack::new("calm3", 2181),
    MusicTrack::new("hal1", 1926),
    MusicTrack::new("hal2", 1714),
    MusicTrack::new("hal3", 1879),
    MusicTrack::new("hal4", 2499),
];

const DIG_CLIPS: &[&str] = &[
    "cloth1", "cloth2", "cloth3", "cloth4", "glass1", "glass2", "glass3", "grass1", "grass2",
    "grass3", "grass4", "gravel1", "gravel2", "gravel3", "gravel4", "sand1", "sand2", "sand3",
    "sand4", "snow1", "snow2", "snow3", "snow4", "stone1", "stone2", "stone3", "stone4", "wood1",
    "wood2", "wood3", "wood4",
];

const STEP_CLIPS: &[&str] = &[
    "cloth1", "cloth2", "cloth3", "cloth4", "grass1", "grass2", "grass3", "grass4", "gravel1",
    "gravel2", "gravel3", "gravel4", "sand1", "sand2", "sand3", "sand4", "snow1", "snow2", "snow3",
    "snow4", "stone1", "stone2", "stone3", "stone4", "wood1", "wood2", "wood3", "wood4",
];

/// A group of same-kind sound clips stored together in one archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCategory {
    /// Block breaking sounds.
    Dig,
    /// Footstep sounds.
    Step,
}

impl SoundCategory {
    /// Logical category name, also the archive file stem.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SoundCategory::Dig => "dig",
            SoundCategory::Step => "step",
        }
    }

    /// Clip names in resolution order.
    #[must_use]
    pub fn clips(self) -> &'static [&'static str] {
        match self {
            SoundCategory::Dig => DIG_CLIPS,
            SoundCategory::Step => STEP_CLIPS,
        }
    }

    /// Approximate size of the whole category in kilobytes.
    #[must_use]
    pub fn size_kb(self) -> u32 {
        match self {
            SoundCategory::Dig => 173,
            SoundCategory::Step => 244,
        }
    }

    /// Fetch key for a clip. Clip names repeat across categories, so the
    /// category name is part of the key (`dig_cloth1`).
    #[must_use]
    pub fn clip_key(self, clip: &str) -> String {
        format!("{}_{clip}", self.name())
    }
}

/// One of the four items making up the legacy bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundlePart {
    ClassicJar,
    ModernJar,
    TerrainPatch,
    GuiPatch,
}

impl BundlePart {
    /// All parts, in resolution order.
    pub const ALL: [BundlePart; 4] = [
        BundlePart::ClassicJar,
        BundlePart::ModernJar,
        BundlePart::TerrainPatch,
        BundlePart::GuiPatch,
    ];

    /// Fixed fetch key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            BundlePart::ClassicJar => "classic_jar",
            BundlePart::ModernJar => "162_jar",
            BundlePart::TerrainPatch => "terrain_patch",
            BundlePart::GuiPatch => "gui_patch",
        }
    }

    /// Name shown while this part is the next one expected.
    #[must_use]
    pub fn status_name(self) -> &'static str {
        match self {
            BundlePart::ClassicJar => "classic jar",
            BundlePart::ModernJar => "1.6.2 jar",
            BundlePart::TerrainPatch => "terrain patch",
            BundlePart::GuiPatch => "gui",
        }
    }

    /// Name used when reporting that this part failed to download.
    #[must_use]
    pub fn failure_name(self) -> &'static str {
        match self {
            BundlePart::ClassicJar => "classic jar",
            BundlePart::ModernJar => "1.6.2 jar",
            BundlePart::TerrainPatch => "terrain.png patch",
            BundlePart::GuiPatch => "gui.png patch",
        }
    }

    #[must_use]
    pub fn kind(self) -> ResourceKind {
        match self {
            BundlePart::ClassicJar | BundlePart::ModernJar => ResourceKind::Archive,
            BundlePart::TerrainPatch | BundlePart::GuiPatch => ResourceKind::ImagePatch,
        }
    }

    /// Approximate download size in kilobytes.
    #[must_use]
    pub fn size_kb(self) -> u32 {
        match self {
            BundlePart::ClassicJar => 291,
            BundlePart::ModernJar => 4621,
            BundlePart::TerrainPatch => 7,
            BundlePart::GuiPatch => 21,
        }
    }
}

/// The full set of resources, immutable for the lifetime of the process.
#[derive(Debug, Clone, Copy)]
pub struct Manifest {
    /// Music tracks in resolution order.
    pub music: &'static [MusicTrack],
    /// Sound categories in resolution order.
    pub categories: &'static [SoundCategory],
}

impl Manifest {
    /// The manifest the client ships with.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            music: MUSIC_TRACKS,
            categories: &[SoundCategory::Dig, SoundCategory::Step],
        }
    }

    /// Combined size of the bundle parts in kilobytes.
    #[must_use]
    pub fn bundle_size_kb(&self) -> u32 {
        BundlePart::ALL.iter().map(|part| part.size_kb()).sum()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_keys_are_unique_across_categories() {
        let mut keys: Vec<String> = [SoundCategory::Dig, SoundCategory::Step]
            .iter()
            .flat_map(|c| c.clips().iter().map(move |clip| c.clip_key(clip)))
            .collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(total, 31 + 28);
    }

    #[test]
    fn test_bundle_size() {
        assert_eq!(Manifest::standard().bundle_size_kb(), 291 + 4621 + 7 + 21);
    }

    #[test]
    fn test_bundle_kinds() {
        assert_eq!(BundlePart::ModernJar.kind(), ResourceKind::Archive);
        assert_eq!(BundlePart::GuiPatch.kind(), ResourceKind::ImagePatch);
    }
}
