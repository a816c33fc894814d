//! Emotion resolver
//!
//! Maps symbolic emotion names onto the small set of faces the panel can
//! show. Many names share one face; anything unrecognized shows the
//! table's default face.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Distinct face images available on the panel
///
/// Opaque to this crate: the display layer decides how each variant is
/// stored and drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum EmotionImage {
    Neutral = 0,
    Happy = 1,
    Sad = 2,
    Angry = 3,
    Surprised = 4,
    Thinking = 5,
}

impl EmotionImage {
    /// Number of distinct images
    pub const COUNT: usize = 6;

    /// All images in index order
    pub const ALL: [EmotionImage; Self::COUNT] = [
        EmotionImage::Neutral,
        EmotionImage::Happy,
        EmotionImage::Sad,
        EmotionImage::Angry,
        EmotionImage::Surprised,
        EmotionImage::Thinking,
    ];

    /// Dense index, usable for asset arrays
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One row of the emotion table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmotionEntry {
    /// Symbolic name, unique within its table
    pub name: &'static str,
    /// Face shown for this name
    pub image: EmotionImage,
}

impl EmotionEntry {
    pub const fn new(name: &'static str, image: EmotionImage) -> Self {
        Self { name, image }
    }
}

/// Outcome of resolving a name against a table
///
/// Both variants carry the index of the entry that will be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// The name was found at this index
    Matched(usize),
    /// The name was not found; this is the default entry's index
    Fallback(usize),
}

impl Resolution {
    /// Index of the entry to display
    pub const fn index(self) -> usize {
        match self {
            Resolution::Matched(index) | Resolution::Fallback(index) => index,
        }
    }

    pub const fn is_fallback(self) -> bool {
        matches!(self, Resolution::Fallback(_))
    }
}

/// Ordered, immutable emotion table with one designated default entry
#[derive(Debug, Clone, Copy)]
pub struct EmotionTable {
    entries: &'static [EmotionEntry],
    default: usize,
}

impl EmotionTable {
    /// Create a table
    ///
    /// Panics (at compile time when used in a `static`) if `default` is not
    /// a valid index into `entries`.
    pub const fn new(entries: &'static [EmotionEntry], default: usize) -> Self {
        assert!(default < entries.len(), "default entry out of range");
        Self { entries, default }
    }

    /// Resolve a name
    ///
    /// Linear scan; the first entry with an equal name wins. Empty and
    /// unknown names resolve to the default entry.
    pub fn resolve(&self, name: &str) -> Resolution {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .map_or(Resolution::Fallback(self.default), Resolution::Matched)
    }

    /// Resolve a name straight to the image to show
    pub fn image(&self, name: &str) -> EmotionImage {
        self.entry(self.resolve(name)).image
    }

    /// Entry selected by a resolution from this table
    pub fn entry(&self, resolution: Resolution) -> &'static EmotionEntry {
        self.entries
            .get(resolution.index())
            .unwrap_or(&self.entries[self.default])
    }

    /// Entry at an index, if any
    pub fn get(&self, index: usize) -> Option<&'static EmotionEntry> {
        self.entries.get(index)
    }

    /// The designated default entry
    pub fn default_entry(&self) -> &'static EmotionEntry {
        &self.entries[self.default]
    }

    pub fn entries(&self) -> &'static [EmotionEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Name of the default emotion
pub const DEFAULT_EMOTION: &str = "neutral";

const EMOTION_ENTRIES: [EmotionEntry; 20] = [
    EmotionEntry::new(DEFAULT_EMOTION, EmotionImage::Neutral),
    EmotionEntry::new("happy", EmotionImage::Happy),
    EmotionEntry::new("sad", EmotionImage::Sad),
    EmotionEntry::new("angry", EmotionImage::Angry),
    EmotionEntry::new("surprised", EmotionImage::Surprised),
    EmotionEntry::new("thinking", EmotionImage::Thinking),
    EmotionEntry::new("laughing", EmotionImage::Happy),
    EmotionEntry::new("funny", EmotionImage::Happy),
    EmotionEntry::new("loving", EmotionImage::Happy),
    EmotionEntry::new("embarrassed", EmotionImage::Happy),
    EmotionEntry::new("confident", EmotionImage::Happy),
    EmotionEntry::new("delicious", EmotionImage::Happy),
    EmotionEntry::new("crying", EmotionImage::Sad),
    EmotionEntry::new("sleepy", EmotionImage::Sad),
    EmotionEntry::new("silly", EmotionImage::Happy),
    EmotionEntry::new("shocked", EmotionImage::Surprised),
    EmotionEntry::new("winking", EmotionImage::Happy),
    EmotionEntry::new("relaxed", EmotionImage::Neutral),
    EmotionEntry::new("confused", EmotionImage::Thinking),
    EmotionEntry::new("idle", EmotionImage::Neutral),
];

/// The process-wide emotion table
pub static EMOTIONS: EmotionTable = EmotionTable::new(&EMOTION_ENTRIES, 0);
