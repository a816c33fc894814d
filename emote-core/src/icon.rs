//! Status icon mapping
//!
//! System status code reports icons by name. This display has no icon
//! glyphs, so each icon is shown as a face plus a short caption instead.

use core::fmt::Write;

use heapless::String;

use crate::emotion::DEFAULT_EMOTION;

/// Prefix of every icon caption
pub const CAPTION_PREFIX: &str = "Icon: ";

/// Capacity of a composed icon caption
pub const MAX_CAPTION_LEN: usize = 48;

/// Role passed with icon captions
pub const SYSTEM_ROLE: &str = "system";

/// Emotion and phrase an icon is displayed as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IconStatus {
    /// Emotion name, resolved through the emotion table
    pub emotion: &'static str,
    /// Human readable status phrase
    pub phrase: &'static str,
}

impl IconStatus {
    /// Compose the caption shown for this status
    ///
    /// Phrases are short fixed strings, so the caption always fits.
    pub fn caption(&self) -> String<MAX_CAPTION_LEN> {
        let mut caption = String::new();
        let _ = write!(caption, "{}{}", CAPTION_PREFIX, self.phrase);
        caption
    }
}

/// Status shown for icons that are not recognized
pub const DEFAULT_STATUS: IconStatus = IconStatus {
    emotion: DEFAULT_EMOTION,
    phrase: "System status",
};

/// Recognized status icons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    WifiConnected,
    WifiDisconnected,
    MicrophoneMuted,
    MicrophoneUnmuted,
    BatteryLow,
}

impl Icon {
    /// All recognized icons
    pub const ALL: [Icon; 5] = [
        Icon::WifiConnected,
        Icon::WifiDisconnected,
        Icon::MicrophoneMuted,
        Icon::MicrophoneUnmuted,
        Icon::BatteryLow,
    ];

    /// Symbolic name used by callers
    pub const fn name(self) -> &'static str {
        match self {
            Icon::WifiConnected => "wifi_connected",
            Icon::WifiDisconnected => "wifi_disconnected",
            Icon::MicrophoneMuted => "microphone_muted",
            Icon::MicrophoneUnmuted => "microphone_unmuted",
            Icon::BatteryLow => "battery_low",
        }
    }

    /// Look up an icon by symbolic name
    pub fn from_name(name: &str) -> Option<Icon> {
        Self::ALL.into_iter().find(|icon| icon.name() == name)
    }

    /// Emotion and phrase for this icon
    pub const fn status(self) -> IconStatus {
        match self {
            Icon::WifiConnected => IconStatus {
                emotion: "happy",
                phrase: "WiFi connected",
            },
            Icon::WifiDisconnected => IconStatus {
                emotion: "sad",
                phrase: "WiFi disconnected",
            },
            Icon::MicrophoneMuted => IconStatus {
                emotion: "neutral",
                phrase: "Microphone muted",
            },
            Icon::MicrophoneUnmuted => IconStatus {
                emotion: "happy",
                phrase: "Microphone on",
            },
            Icon::BatteryLow => IconStatus {
                emotion: "sad",
                phrase: "Low battery",
            },
        }
    }
}

/// Status for an icon name, falling back to [`DEFAULT_STATUS`]
pub fn status_for(name: &str) -> IconStatus {
    Icon::from_name(name).map_or(DEFAULT_STATUS, Icon::status)
}
