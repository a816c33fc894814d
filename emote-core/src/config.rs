//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether sessions build the caption label unless configured otherwise
pub const TEXT_DISPLAY_DEFAULT: bool = cfg!(feature = "text-display");

/// Display session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Panel width in pixels
    pub width: u16,
    /// Panel height in pixels
    pub height: u16,
    /// Build the caption label; when false all caption calls are no-ops
    pub text_display: bool,
    /// Caption width as a percentage of the panel width
    pub caption_width_percent: u8,
    /// Vertical padding inside the caption, in pixels
    pub caption_padding: u8,
    /// Caption background opacity (0 = transparent, 255 = opaque)
    pub caption_opacity: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 360,
            height: 360,
            text_display: TEXT_DISPLAY_DEFAULT,
            caption_width_percent: 90,
            caption_padding: 5,
            // 70% of full coverage
            caption_opacity: 178,
        }
    }
}

impl DisplayConfig {
    /// Default configuration for a panel of the given size
    pub fn with_size(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Same configuration with text display switched on or off
    pub fn text_display(self, enabled: bool) -> Self {
        Self {
            text_display: enabled,
            ..self
        }
    }

    /// Caption label width in pixels
    pub fn caption_width(&self) -> u16 {
        let percent = self.caption_width_percent.min(100) as u32;
        (self.width as u32 * percent / 100) as u16
    }
}

/// Status tracker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusConfig {
    /// Report low battery at or below this level (%)
    pub battery_low_percent: u8,
    /// Re-arm the low battery report at or above this level (%)
    pub battery_clear_percent: u8,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            battery_low_percent: 15,
            battery_clear_percent: 20,
        }
    }
}
