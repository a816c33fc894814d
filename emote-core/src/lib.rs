//! Board-agnostic core logic for the emotion display
//!
//! This crate contains everything that does not depend on a graphics
//! toolkit or a panel:
//!
//! - Emotion resolver (symbolic name to face image)
//! - Icon mapping (status icon to emotion and caption)
//! - Display capability trait implemented by display sessions
//! - System status tracking (network, microphone, battery edges)
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod emotion;
pub mod icon;
pub mod status;
pub mod traits;

pub use config::{DisplayConfig, StatusConfig};
pub use emotion::{EmotionEntry, EmotionImage, EmotionTable, Resolution, EMOTIONS};
pub use icon::{Icon, IconStatus, DEFAULT_STATUS};
pub use status::{StatusTracker, SystemEvent};
pub use traits::{EmotionDisplay, NoopDisplay};
