//! Display capability traits
//!
//! These traits define the interface between status reporting code and
//! whatever renders the device's face.

pub mod display;

pub use display::{EmotionDisplay, NoopDisplay};
