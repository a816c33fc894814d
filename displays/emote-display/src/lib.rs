//! Static emotion display session and shared display components
//!
//! This crate provides:
//! - `Toolkit` trait for the retained-mode widget toolkit a session draws with
//! - `DisplayLock` shared by every piece of code drawing on the panel
//! - `StaticEmotionDisplay`, the session showing one face image and an
//!   optional caption
//! - `WidgetTree`, an in-memory toolkit, and `Canvas`, which paints it to
//!   any `embedded-graphics` RGB565 draw target
//! - `StatusFeed`, a queue of system status events for the display task
//!
//! # Architecture
//!
//! Status reporting code talks to the `EmotionDisplay` trait from
//! `emote-core`. A session resolves names to images there and mutates its
//! widgets under the display lock. Rendering is a separate pass: whoever
//! owns the panel takes the lock, paints the tree with a `Canvas` and
//! flushes, so faces and captions never tear against other drawing.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod canvas;
pub mod feed;
pub mod layout;
pub mod lock;
pub mod session;
pub mod toolkit;
pub mod tree;

// Re-export key types
pub use canvas::{AssetSource, Canvas, RawAssets};
pub use feed::{StatusFeed, STATUS_QUEUE_SIZE};
pub use lock::DisplayLock;
pub use session::{SessionWidgets, StaticEmotionDisplay};
pub use toolkit::{Toolkit, ToolkitError, WidgetId, WidgetKind};
pub use tree::WidgetTree;
