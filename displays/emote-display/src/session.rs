//! Static emotion display session
//!
//! Owns the widgets that show the current face and the optional caption,
//! and implements [`EmotionDisplay`] on top of any [`Toolkit`] behind a
//! shared [`DisplayLock`].
//!
//! Widget layout:
//!
//! ```text
//! root (display)
//! └── container      full size, transparent, centered
//!     ├── image      full size, always bound to a face
//!     └── caption    optional, bottom-centered, hidden when empty
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use portable_atomic::{AtomicUsize, Ordering};

use emote_core::{DisplayConfig, EmotionDisplay, EmotionImage, EmotionTable, EMOTIONS};

use crate::lock::DisplayLock;
use crate::toolkit::{
    Align, LongMode, Style, TextAlign, Theme, Toolkit, ToolkitError, WidgetId, WidgetKind,
};

/// No emotion has been shown yet
const NO_EMOTION: usize = usize::MAX;

/// Widgets owned by an active session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionWidgets {
    pub container: WidgetId,
    pub image: WidgetId,
    /// None when text display is disabled
    pub caption: Option<WidgetId>,
}

/// Display session showing static emotion images
///
/// Construction builds the widget tree, so a session is always ready
/// unless a later [`setup`](Self::setup) failed. Dropping the session
/// removes its widgets from the display.
pub struct StaticEmotionDisplay<'d, M: RawMutex, T: Toolkit> {
    display: &'d DisplayLock<M, T>,
    config: DisplayConfig,
    emotions: &'static EmotionTable,
    widgets: Option<SessionWidgets>,
    /// Table index of the last emotion shown
    current: AtomicUsize,
}

impl<'d, M: RawMutex, T: Toolkit> StaticEmotionDisplay<'d, M, T> {
    /// Create a session using the built-in emotion table
    pub fn new(
        display: &'d DisplayLock<M, T>,
        config: DisplayConfig,
    ) -> Result<Self, ToolkitError> {
        Self::with_table(display, config, &EMOTIONS)
    }

    /// Create a session resolving names against a custom table
    pub fn with_table(
        display: &'d DisplayLock<M, T>,
        config: DisplayConfig,
        emotions: &'static EmotionTable,
    ) -> Result<Self, ToolkitError> {
        let mut session = Self {
            display,
            config,
            emotions,
            widgets: None,
            current: AtomicUsize::new(NO_EMOTION),
        };
        session.setup()?;
        Ok(session)
    }

    /// (Re)build the session's widgets
    ///
    /// Tears down any widgets from a previous setup first. On failure
    /// nothing built by this call is left behind and the session stays
    /// not ready until a later setup succeeds.
    pub fn setup(&mut self) -> Result<(), ToolkitError> {
        let previous = self.widgets.take();
        let config = self.config;
        let default_image = self.emotions.default_entry().image;

        let result = self.display.lock(|toolkit| {
            if let Some(widgets) = previous {
                Self::teardown(toolkit, widgets);
            }

            let root = toolkit.root();
            let container = toolkit.create(root, WidgetKind::Container)?;
            let built = Self::build(toolkit, container, &config, default_image);
            if built.is_err() {
                let _ = toolkit.destroy(container);
            }
            built
        });

        match result {
            Ok(widgets) => {
                debug!("display session ready");
                self.widgets = Some(widgets);
                Ok(())
            }
            Err(e) => {
                warn!("display session setup failed: {}", e);
                Err(e)
            }
        }
    }

    fn build(
        toolkit: &mut T,
        container: WidgetId,
        config: &DisplayConfig,
        default_image: EmotionImage,
    ) -> Result<SessionWidgets, ToolkitError> {
        let full = Size::new(config.width as u32, config.height as u32);

        toolkit.set_size(container, full)?;
        toolkit.set_style(container, Style::TRANSPARENT)?;
        toolkit.set_align(container, Align::Center)?;

        let image = toolkit.create(container, WidgetKind::Image)?;
        toolkit.set_size(image, full)?;
        toolkit.set_style(image, Style::TRANSPARENT)?;
        toolkit.set_align(image, Align::Center)?;
        toolkit.set_image(image, default_image)?;

        let caption = if config.text_display {
            let caption = toolkit.create(container, WidgetKind::Label)?;
            toolkit.set_text(caption, "")?;
            toolkit.set_size(caption, Size::new(config.caption_width() as u32, 0))?;
            toolkit.set_long_mode(caption, LongMode::Wrap)?;
            toolkit.set_style(
                caption,
                Style {
                    bg_color: Rgb565::BLACK,
                    bg_opa: config.caption_opacity,
                    pad_ver: config.caption_padding,
                    text_color: Some(Rgb565::WHITE),
                    text_align: TextAlign::Center,
                    ..Style::TRANSPARENT
                },
            )?;
            toolkit.set_align(caption, Align::BottomMid)?;
            toolkit.set_hidden(caption, true)?;
            Some(caption)
        } else {
            None
        };

        toolkit.set_theme(Theme::Dark);

        Ok(SessionWidgets {
            container,
            image,
            caption,
        })
    }

    /// Destroy caption and image before their container
    fn teardown(toolkit: &mut T, widgets: SessionWidgets) {
        if let Some(caption) = widgets.caption {
            let _ = toolkit.destroy(caption);
        }
        let _ = toolkit.destroy(widgets.image);
        let _ = toolkit.destroy(widgets.container);
    }

    /// Widgets of the active session, None if not ready
    pub fn widgets(&self) -> Option<SessionWidgets> {
        self.widgets
    }

    pub fn is_ready(&self) -> bool {
        self.widgets.is_some()
    }

    /// Check if this session has a caption label
    pub fn has_caption(&self) -> bool {
        self.widgets.is_some_and(|w| w.caption.is_some())
    }

    /// Table name of the emotion last shown
    ///
    /// After a fallback this is the default entry's name.
    pub fn current_emotion(&self) -> Option<&'static str> {
        match self.current.load(Ordering::Acquire) {
            NO_EMOTION => None,
            index => self.emotions.get(index).map(|entry| entry.name),
        }
    }

    /// The display lock this session draws through
    pub fn display(&self) -> &'d DisplayLock<M, T> {
        self.display
    }
}

impl<M: RawMutex, T: Toolkit> EmotionDisplay for StaticEmotionDisplay<'_, M, T> {
    fn set_emotion(&self, name: &str) {
        let Some(widgets) = self.widgets else {
            debug!("display not ready, ignoring emotion {}", name);
            return;
        };

        let resolution = self.emotions.resolve(name);
        let entry = self.emotions.entry(resolution);

        self.display.lock(|toolkit| {
            if toolkit.set_image(widgets.image, entry.image).is_err() {
                debug!("display not ready, ignoring emotion {}", name);
                return;
            }
            self.current.store(resolution.index(), Ordering::Release);

            if resolution.is_fallback() {
                info!("unknown emotion '{}', using {}", name, entry.name);
            } else {
                info!("set emotion: {}", name);
            }
        });
    }

    fn set_chat_message(&self, _role: &str, content: Option<&str>) {
        let Some(widgets) = self.widgets else {
            debug!("display not ready, ignoring chat message");
            return;
        };
        let Some(caption) = widgets.caption else {
            debug!("text display disabled, ignoring chat message");
            return;
        };

        self.display.lock(|toolkit| {
            let applied = match content.filter(|text| !text.is_empty()) {
                Some(text) => toolkit
                    .set_text(caption, text)
                    .and_then(|()| toolkit.set_hidden(caption, false))
                    .map(|()| info!("set chat message: {}", text)),
                None => toolkit.set_hidden(caption, true),
            };
            if applied.is_err() {
                debug!("display not ready, ignoring chat message");
            }
        });
    }
}

impl<M: RawMutex, T: Toolkit> Drop for StaticEmotionDisplay<'_, M, T> {
    fn drop(&mut self) {
        if let Some(widgets) = self.widgets.take() {
            self.display
                .lock(|toolkit| Self::teardown(toolkit, widgets));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::OPA_TRANSP;
    use crate::tree::{WidgetTree, MAX_WIDGETS};
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
    use emote_core::EmotionEntry;
    use proptest::prelude::*;

    type TestLock = DisplayLock<NoopRawMutex, WidgetTree>;

    fn display() -> TestLock {
        DisplayLock::new(WidgetTree::new(Size::new(120, 120)))
    }

    fn config(text_display: bool) -> DisplayConfig {
        DisplayConfig::with_size(120, 120).text_display(text_display)
    }

    fn image_of(
        session: &StaticEmotionDisplay<'_, NoopRawMutex, WidgetTree>,
    ) -> Option<EmotionImage> {
        let image = session.widgets().unwrap().image;
        session.display().lock(|tree| tree.get(image).and_then(|w| w.image))
    }

    /// (text, visible) of the caption
    fn caption_of(
        session: &StaticEmotionDisplay<'_, NoopRawMutex, WidgetTree>,
    ) -> (heapless::String<128>, bool) {
        let caption = session.widgets().unwrap().caption.unwrap();
        session.display().lock(|tree| {
            let widget = tree.get(caption).unwrap();
            (widget.text.clone(), !widget.hidden)
        })
    }

    #[test]
    fn test_setup_builds_tree() {
        let display = display();
        let session = StaticEmotionDisplay::new(&display, config(true)).unwrap();
        let widgets = session.widgets().unwrap();

        display.lock(|tree| {
            assert_eq!(tree.len(), 4);
            assert_eq!(tree.theme(), Theme::Dark);

            let container = tree.get(widgets.container).unwrap();
            assert_eq!(container.size, Size::new(120, 120));
            assert_eq!(container.style.bg_opa, OPA_TRANSP);
            assert_eq!(container.style.border_width, 0);

            let image = tree.get(widgets.image).unwrap();
            assert_eq!(image.parent, Some(widgets.container));
            assert_eq!(image.image, Some(EmotionImage::Neutral));

            let caption = tree.get(widgets.caption.unwrap()).unwrap();
            assert_eq!(caption.align, Align::BottomMid);
            assert_eq!(caption.style.text_align, TextAlign::Center);
            assert_eq!(caption.size.width, 108);
            assert!(caption.text.is_empty());
            assert!(caption.hidden);
        });
        assert_eq!(session.current_emotion(), None);
    }

    #[test]
    fn test_setup_without_caption() {
        let display = display();
        let session = StaticEmotionDisplay::new(&display, config(false)).unwrap();

        assert!(!session.has_caption());
        assert_eq!(display.lock(|tree| tree.len()), 3);
        assert_eq!(display.lock(|tree| tree.count_kind(WidgetKind::Label)), 0);
    }

    #[test]
    fn test_setup_twice_leaks_nothing() {
        let display = display();
        let mut session = StaticEmotionDisplay::new(&display, config(true)).unwrap();
        let first = session.widgets().unwrap();

        session.setup().unwrap();
        session.setup().unwrap();
        let second = session.widgets().unwrap();

        display.lock(|tree| {
            assert_eq!(tree.count_kind(WidgetKind::Container), 1);
            assert_eq!(tree.count_kind(WidgetKind::Image), 1);
            assert_eq!(tree.count_kind(WidgetKind::Label), 1);
            assert!(!tree.contains(first.image));
            assert!(tree.contains(second.image));
            assert_eq!(tree.children(second.container).count(), 2);
        });
    }

    #[test]
    fn test_setup_reuses_freed_slots() {
        let display = display();
        let mut session = StaticEmotionDisplay::new(&display, config(true)).unwrap();

        display.lock(|tree| {
            let root = tree.root();
            while tree.len() < MAX_WIDGETS {
                tree.create(root, WidgetKind::Container).unwrap();
            }
        });

        // Teardown frees exactly what the rebuild needs
        session.setup().unwrap();
        assert!(session.is_ready());
        assert_eq!(display.lock(|tree| tree.len()), MAX_WIDGETS);
    }

    #[test]
    fn test_setup_failure_cleans_up() {
        let display = display();
        let mut session = StaticEmotionDisplay::new(&display, config(true)).unwrap();
        let widgets = session.widgets().unwrap();

        // Someone else removes the caption and takes every free slot
        display.lock(|tree| {
            tree.destroy(widgets.caption.unwrap()).unwrap();
            let root = tree.root();
            while tree.len() < MAX_WIDGETS {
                tree.create(root, WidgetKind::Container).unwrap();
            }
        });

        // Teardown frees two slots, the rebuild needs three
        assert_eq!(session.setup(), Err(ToolkitError::OutOfWidgets));
        assert!(!session.is_ready());
        display.lock(|tree| {
            assert_eq!(tree.len(), MAX_WIDGETS - 2);
            assert_eq!(tree.count_kind(WidgetKind::Image), 0);
        });

        session.set_emotion("happy");
        session.set_chat_message("user", Some("hello"));
        assert_eq!(session.current_emotion(), None);
    }

    #[test]
    fn test_old_handles_stay_dead_across_many_setups() {
        let display = display();
        let mut session = StaticEmotionDisplay::new(&display, config(true)).unwrap();
        let first = session.widgets().unwrap();

        // Every rebuild reuses the same slots
        for _ in 0..300 {
            session.setup().unwrap();
        }
        let current = session.widgets().unwrap();

        assert_eq!(current.image.index, first.image.index);
        assert_ne!(current.image, first.image);
        display.lock(|tree| {
            assert!(!tree.contains(first.container));
            assert!(!tree.contains(first.image));
            assert!(!tree.contains(first.caption.unwrap()));
            assert_eq!(
                tree.set_image(first.image, EmotionImage::Sad),
                Err(ToolkitError::UnknownWidget)
            );
            assert_eq!(tree.get(current.image).unwrap().image, Some(EmotionImage::Neutral));
        });
    }

    #[test]
    fn test_chat_message_after_failed_setup_with_caption() {
        let display = display();
        let mut session = StaticEmotionDisplay::new(&display, config(true)).unwrap();
        let widgets = session.widgets().unwrap();

        // Someone else tears the session down and takes every slot
        display.lock(|tree| {
            tree.destroy(widgets.container).unwrap();
            let root = tree.root();
            while tree.len() < MAX_WIDGETS {
                tree.create(root, WidgetKind::Container).unwrap();
            }
        });

        assert_eq!(session.setup(), Err(ToolkitError::OutOfWidgets));
        assert!(session.config.text_display);
        assert!(!session.has_caption());

        let before = display.lock(|tree| tree.len());
        session.set_chat_message("user", Some("hello"));
        session.set_chat_message("user", None);
        assert_eq!(display.lock(|tree| tree.len()), before);
    }

    #[test]
    fn test_current_emotion_with_large_table() {
        let entries: Vec<EmotionEntry> = (0..300)
            .map(|i| {
                let name: &'static str = if i == 260 {
                    "target"
                } else {
                    Box::leak(format!("e{i}").into_boxed_str())
                };
                EmotionEntry::new(name, EmotionImage::Happy)
            })
            .collect();
        let table: &'static EmotionTable =
            Box::leak(Box::new(EmotionTable::new(entries.leak(), 0)));

        let display = display();
        let session = StaticEmotionDisplay::with_table(&display, config(false), table).unwrap();

        session.set_emotion("target");
        assert_eq!(session.current_emotion(), Some("target"));
        session.set_emotion("e255");
        assert_eq!(session.current_emotion(), Some("e255"));
        session.set_emotion("e299");
        assert_eq!(session.current_emotion(), Some("e299"));
        session.set_emotion("missing");
        assert_eq!(session.current_emotion(), Some("e0"));
    }

    #[test]
    fn test_set_emotion_binds_image() {
        let display = display();
        let session = StaticEmotionDisplay::new(&display, config(false)).unwrap();

        session.set_emotion("happy");
        assert_eq!(image_of(&session), Some(EmotionImage::Happy));
        assert_eq!(session.current_emotion(), Some("happy"));

        session.set_emotion("confused");
        assert_eq!(image_of(&session), Some(EmotionImage::Thinking));
        assert_eq!(session.current_emotion(), Some("confused"));
    }

    #[test]
    fn test_set_emotion_fallback() {
        let display = display();
        let session = StaticEmotionDisplay::new(&display, config(false)).unwrap();

        session.set_emotion("sad");
        for name in ["", "ecstatic", "HAPPY"] {
            session.set_emotion(name);
            assert_eq!(image_of(&session), Some(EmotionImage::Neutral));
            assert_eq!(session.current_emotion(), Some("neutral"));
        }
    }

    #[test]
    fn test_set_emotion_custom_table() {
        static ENTRIES: [EmotionEntry; 2] = [
            EmotionEntry::new("ok", EmotionImage::Happy),
            EmotionEntry::new("meh", EmotionImage::Neutral),
        ];
        static TABLE: EmotionTable = EmotionTable::new(&ENTRIES, 1);

        let display = display();
        let session = StaticEmotionDisplay::with_table(&display, config(false), &TABLE).unwrap();
        assert_eq!(image_of(&session), Some(EmotionImage::Neutral));

        session.set_emotion("ok");
        assert_eq!(image_of(&session), Some(EmotionImage::Happy));
        session.set_emotion("happy");
        assert_eq!(session.current_emotion(), Some("meh"));
    }

    #[test]
    fn test_not_ready_is_noop() {
        let display = display();
        let session = StaticEmotionDisplay::new(&display, config(true)).unwrap();
        let widgets = session.widgets().unwrap();

        // Someone else tore the widgets down
        display.lock(|tree| tree.destroy(widgets.container).unwrap());

        session.set_emotion("happy");
        session.set_chat_message("user", Some("hello"));
        session.set_icon("wifi_connected");

        assert_eq!(session.current_emotion(), None);
        assert_eq!(display.lock(|tree| tree.len()), 1);
    }

    #[test]
    fn test_chat_message_visibility() {
        let display = display();
        let session = StaticEmotionDisplay::new(&display, config(true)).unwrap();

        session.set_chat_message("assistant", Some("Hello there"));
        let (text, visible) = caption_of(&session);
        assert_eq!(text.as_str(), "Hello there");
        assert!(visible);

        session.set_chat_message("assistant", Some(""));
        assert!(!caption_of(&session).1);

        session.set_chat_message("assistant", Some("again"));
        session.set_chat_message("assistant", None);
        assert!(!caption_of(&session).1);
    }

    #[test]
    fn test_chat_message_idempotent() {
        let display = display();
        let session = StaticEmotionDisplay::new(&display, config(true)).unwrap();

        session.set_chat_message("user", Some("same"));
        let once = caption_of(&session);
        session.set_chat_message("user", Some("same"));
        assert_eq!(caption_of(&session), once);
    }

    #[test]
    fn test_chat_message_disabled_is_noop() {
        let display = display();
        let session = StaticEmotionDisplay::new(&display, config(false)).unwrap();
        let before = display.lock(|tree| tree.clone());

        session.set_chat_message("user", Some("ignored"));
        session.set_chat_message("user", None);

        display.lock(|tree| {
            assert_eq!(tree.len(), before.len());
            for ((id_a, a), (id_b, b)) in tree.widgets().zip(before.widgets()) {
                assert_eq!(id_a, id_b);
                assert_eq!(a.text, b.text);
                assert_eq!(a.hidden, b.hidden);
                assert_eq!(a.image, b.image);
            }
        });
    }

    #[test]
    fn test_set_icon() {
        let display = display();
        let session = StaticEmotionDisplay::new(&display, config(true)).unwrap();

        session.set_icon("wifi_connected");
        assert_eq!(session.current_emotion(), Some("happy"));
        assert_eq!(image_of(&session), Some(EmotionImage::Happy));
        let (text, visible) = caption_of(&session);
        assert_eq!(text.as_str(), "Icon: WiFi connected");
        assert!(visible);

        session.set_icon("unknown_value");
        assert_eq!(session.current_emotion(), Some("neutral"));
        assert_eq!(caption_of(&session).0.as_str(), "Icon: System status");
    }

    #[test]
    fn test_set_icon_without_caption() {
        let display = display();
        let session = StaticEmotionDisplay::new(&display, config(false)).unwrap();

        session.set_icon("battery_low");
        assert_eq!(session.current_emotion(), Some("sad"));
        assert_eq!(image_of(&session), Some(EmotionImage::Sad));
    }

    #[test]
    fn test_drop_removes_widgets() {
        let display = display();
        {
            let _session = StaticEmotionDisplay::new(&display, config(true)).unwrap();
            assert_eq!(display.lock(|tree| tree.len()), 4);
        }
        assert_eq!(display.lock(|tree| tree.len()), 1);
    }

    #[test]
    fn test_concurrent_updates_are_atomic() {
        let display: DisplayLock<CriticalSectionRawMutex, _> =
            DisplayLock::new(WidgetTree::new(Size::new(120, 120)));
        let session = StaticEmotionDisplay::new(&display, config(true)).unwrap();
        let widgets = session.widgets().unwrap();
        let caption = widgets.caption.unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..200 {
                    session.set_emotion(if i % 2 == 0 { "happy" } else { "sad" });
                }
            });
            s.spawn(|| {
                for i in 0..200 {
                    let content = if i % 3 == 0 { None } else { Some("status update") };
                    session.set_chat_message("system", content);
                }
            });
            s.spawn(|| {
                for i in 0..200 {
                    session.set_icon(if i % 2 == 0 { "wifi_connected" } else { "battery_low" });
                }
            });
            s.spawn(|| {
                for _ in 0..400 {
                    display.lock(|tree| {
                        assert!(tree.get(widgets.image).unwrap().image.is_some());
                        let label = tree.get(caption).unwrap();
                        // Shown captions are never empty
                        assert!(label.hidden || !label.text.is_empty());
                    });
                }
            });
        });

        display.lock(|tree| {
            assert_eq!(tree.count_kind(WidgetKind::Image), 1);
            assert_eq!(tree.count_kind(WidgetKind::Label), 1);
        });
    }

    proptest! {
        #[test]
        fn test_visibility_follows_content(contents in proptest::collection::vec(
            proptest::option::of("[a-z ]{0,12}"), 1..12,
        )) {
            let display = display();
            let session = StaticEmotionDisplay::new(&display, config(true)).unwrap();

            for content in &contents {
                session.set_chat_message("user", content.as_deref());
                let (text, visible) = caption_of(&session);
                match content.as_deref() {
                    Some(c) if !c.is_empty() => {
                        prop_assert!(visible);
                        prop_assert_eq!(text.as_str(), c);
                    }
                    _ => prop_assert!(!visible),
                }
            }
        }
    }
}
