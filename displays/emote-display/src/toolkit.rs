//! Widget toolkit trait
//!
//! The narrow slice of a retained-mode graphics toolkit that a display
//! session needs: create and destroy widgets, size and place them, style
//! them, and bind an image or text.

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

use emote_core::EmotionImage;

/// Toolkit errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToolkitError {
    /// No free widget slots
    OutOfWidgets,
    /// Widget was destroyed or never existed
    UnknownWidget,
    /// Parent cannot hold children
    NotAContainer,
    /// The root widget cannot be destroyed
    RootWidget,
}

/// Handle to a widget
///
/// Handles carry a generation so a handle to a destroyed widget never
/// aliases a newer widget in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WidgetId {
    pub(crate) index: u8,
    pub(crate) generation: u32,
}

/// Widget types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetKind {
    /// The display's root container
    Screen,
    /// Plain container for other widgets
    Container,
    /// Shows one emotion image
    Image,
    /// Shows text
    Label,
}

impl WidgetKind {
    /// Check if widgets of this kind can have children
    pub fn is_container(self) -> bool {
        matches!(self, WidgetKind::Screen | WidgetKind::Container)
    }
}

/// Placement inside the parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    TopLeft,
    TopMid,
    #[default]
    Center,
    BottomMid,
}

/// Horizontal text alignment inside a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// How a label handles text wider than itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LongMode {
    /// Break at word boundaries and grow downwards
    #[default]
    Wrap,
    /// Cut off at the right edge
    Clip,
}

/// Fully transparent
pub const OPA_TRANSP: u8 = 0;

/// Fully opaque
pub const OPA_COVER: u8 = 255;

/// Visual style of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Style {
    /// Background fill color
    pub bg_color: Rgb565,
    /// Background opacity (0 = transparent)
    pub bg_opa: u8,
    /// Border width in pixels
    pub border_width: u8,
    /// Horizontal padding in pixels
    pub pad_hor: u8,
    /// Vertical padding in pixels
    pub pad_ver: u8,
    /// Text color, None to use the theme's
    pub text_color: Option<Rgb565>,
    pub text_align: TextAlign,
}

impl Style {
    /// Invisible box: no background, border or padding
    pub const TRANSPARENT: Style = Style {
        bg_color: Rgb565::BLACK,
        bg_opa: OPA_TRANSP,
        border_width: 0,
        pad_hor: 0,
        pad_ver: 0,
        text_color: None,
        text_align: TextAlign::Left,
    };
}

impl Default for Style {
    fn default() -> Self {
        Self {
            bg_color: Rgb565::WHITE,
            bg_opa: OPA_COVER,
            border_width: 1,
            pad_hor: 4,
            pad_ver: 4,
            text_color: None,
            text_align: TextAlign::Left,
        }
    }
}

/// Display-wide color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Screen background color
    pub fn background(self) -> Rgb565 {
        match self {
            Theme::Light => Rgb565::WHITE,
            Theme::Dark => Rgb565::BLACK,
        }
    }

    /// Default text color
    pub fn text(self) -> Rgb565 {
        match self {
            Theme::Light => Rgb565::BLACK,
            Theme::Dark => Rgb565::WHITE,
        }
    }
}

/// Widget toolkit trait
///
/// Implementations own every widget; callers only hold [`WidgetId`]s.
/// Setters on a destroyed widget return [`ToolkitError::UnknownWidget`].
pub trait Toolkit {
    /// The root container covering the whole display
    fn root(&self) -> WidgetId;


    /// Create a widget as the last child of `parent`
    fn create(&mut self, parent: WidgetId, kind: WidgetKind) -> Result<WidgetId, ToolkitError>;

    /// Destroy a widget and all of its children
    fn destroy(&mut self, widget: WidgetId) -> Result<(), ToolkitError>;

    /// Set the widget size
    ///
    /// A label height of 0 sizes the label to its content.
    fn set_size(&mut self, widget: WidgetId, size: Size) -> Result<(), ToolkitError>;

    /// Place the widget inside its parent
    fn set_align(&mut self, widget: WidgetId, align: Align) -> Result<(), ToolkitError>;

    fn set_style(&mut self, widget: WidgetId, style: Style) -> Result<(), ToolkitError>;

    /// Bind the image an image widget displays
    fn set_image(&mut self, widget: WidgetId, image: EmotionImage) -> Result<(), ToolkitError>;

    /// Set label text, truncating what does not fit
    fn set_text(&mut self, widget: WidgetId, text: &str) -> Result<(), ToolkitError>;

    fn set_long_mode(&mut self, widget: WidgetId, mode: LongMode) -> Result<(), ToolkitError>;

    /// Hide or show a widget and its children
    fn set_hidden(&mut self, widget: WidgetId, hidden: bool) -> Result<(), ToolkitError>;

    /// Apply a display-wide theme
    fn set_theme(&mut self, theme: Theme);
}
