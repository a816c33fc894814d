//! Emotion display trait

use crate::icon::{self, SYSTEM_ROLE};

/// Something that can show an emotion and a caption
///
/// Implementations decide how faces are drawn (static images here,
/// animations or vector faces elsewhere). All methods take `&self` and
/// never fail: unknown input falls back to a default, and a display that
/// is not ready ignores the call.
pub trait EmotionDisplay {
    /// Show the face for a symbolic emotion name
    ///
    /// Unknown or empty names show the default face.
    fn set_emotion(&self, name: &str);

    /// Show a caption, or hide it when `content` is `None` or empty
    ///
    /// `role` names the speaker. It is accepted for interface
    /// compatibility and not rendered.
    fn set_chat_message(&self, role: &str, content: Option<&str>);

    /// Show a status icon as a face plus an "Icon: ..." caption
    ///
    /// Composes [`set_emotion`](Self::set_emotion) and
    /// [`set_chat_message`](Self::set_chat_message) and takes no locks of
    /// its own.
    fn set_icon(&self, name: &str) {
        let status = icon::status_for(name);
        self.set_emotion(status.emotion);
        self.set_chat_message(SYSTEM_ROLE, Some(status.caption().as_str()));
        info!("set icon: {}", name);
    }
}

impl<T: EmotionDisplay + ?Sized> EmotionDisplay for &T {
    fn set_emotion(&self, name: &str) {
        (**self).set_emotion(name)
    }

    fn set_chat_message(&self, role: &str, content: Option<&str>) {
        (**self).set_chat_message(role, content)
    }

    fn set_icon(&self, name: &str) {
        (**self).set_icon(name)
    }
}

/// [`EmotionDisplay`] implementation that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDisplay;

impl EmotionDisplay for NoopDisplay {
    fn set_emotion(&self, _name: &str) {}

    fn set_chat_message(&self, _role: &str, _content: Option<&str>) {}
}
