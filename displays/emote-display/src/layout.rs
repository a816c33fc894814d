//! Label text layout
//!
//! Labels use one fixed monospace font, so layout is character counting.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoFont;

use crate::toolkit::LongMode;

/// Font used by every label
pub const LABEL_FONT: &MonoFont<'static> = &FONT_6X10;

/// Horizontal advance of one character in pixels
pub fn char_advance() -> u32 {
    LABEL_FONT.character_size.width + LABEL_FONT.character_spacing
}

/// Height of one text line in pixels
pub fn line_height() -> u32 {
    LABEL_FONT.character_size.height
}

/// Characters that fit into `width` pixels, at least one
pub fn chars_per_line(width: u32) -> usize {
    ((width / char_advance()) as usize).max(1)
}

/// Split `text` into display lines
pub fn lines(text: &str, max_chars: usize, mode: LongMode) -> Lines<'_> {
    Lines {
        rest: text,
        max_chars: max_chars.max(1),
        mode,
    }
}

/// Number of display lines `text` occupies
pub fn line_count(text: &str, max_chars: usize, mode: LongMode) -> usize {
    lines(text, max_chars, mode).count()
}

/// Iterator over the lines of a label
pub struct Lines<'a> {
    rest: &'a str,
    max_chars: usize,
    mode: LongMode,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        let (segment, after) = match self.rest.find('\n') {
            Some(pos) => (&self.rest[..pos], &self.rest[pos + 1..]),
            None => (self.rest, ""),
        };

        // Byte offset just past `max_chars` characters, if the segment is longer
        let cut = segment.char_indices().nth(self.max_chars).map(|(i, _)| i);

        let cut = match (cut, self.mode) {
            (None, _) | (Some(_), LongMode::Clip) => {
                self.rest = after;
                return Some(segment);
            }
            (Some(cut), LongMode::Wrap) => cut,
        };

        // Prefer breaking at the last space that keeps the line within bounds
        let head = &segment[..cut];
        let line = match head.rfind(' ') {
            _ if segment[cut..].starts_with(' ') => {
                self.rest = self.rest[cut..].trim_start_matches(' ');
                head
            }
            Some(space) if space > 0 => {
                self.rest = self.rest[space..].trim_start_matches(' ');
                &head[..space]
            }
            _ => {
                self.rest = &self.rest[cut..];
                head
            }
        };

        Some(line.trim_end_matches(' '))
    }
}
