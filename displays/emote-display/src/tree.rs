//! In-memory widget tree
//!
//! A fixed-capacity retained widget tree implementing [`Toolkit`]. It holds
//! widget state and layout only; [`Canvas`](crate::canvas::Canvas) paints it.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use heapless::String;

use emote_core::EmotionImage;

use crate::layout;
use crate::toolkit::{
    Align, LongMode, Style, Theme, Toolkit, ToolkitError, WidgetId, WidgetKind,
};

/// Maximum live widgets, including the root
pub const MAX_WIDGETS: usize = 16;

/// Maximum label text length in bytes
pub const MAX_TEXT_LEN: usize = 128;

/// Root widget slot
const ROOT_INDEX: usize = 0;

/// Widget state
#[derive(Debug, Clone)]
pub struct Widget {
    pub kind: WidgetKind,
    /// None only for the root
    pub parent: Option<WidgetId>,
    /// Size in pixels; a label height of 0 means "fit content"
    pub size: Size,
    pub align: Align,
    pub style: Style,
    pub hidden: bool,
    /// Bound image (image widgets only)
    pub image: Option<EmotionImage>,
    /// Label text (labels only)
    pub text: String<MAX_TEXT_LEN>,
    pub long_mode: LongMode,
    /// Creation order, used to draw siblings back to front
    seq: u32,
}

impl Widget {
    fn new(kind: WidgetKind, parent: Option<WidgetId>, seq: u32) -> Self {
        Self {
            kind,
            parent,
            size: Size::zero(),
            align: Align::default(),
            style: Style::default(),
            hidden: false,
            image: None,
            text: String::new(),
            long_mode: LongMode::default(),
            seq,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    widget: Option<Widget>,
}

/// Fixed-capacity widget tree
#[derive(Debug, Clone)]
pub struct WidgetTree {
    slots: [Slot; MAX_WIDGETS],
    theme: Theme,
    next_seq: u32,
}

impl WidgetTree {
    /// Create a tree with only a root screen of the given resolution
    pub fn new(resolution: Size) -> Self {
        let mut slots: [Slot; MAX_WIDGETS] = core::array::from_fn(|_| Slot::default());

        let mut root = Widget::new(WidgetKind::Screen, None, 0);
        root.size = resolution;
        root.style = Style::TRANSPARENT;
        slots[ROOT_INDEX].widget = Some(root);

        Self {
            slots,
            theme: Theme::default(),
            next_seq: 1,
        }
    }

    /// Get a live widget
    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.widget.as_ref()
    }

    fn get_mut(&mut self, id: WidgetId) -> Result<&mut Widget, ToolkitError> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .ok_or(ToolkitError::UnknownWidget)?;
        if slot.generation != id.generation {
            return Err(ToolkitError::UnknownWidget);
        }
        slot.widget.as_mut().ok_or(ToolkitError::UnknownWidget)
    }

    fn id_at(&self, index: usize) -> WidgetId {
        WidgetId {
            index: index as u8,
            generation: self.slots[index].generation,
        }
    }

    /// Check if a handle refers to a live widget
    pub fn contains(&self, id: WidgetId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live widgets, including the root
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.widget.is_some()).count()
    }

    /// Always false: the root cannot be destroyed
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All live widgets in slot order
    pub fn widgets(&self) -> impl Iterator<Item = (WidgetId, &Widget)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.widget.as_ref().map(|w| {
                (
                    WidgetId {
                        index: index as u8,
                        generation: slot.generation,
                    },
                    w,
                )
            })
        })
    }

    /// Children of `parent` in creation order
    pub fn children(&self, parent: WidgetId) -> Children<'_> {
        Children {
            tree: self,
            parent,
            after: None,
        }
    }

    /// Count live widgets of one kind
    pub fn count_kind(&self, kind: WidgetKind) -> usize {
        self.widgets().filter(|(_, w)| w.kind == kind).count()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Check if a widget and all its ancestors are shown
    pub fn is_visible(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.get(id) {
                Some(widget) if !widget.hidden => current = widget.parent,
                _ => return false,
            }
        }
        true
    }

    /// Absolute on-screen area of a widget
    pub fn area(&self, id: WidgetId) -> Option<Rectangle> {
        let widget = self.get(id)?;
        let size = self.resolved_size(widget);

        let Some(parent) = widget.parent else {
            return Some(Rectangle::new(Point::zero(), size));
        };
        let parent_area = self.area(parent)?;
        let free_w = parent_area.size.width as i32 - size.width as i32;
        let free_h = parent_area.size.height as i32 - size.height as i32;

        let offset = match widget.align {
            Align::TopLeft => Point::zero(),
            Align::TopMid => Point::new(free_w / 2, 0),
            Align::Center => Point::new(free_w / 2, free_h / 2),
            Align::BottomMid => Point::new(free_w / 2, free_h),
        };

        Some(Rectangle::new(parent_area.top_left + offset, size))
    }

    /// Size after resolving content-sized labels
    fn resolved_size(&self, widget: &Widget) -> Size {
        if widget.kind != WidgetKind::Label || widget.size.height != 0 {
            return widget.size;
        }

        let inset = 2 * (widget.style.border_width as u32);
        let lines = layout::line_count(
            &widget.text,
            layout::chars_per_line(self.text_width(widget)),
            widget.long_mode,
        ) as u32;
        let height = lines * layout::line_height() + 2 * (widget.style.pad_ver as u32) + inset;
        Size::new(widget.size.width, height)
    }

    /// Width available to label text inside padding and border
    pub(crate) fn text_width(&self, widget: &Widget) -> u32 {
        let inset = 2 * (widget.style.border_width as u32 + widget.style.pad_hor as u32);
        widget.size.width.saturating_sub(inset)
    }

    /// Free a slot and everything below it
    fn free(&mut self, index: usize) {
        let id = self.id_at(index);
        for child in 0..MAX_WIDGETS {
            let is_child = self.slots[child]
                .widget
                .as_ref()
                .is_some_and(|w| w.parent == Some(id));
            if is_child {
                self.free(child);
            }
        }

        let slot = &mut self.slots[index];
        slot.widget = None;
        slot.generation = slot.generation.wrapping_add(1);
    }
}

impl Toolkit for WidgetTree {
    fn root(&self) -> WidgetId {
        self.id_at(ROOT_INDEX)
    }

    fn create(&mut self, parent: WidgetId, kind: WidgetKind) -> Result<WidgetId, ToolkitError> {
        let parent_kind = self.get(parent).ok_or(ToolkitError::UnknownWidget)?.kind;
        if !parent_kind.is_container() {
            return Err(ToolkitError::NotAContainer);
        }
        if kind == WidgetKind::Screen {
            return Err(ToolkitError::RootWidget);
        }

        let index = self
            .slots
            .iter()
            .position(|s| s.widget.is_none())
            .ok_or(ToolkitError::OutOfWidgets)?;

        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.slots[index].widget = Some(Widget::new(kind, Some(parent), seq));

        Ok(self.id_at(index))
    }

    fn destroy(&mut self, widget: WidgetId) -> Result<(), ToolkitError> {
        if widget == self.root() {
            return Err(ToolkitError::RootWidget);
        }
        self.get(widget).ok_or(ToolkitError::UnknownWidget)?;
        self.free(widget.index as usize);
        Ok(())
    }

    fn set_size(&mut self, widget: WidgetId, size: Size) -> Result<(), ToolkitError> {
        self.get_mut(widget)?.size = size;
        Ok(())
    }

    fn set_align(&mut self, widget: WidgetId, align: Align) -> Result<(), ToolkitError> {
        self.get_mut(widget)?.align = align;
        Ok(())
    }

    fn set_style(&mut self, widget: WidgetId, style: Style) -> Result<(), ToolkitError> {
        self.get_mut(widget)?.style = style;
        Ok(())
    }

    fn set_image(&mut self, widget: WidgetId, image: EmotionImage) -> Result<(), ToolkitError> {
        self.get_mut(widget)?.image = Some(image);
        Ok(())
    }

    fn set_text(&mut self, widget: WidgetId, text: &str) -> Result<(), ToolkitError> {
        let widget = self.get_mut(widget)?;
        widget.text.clear();

        // Truncate at a character boundary
        let mut end = text.len().min(MAX_TEXT_LEN);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let _ = widget.text.push_str(&text[..end]);
        Ok(())
    }

    fn set_long_mode(&mut self, widget: WidgetId, mode: LongMode) -> Result<(), ToolkitError> {
        self.get_mut(widget)?.long_mode = mode;
        Ok(())
    }

    fn set_hidden(&mut self, widget: WidgetId, hidden: bool) -> Result<(), ToolkitError> {
        self.get_mut(widget)?.hidden = hidden;
        Ok(())
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}

/// Iterator over a widget's children in creation order
pub struct Children<'a> {
    tree: &'a WidgetTree,
    parent: WidgetId,
    after: Option<u32>,
}

impl<'a> Iterator for Children<'a> {
    type Item = (WidgetId, &'a Widget);

    fn next(&mut self) -> Option<Self::Item> {
        let after = self.after;
        let parent = self.parent;
        let next = self
            .tree
            .widgets()
            .filter(|(_, w)| w.parent == Some(parent))
            .filter(|(_, w)| after.map_or(true, |seq| w.seq > seq))
            .min_by_key(|(_, w)| w.seq)?;
        self.after = Some(next.1.seq);
        Some(next)
    }
}
