//! Widget tree renderer
//!
//! Paints a [`WidgetTree`] onto any RGB565 `embedded-graphics` draw
//! target. Siblings are drawn back to front in creation order; hidden
//! widgets and everything below them are skipped.

use embedded_graphics::image::{Image, ImageRaw};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use emote_core::EmotionImage;

use crate::layout::{self, LABEL_FONT};
use crate::toolkit::{TextAlign, Theme, Toolkit, WidgetId, WidgetKind, OPA_COVER, OPA_TRANSP};
use crate::tree::{Widget, WidgetTree};

/// Pixel data for emotion images
pub trait AssetSource {
    /// Frame for an image, None if this source has no pixels for it
    fn frame(&self, image: EmotionImage) -> Option<ImageRaw<'_, Rgb565>>;
}

/// Raw big-endian RGB565 frames, one per image, all the same width
pub struct RawAssets<'a> {
    frames: [&'a [u8]; EmotionImage::COUNT],
    width: u32,
}

impl<'a> RawAssets<'a> {
    /// Frames indexed by [`EmotionImage::index`]; empty slices have no pixels
    pub const fn new(frames: [&'a [u8]; EmotionImage::COUNT], width: u32) -> Self {
        Self { frames, width }
    }
}

impl AssetSource for RawAssets<'_> {
    fn frame(&self, image: EmotionImage) -> Option<ImageRaw<'_, Rgb565>> {
        let data = self.frames[image.index()];
        if data.is_empty() || self.width == 0 {
            return None;
        }
        Some(ImageRaw::new(data, self.width))
    }
}

/// Mix `fg` over `bg` with opacity `opa` (0 = all `bg`, 255 = all `fg`)
pub fn blend(fg: Rgb565, bg: Rgb565, opa: u8) -> Rgb565 {
    let mix = |f: u8, b: u8| -> u8 {
        let opa = opa as u16;
        ((f as u16 * opa + b as u16 * (255 - opa)) / 255) as u8
    };
    Rgb565::new(mix(fg.r(), bg.r()), mix(fg.g(), bg.g()), mix(fg.b(), bg.b()))
}

/// Renders widget trees using an asset source
pub struct Canvas<A: AssetSource> {
    assets: A,
}

impl<A: AssetSource> Canvas<A> {
    pub fn new(assets: A) -> Self {
        Self { assets }
    }

    /// Paint the whole tree
    pub fn render<D>(&self, tree: &WidgetTree, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let theme = tree.theme();
        target.clear(theme.background())?;
        self.draw_children(tree, tree.root(), theme, target)
    }

    fn draw_children<D>(
        &self,
        tree: &WidgetTree,
        parent: WidgetId,
        theme: Theme,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        for (id, widget) in tree.children(parent) {
            if widget.hidden {
                continue;
            }
            let Some(area) = tree.area(id) else {
                continue;
            };

            self.draw_box(widget, area, theme, target)?;
            match widget.kind {
                WidgetKind::Image => self.draw_image(widget, area, target)?,
                WidgetKind::Label => self.draw_label(tree, widget, area, theme, target)?,
                WidgetKind::Screen | WidgetKind::Container => {}
            }
            self.draw_children(tree, id, theme, target)?;
        }
        Ok(())
    }

    /// Background and border
    fn draw_box<D>(
        &self,
        widget: &Widget,
        area: Rectangle,
        theme: Theme,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let style = &widget.style;
        let mut builder = PrimitiveStyleBuilder::new();

        if style.bg_opa != OPA_TRANSP {
            let fill = if style.bg_opa == OPA_COVER {
                style.bg_color
            } else {
                // No read-back: blend against the theme background
                blend(style.bg_color, theme.background(), style.bg_opa)
            };
            builder = builder.fill_color(fill);
        }
        if style.border_width > 0 {
            builder = builder
                .stroke_color(theme.text())
                .stroke_width(style.border_width as u32);
        }

        if style.bg_opa == OPA_TRANSP && style.border_width == 0 {
            return Ok(());
        }
        area.into_styled(builder.build()).draw(target)
    }

    fn draw_image<D>(
        &self,
        widget: &Widget,
        area: Rectangle,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(frame) = widget.image.and_then(|image| self.assets.frame(image)) else {
            return Ok(());
        };

        let size = frame.size();
        let offset = Point::new(
            (area.size.width as i32 - size.width as i32) / 2,
            (area.size.height as i32 - size.height as i32) / 2,
        );
        Image::new(&frame, area.top_left + offset).draw(&mut target.clipped(&area))
    }

    fn draw_label<D>(
        &self,
        tree: &WidgetTree,
        widget: &Widget,
        area: Rectangle,
        theme: Theme,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let style = &widget.style;
        let inset_x = style.border_width as i32 + style.pad_hor as i32;
        let inset_y = style.border_width as i32 + style.pad_ver as i32;
        let inner = Rectangle::new(
            area.top_left + Point::new(inset_x, inset_y),
            Size::new(
                area.size.width.saturating_sub(2 * inset_x as u32),
                area.size.height.saturating_sub(2 * inset_y as u32),
            ),
        );

        let character_style =
            MonoTextStyle::new(LABEL_FONT, style.text_color.unwrap_or(theme.text()));
        let (alignment, x) = match style.text_align {
            TextAlign::Left => (Alignment::Left, inner.top_left.x),
            TextAlign::Center => (Alignment::Center, inner.center().x),
            TextAlign::Right => (Alignment::Right, inner.top_left.x + inner.size.width as i32),
        };
        let text_style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(Baseline::Top)
            .build();

        let max_chars = layout::chars_per_line(tree.text_width(widget));
        let mut clipped = target.clipped(&inner);
        let mut y = inner.top_left.y;
        for line in layout::lines(&widget.text, max_chars, widget.long_mode) {
            Text::with_text_style(line, Point::new(x, y), character_style, text_style)
                .draw(&mut clipped)?;
            y += layout::line_height() as i32;
        }
        Ok(())
    }
}
