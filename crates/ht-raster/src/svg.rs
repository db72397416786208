use std::fmt::Write as _;

use ht_core::{Image, Polyline2f, Rgba8};
use log::debug;
use resvg::{tiny_skia, usvg};

use crate::error::RasterError;
use crate::source::RasterSource;

/// Renders SVG markup onto a transparent `size x size` canvas.
///
/// The document is scaled independently along each axis so its viewport
/// fills the canvas.
pub fn render_svg(markup: &str, size: usize) -> Result<Image<Rgba8>, RasterError> {
    if size == 0 {
        return Err(RasterError::ZeroSize);
    }
    let side = u32::try_from(size).map_err(|_| RasterError::TooLarge(size))?;

    let tree = usvg::Tree::from_str(markup, &usvg::Options::default())?;
    let doc = tree.size();
    if doc.width() <= 0.0 || doc.height() <= 0.0 {
        return Err(RasterError::EmptyViewport);
    }

    let mut pixmap = tiny_skia::Pixmap::new(side, side).ok_or(RasterError::ZeroSize)?;
    let transform =
        tiny_skia::Transform::from_scale(side as f32 / doc.width(), side as f32 / doc.height());
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    debug!(
        "rendered {}x{} svg drawing onto {size}x{size} canvas",
        doc.width(),
        doc.height()
    );

    let data = pixmap
        .pixels()
        .iter()
        .map(|px| {
            let c = px.demultiply();
            Rgba8::new(c.red(), c.green(), c.blue(), c.alpha())
        })
        .collect();
    Ok(Image::from_vec(size, size, data)?)
}

/// Serialized vector drawing of the user's strokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDrawing {
    markup: String,
}

impl SvgDrawing {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    /// Black round-capped polylines on a transparent `view_size` square.
    pub fn from_strokes(strokes: &[Polyline2f], view_size: f32, stroke_width: f32) -> Self {
        let mut markup = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{view_size}" height="{view_size}" viewBox="0 0 {view_size} {view_size}">"#
        );
        for stroke in strokes.iter().filter(|s| !s.is_empty()) {
            markup.push_str(r#"<polyline points=""#);
            for (i, p) in stroke.points.iter().enumerate() {
                if i > 0 {
                    markup.push(' ');
                }
                let _ = write!(markup, "{},{}", p.x, p.y);
            }
            let _ = write!(
                markup,
                r#"" fill="none" stroke="black" stroke-width="{stroke_width}" stroke-linecap="round" stroke-linejoin="round"/>"#
            );
        }
        markup.push_str("</svg>");
        Self { markup }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl RasterSource for SvgDrawing {
    fn render(&self, size: usize) -> Result<Image<Rgba8>, RasterError> {
        render_svg(&self.markup, size)
    }
}
