use std::sync::Arc;

use ht_raster::{RasterSource, ReferenceGlyph, SvgDrawing};
use log::{info, warn};

use crate::comparator::{Comparator, ComparisonOutcome};
use crate::error::CompareError;

/// The glyph currently being practiced.
#[derive(Debug, Default, Clone)]
pub struct PracticeSession {
    reference: Option<Arc<ReferenceGlyph>>,
}

impl PracticeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the practiced glyph, returning the previous one.
    pub fn load_reference(&mut self, glyph: ReferenceGlyph) -> Option<Arc<ReferenceGlyph>> {
        info!("loaded reference glyph from {}", glyph.source());
        self.reference.replace(Arc::new(glyph))
    }

    pub fn reference(&self) -> Option<&ReferenceGlyph> {
        self.reference.as_deref()
    }

    pub fn reference_source(&self) -> Option<&str> {
        self.reference().map(ReferenceGlyph::source)
    }

    /// Compares the user's drawing against the loaded glyph.
    pub async fn compare_drawing(
        &self,
        comparator: &Comparator,
        drawing: Option<SvgDrawing>,
    ) -> Result<ComparisonOutcome, CompareError> {
        let Some(drawing) = drawing else {
            return Err(CompareError::MissingInput);
        };
        let Some(reference) = self.reference.clone() else {
            warn!("comparison requested before a reference glyph was loaded");
            return Err(CompareError::NoReference);
        };

        let reference: Arc<dyn RasterSource> = reference;
        let user: Arc<dyn RasterSource> = Arc::new(drawing);
        comparator.compare(reference, Some(user)).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use ht_core::{Point2f, Polyline2f};
    use ht_raster::{ReferenceGlyph, SvgDrawing};
    use image::{ImageFormat, RgbaImage};

    use super::PracticeSession;
    use crate::{Comparator, CompareConfig, CompareError, RecordingRenderer};

    /// 100x100 PNG, white with a black horizontal bar through the middle.
    fn bar_glyph_png() -> Vec<u8> {
        let mut img = RgbaImage::from_pixel(100, 100, image::Rgba([255, 255, 255, 255]));
        for y in 46..54 {
            for x in 20..80 {
                img.put_pixel(x, y, image::Rgba([0, 0, 0, 255]));
            }
        }
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)
            .expect("png encoding");
        out.into_inner()
    }

    fn comparator() -> Comparator {
        let cfg = CompareConfig {
            canvas_size: 100,
            ..CompareConfig::default()
        };
        Comparator::with_tokio(cfg, Arc::new(RecordingRenderer::new()))
    }

    fn traced_bar() -> SvgDrawing {
        let stroke = Polyline2f::new(vec![Point2f::new(24.0, 50.0), Point2f::new(76.0, 50.0)]);
        SvgDrawing::from_strokes(&[stroke], 100.0, 8.0)
    }

    #[tokio::test(start_paused = true)]
    async fn errors_are_reported_in_input_order() {
        let session = PracticeSession::new();
        let comparator = comparator();

        let res = session.compare_drawing(&comparator, None).await;
        assert!(matches!(res, Err(CompareError::MissingInput)));

        let res = session.compare_drawing(&comparator, Some(traced_bar())).await;
        assert!(matches!(res, Err(CompareError::NoReference)));
    }

    #[tokio::test(start_paused = true)]
    async fn traced_glyph_passes() {
        let mut session = PracticeSession::new();
        assert!(
            session
                .load_reference(ReferenceGlyph::new("bar.png", bar_glyph_png()))
                .is_none()
        );
        assert_eq!(session.reference_source(), Some("bar.png"));

        let outcome = session
            .compare_drawing(&comparator(), Some(traced_bar()))
            .await
            .expect("comparison runs");
        assert!(outcome.verdict);
        assert!(!outcome.user_polylines.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drawing_elsewhere_fails() {
        let mut session = PracticeSession::new();
        session.load_reference(ReferenceGlyph::new("bar.png", bar_glyph_png()));

        let stroke = Polyline2f::new(vec![Point2f::new(50.0, 5.0), Point2f::new(50.0, 25.0)]);
        let drawing = SvgDrawing::from_strokes(&[stroke], 100.0, 8.0);
        let outcome = session
            .compare_drawing(&comparator(), Some(drawing))
            .await
            .expect("comparison runs");
        assert!(!outcome.verdict);

        let previous = session.load_reference(ReferenceGlyph::new("other.png", bar_glyph_png()));
        assert_eq!(previous.map(|g| g.source().to_owned()), Some("bar.png".into()));
    }
}
