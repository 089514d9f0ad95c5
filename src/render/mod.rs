//! Page rasterization.
//!
//! Drawing goes through the [`PageRenderer`] trait so the document facade
//! stays independent of how a backend turns page content into pixels.

mod state;
mod vector;

pub use vector::VectorRenderer;

use tiny_skia::{PixmapMut, Transform};

use crate::error::{Error, Result};
use crate::geometry::{Point, Rotation};
use crate::model::Page;

/// Largest pixmap, in pixels, that [`Document::render_page`] will allocate.
///
/// 2^28 RGBA pixels is 1 GiB of pixel data, enough for a Letter page at
/// 20 pixels per point.
///
/// [`Document::render_page`]: crate::Document::render_page
pub const MAX_PIXELS: u64 = 1 << 28;

/// Capability to paint a page onto a raster target.
pub trait PageRenderer {
    /// Paint `page` into `target`, with the page's top-left corner at `at`
    /// (device pixels) and one PDF point mapped to `scale` pixels.
    fn draw_page(
        &self,
        page: &Page,
        at: Point,
        scale: f32,
        target: &mut PixmapMut<'_>,
    ) -> Result<()>;
}

/// Reject scales that would produce an empty or undefined transform.
pub fn check_scale(scale: f32) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidScale(scale))
    }
}

/// Map PDF user space of `page` to device space.
///
/// User space is y-up with its origin at the display box's lower-left corner;
/// device space is y-down. The page's `/Rotate` is applied clockwise, then
/// the result is scaled and moved to `at`.
pub fn page_transform(page: &Page, at: Point, scale: f32) -> Transform {
    let b = page.display_box();
    let (w, h) = (b.width(), b.height());

    let flip = Transform::from_row(1.0, 0.0, 0.0, -1.0, -b.x0, b.y1);
    let rotate = match page.rotation {
        Rotation::None => Transform::identity(),
        Rotation::Quarter => Transform::from_row(0.0, 1.0, -1.0, 0.0, h, 0.0),
        Rotation::Half => Transform::from_row(-1.0, 0.0, 0.0, -1.0, w, h),
        Rotation::ThreeQuarter => Transform::from_row(0.0, -1.0, 1.0, 0.0, 0.0, w),
    };
    let place = Transform::from_row(scale, 0.0, 0.0, scale, at.x, at.y);

    flip.post_concat(rotate).post_concat(place)
}
