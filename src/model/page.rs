//! Page-level types.

use serde::{Deserialize, Serialize};

use crate::geometry::{PageRect, Rotation, Size};

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// A single page of an opened document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Position in the page sequence (0-indexed)
    pub index: u32,

    /// Backend object identifying the page
    pub id: PageId,

    /// Physical medium boundaries, in points
    pub media_box: PageRect,

    /// Visible region, if narrower than the media box
    pub crop_box: Option<PageRect>,

    /// Clockwise display rotation
    pub rotation: Rotation,
}

impl Page {
    /// Create an unrotated page of the given media box.
    pub fn new(index: u32, id: PageId, media_box: PageRect) -> Self {
        Self {
            index,
            id,
            media_box,
            crop_box: None,
            rotation: Rotation::None,
        }
    }

    pub fn with_crop_box(mut self, crop_box: PageRect) -> Self {
        self.crop_box = Some(crop_box);
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// The region that is displayed: the crop box clipped to the media box.
    ///
    /// A crop box lying entirely outside the media box is ignored.
    pub fn display_box(&self) -> PageRect {
        self.crop_box
            .and_then(|crop| crop.intersect(&self.media_box))
            .unwrap_or(self.media_box)
    }

    /// Displayed width and height in points, after rotation.
    pub fn size(&self) -> Size {
        self.rotation.apply(self.display_box().size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_uses_media_box() {
        let page = Page::new(0, (3, 0), PageRect::LETTER);
        assert_eq!(page.size(), Size::new(612.0, 792.0));
    }

    #[test]
    fn test_size_uses_crop_box() {
        let page = Page::new(0, (3, 0), PageRect::LETTER)
            .with_crop_box(PageRect::from_corners(36.0, 36.0, 576.0, 756.0));
        assert_eq!(page.size(), Size::new(540.0, 720.0));
    }

    #[test]
    fn test_crop_box_outside_media_box_is_ignored() {
        let page = Page::new(0, (3, 0), PageRect::LETTER)
            .with_crop_box(PageRect::from_corners(1000.0, 1000.0, 1200.0, 1200.0));
        assert_eq!(page.display_box(), PageRect::LETTER);
    }

    #[test]
    fn test_rotated_size() {
        let page = Page::new(1, (4, 0), PageRect::LETTER).with_rotation(Rotation::ThreeQuarter);
        assert_eq!(page.size(), Size::new(792.0, 612.0));
    }
}
