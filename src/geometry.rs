//! Points, sizes and page boxes.

use serde::{Deserialize, Serialize};

/// A location on a drawing target, in device pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height, in PDF points (1/72 inch) unless stated otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size multiplied by `scale`, rounded up to whole pixels.
    pub fn to_pixels(self, scale: f32) -> (u32, u32) {
        (
            (self.width * scale).ceil().max(1.0) as u32,
            (self.height * scale).ceil().max(1.0) as u32,
        )
    }

    fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }
}

/// A rectangle in PDF user space, normalized so that `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PageRect {
    /// US Letter, used when a page tree carries no `/MediaBox` at all.
    pub const LETTER: PageRect = PageRect {
        x0: 0.0,
        y0: 0.0,
        x1: 612.0,
        y1: 792.0,
    };

    /// Build from two opposite corners in any order.
    pub fn from_corners(ax: f32, ay: f32, bx: f32, by: f32) -> Self {
        Self {
            x0: ax.min(bx),
            y0: ay.min(by),
            x1: ax.max(bx),
            y1: ay.max(by),
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Overlap with `other`, or `None` if the rectangles are disjoint.
    pub fn intersect(&self, other: &PageRect) -> Option<PageRect> {
        let r = PageRect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        (r.x0 < r.x1 && r.y0 < r.y1).then_some(r)
    }
}

/// Clockwise page rotation as stored in `/Rotate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    /// Normalize a `/Rotate` value. Values that are not multiples of 90 are
    /// treated as no rotation.
    pub fn from_degrees(degrees: i64) -> Self {
        match degrees.rem_euclid(360) {
            90 => Rotation::Quarter,
            180 => Rotation::Half,
            270 => Rotation::ThreeQuarter,
            _ => Rotation::None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }

    /// Apply the rotation to an unrotated page size.
    pub fn apply(self, size: Size) -> Size {
        match self {
            Rotation::Quarter | Rotation::ThreeQuarter => size.transposed(),
            Rotation::None | Rotation::Half => size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_corners() {
        let r = PageRect::from_corners(612.0, 792.0, 0.0, 0.0);
        assert_eq!(r, PageRect::LETTER);
        assert_eq!(r.size(), Size::new(612.0, 792.0));
    }

    #[test]
    fn test_rect_intersect() {
        let crop = PageRect::from_corners(100.0, 100.0, 700.0, 500.0);
        let r = PageRect::LETTER.intersect(&crop).unwrap();
        assert_eq!(r, PageRect::from_corners(100.0, 100.0, 612.0, 500.0));

        let outside = PageRect::from_corners(700.0, 0.0, 800.0, 10.0);
        assert!(PageRect::LETTER.intersect(&outside).is_none());
    }

    #[test]
    fn test_rotation_from_degrees() {
        assert_eq!(Rotation::from_degrees(90), Rotation::Quarter);
        assert_eq!(Rotation::from_degrees(-90), Rotation::ThreeQuarter);
        assert_eq!(Rotation::from_degrees(540), Rotation::Half);
        assert_eq!(Rotation::from_degrees(45), Rotation::None);
    }

    #[test]
    fn test_rotation_swaps_size() {
        let size = Size::new(612.0, 792.0);
        assert_eq!(Rotation::Quarter.apply(size), Size::new(792.0, 612.0));
        assert_eq!(Rotation::Half.apply(size), size);
    }

    #[test]
    fn test_to_pixels_rounds_up() {
        assert_eq!(Size::new(612.0, 792.0).to_pixels(0.5), (306, 396));
        assert_eq!(Size::new(10.2, 0.0).to_pixels(1.0), (11, 1));
    }
}
