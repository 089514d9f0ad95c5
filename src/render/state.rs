//! Graphics state tracked while interpreting a content stream.

use tiny_skia::{Color, LineCap, LineJoin, Paint, Stroke, Transform};

/// The subset of the PDF graphics state that affects vector painting.
#[derive(Debug, Clone)]
pub(crate) struct GraphicsState {
    /// Current transformation matrix, user space to page space
    pub ctm: Transform,
    pub fill: Color,
    pub stroke: Color,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Transform::identity(),
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
        }
    }
}

impl GraphicsState {
    pub fn fill_paint(&self, anti_alias: bool) -> Paint<'static> {
        paint(self.fill, anti_alias)
    }

    pub fn stroke_paint(&self, anti_alias: bool) -> Paint<'static> {
        paint(self.stroke, anti_alias)
    }

    pub fn stroke_style(&self) -> Stroke {
        Stroke {
            width: self.line_width,
            miter_limit: self.miter_limit,
            line_cap: self.line_cap,
            line_join: self.line_join,
            dash: None,
        }
    }
}

fn paint(color: Color, anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = anti_alias;
    paint
}

/// Map a color operand list to RGB by component count (gray, RGB, CMYK).
pub(crate) fn color_from_components(values: &[f32]) -> Option<Color> {
    let c = |v: f32| v.clamp(0.0, 1.0);
    match *values {
        [g] => Color::from_rgba(c(g), c(g), c(g), 1.0),
        [r, g, b] => Color::from_rgba(c(r), c(g), c(b), 1.0),
        [cy, m, y, k] => {
            let k = 1.0 - c(k);
            Color::from_rgba((1.0 - c(cy)) * k, (1.0 - c(m)) * k, (1.0 - c(y)) * k, 1.0)
        }
        _ => None,
    }
}

pub(crate) fn line_cap(value: i64) -> LineCap {
    match value {
        1 => LineCap::Round,
        2 => LineCap::Square,
        _ => LineCap::Butt,
    }
}

pub(crate) fn line_join(value: i64) -> LineJoin {
    match value {
        1 => LineJoin::Round,
        2 => LineJoin::Bevel,
        _ => LineJoin::Miter,
    }
}
