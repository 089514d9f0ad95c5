//! Vector content-stream renderer on top of `tiny-skia`.

use std::rc::Rc;

use lopdf::content::{Content, Operation};
use lopdf::Document as LopdfDocument;
use tiny_skia::{FillRule, Mask, PathBuilder, PixmapMut, Rect, Transform};

use super::state::{color_from_components, line_cap, line_join, GraphicsState};
use super::{check_scale, page_transform, PageRenderer};
use crate::backend::{number, page_content};
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::model::Page;
use crate::options::RenderOptions;

/// Guards against unbalanced `q` operators in malformed streams.
const MAX_STATE_DEPTH: usize = 256;

/// Paints the path operators of a page's content stream.
///
/// Path construction, painting, color and line-style operators are honored.
/// Text, images, shadings and clipping paths other than the page box are not
/// drawn; those operators are skipped.
pub struct VectorRenderer {
    doc: Rc<LopdfDocument>,
    options: RenderOptions,
}

impl VectorRenderer {
    pub fn new(doc: Rc<LopdfDocument>, options: RenderOptions) -> Self {
        Self { doc, options }
    }
}

impl PageRenderer for VectorRenderer {
    fn draw_page(
        &self,
        page: &Page,
        at: Point,
        scale: f32,
        target: &mut PixmapMut<'_>,
    ) -> Result<()> {
        check_scale(scale)?;

        let size = page.size();
        let Some(bounds) = Rect::from_xywh(at.x, at.y, size.width * scale, size.height * scale)
        else {
            log::debug!("page {} has an empty display box", page.index);
            return Ok(());
        };

        let mut clip = Mask::new(target.width(), target.height())
            .ok_or_else(|| Error::Render("drawing target has no pixels".to_string()))?;
        clip.fill_path(
            &PathBuilder::from_rect(bounds),
            FillRule::Winding,
            false,
            Transform::identity(),
        );

        if let Some([r, g, b, a]) = self.options.background {
            let mut paint = tiny_skia::Paint::default();
            paint.set_color_rgba8(r, g, b, a);
            target.fill_rect(bounds, &paint, Transform::identity(), None);
        }

        let data = page_content(&self.doc, page.id)?;
        if data.is_empty() {
            return Ok(());
        }
        let content = Content::decode(&data).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut painter = Painter {
            target,
            clip: &clip,
            base: page_transform(page, at, scale),
            anti_alias: self.options.anti_alias,
            states: vec![GraphicsState::default()],
            path: PathBuilder::new(),
            current: None,
            painted: 0,
        };
        for op in &content.operations {
            painter.execute(op);
        }
        log::debug!(
            "page {}: {} operators, {} paths painted",
            page.index,
            content.operations.len(),
            painter.painted
        );
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum PaintMode {
    Fill(FillRule),
    Stroke,
    FillStroke(FillRule),
    Discard,
}

struct Painter<'t, 'p> {
    target: &'t mut PixmapMut<'p>,
    clip: &'t Mask,
    base: Transform,
    anti_alias: bool,
    states: Vec<GraphicsState>,
    path: PathBuilder,
    /// Current point and start of the open subpath, in user space.
    current: Option<((f32, f32), (f32, f32))>,
    painted: usize,
}

impl Painter<'_, '_> {
    fn state(&mut self) -> &mut GraphicsState {
        // The stack is never popped below its root entry.
        let last = self.states.len() - 1;
        &mut self.states[last]
    }

    fn execute(&mut self, op: &Operation) {
        let args: Vec<f32> = op.operands.iter().filter_map(number).collect();

        let handled = match (op.operator.as_str(), args.as_slice()) {
            ("q", _) => {
                if self.states.len() < MAX_STATE_DEPTH {
                    let top = self.state().clone();
                    self.states.push(top);
                }
                true
            }
            ("Q", _) => {
                if self.states.len() > 1 {
                    self.states.pop();
                }
                true
            }
            ("cm", &[a, b, c, d, e, f]) => {
                let m = Transform::from_row(a, b, c, d, e, f);
                let state = self.state();
                state.ctm = state.ctm.pre_concat(m);
                true
            }
            ("w", &[width]) => {
                self.state().line_width = width.max(0.0);
                true
            }
            ("J", &[cap]) => {
                self.state().line_cap = line_cap(cap as i64);
                true
            }
            ("j", &[join]) => {
                self.state().line_join = line_join(join as i64);
                true
            }
            ("M", &[limit]) => {
                self.state().miter_limit = limit.max(1.0);
                true
            }
            ("g" | "rg" | "k" | "sc" | "scn", values) => self.set_color(values, true),
            ("G" | "RG" | "K" | "SC" | "SCN", values) => self.set_color(values, false),

            ("m", &[x, y]) => {
                self.path.move_to(x, y);
                self.current = Some(((x, y), (x, y)));
                true
            }
            ("l", &[x, y]) => self.with_current(|p, _| {
                p.line_to(x, y);
                (x, y)
            }),
            ("c", &[x1, y1, x2, y2, x3, y3]) => self.with_current(|p, _| {
                p.cubic_to(x1, y1, x2, y2, x3, y3);
                (x3, y3)
            }),
            ("v", &[x2, y2, x3, y3]) => self.with_current(|p, (x0, y0)| {
                p.cubic_to(x0, y0, x2, y2, x3, y3);
                (x3, y3)
            }),
            ("y", &[x1, y1, x3, y3]) => self.with_current(|p, _| {
                p.cubic_to(x1, y1, x3, y3, x3, y3);
                (x3, y3)
            }),
            ("h", _) => {
                if let Some((_, start)) = self.current {
                    self.path.close();
                    self.current = Some((start, start));
                }
                true
            }
            ("re", &[x, y, w, h]) => {
                self.path.move_to(x, y);
                self.path.line_to(x + w, y);
                self.path.line_to(x + w, y + h);
                self.path.line_to(x, y + h);
                self.path.close();
                self.current = Some(((x, y), (x, y)));
                true
            }

            ("S", _) => self.paint(PaintMode::Stroke, false),
            ("s", _) => self.paint(PaintMode::Stroke, true),
            ("f" | "F", _) => self.paint(PaintMode::Fill(FillRule::Winding), false),
            ("f*", _) => self.paint(PaintMode::Fill(FillRule::EvenOdd), false),
            ("B", _) => self.paint(PaintMode::FillStroke(FillRule::Winding), false),
            ("B*", _) => self.paint(PaintMode::FillStroke(FillRule::EvenOdd), false),
            ("b", _) => self.paint(PaintMode::FillStroke(FillRule::Winding), true),
            ("b*", _) => self.paint(PaintMode::FillStroke(FillRule::EvenOdd), true),
            ("n", _) => self.paint(PaintMode::Discard, false),

            _ => false,
        };

        if !handled {
            log::trace!("skipping operator {} {:?}", op.operator, op.operands);
        }
    }

    fn set_color(&mut self, values: &[f32], fill: bool) -> bool {
        let Some(color) = color_from_components(values) else {
            return false;
        };
        let state = self.state();
        if fill {
            state.fill = color;
        } else {
            state.stroke = color;
        }
        true
    }

    /// Extend the open subpath. Segments without a current point are ignored.
    fn with_current<F>(&mut self, segment: F) -> bool
    where
        F: FnOnce(&mut PathBuilder, (f32, f32)) -> (f32, f32),
    {
        let Some((point, start)) = self.current else {
            return false;
        };
        let end = segment(&mut self.path, point);
        self.current = Some((end, start));
        true
    }

    fn paint(&mut self, mode: PaintMode, close: bool) -> bool {
        if close && self.current.is_some() {
            self.path.close();
        }
        let builder = std::mem::replace(&mut self.path, PathBuilder::new());
        self.current = None;

        let Some(path) = builder.finish() else {
            return true;
        };

        let state = self.states[self.states.len() - 1].clone();
        let transform = self.base.pre_concat(state.ctm);

        if let PaintMode::Fill(rule) | PaintMode::FillStroke(rule) = mode {
            let paint = state.fill_paint(self.anti_alias);
            self.target
                .fill_path(&path, &paint, rule, transform, Some(self.clip));
        }
        if let PaintMode::Stroke | PaintMode::FillStroke(_) = mode {
            let paint = state.stroke_paint(self.anti_alias);
            self.target.stroke_path(
                &path,
                &paint,
                &state.stroke_style(),
                transform,
                Some(self.clip),
            );
        }
        if !matches!(mode, PaintMode::Discard) {
            self.painted += 1;
        }
        true
    }
}
