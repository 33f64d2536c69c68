//! Connector arrows, region frames and label boxes.
//!
//! All geometry here is in canvas space. Degenerate shapes (a zero-size
//! region, a zero-length arrow) are skipped rather than treated as errors.

use std::f64::consts::PI;

use serde::Serialize;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::config::Color;
use crate::ir::{CanvasSpace, Coord, RegionBox};

/// Length of the arrowhead from tip to base.
pub const ARROW_HEAD_LENGTH: f64 = 12.0;

/// Half-angle of the arrowhead (30 degrees).
pub const ARROW_HEAD_HALF_ANGLE: f64 = PI / 6.0;

/// Stroke width for connector lines and region frames.
pub const STROKE_WIDTH: f32 = 3.0;

/// Stroke width for the outline around label text.
pub const LABEL_OUTLINE_WIDTH: f32 = 1.0;

/// A straight connector from a label to its region.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Connector {
    pub start: Coord<CanvasSpace>,
    pub end: Coord<CanvasSpace>,
}

impl Connector {
    pub fn new(start: Coord<CanvasSpace>, end: Coord<CanvasSpace>) -> Self {
        Self { start, end }
    }

    /// Returns the arrowhead triangle: the tip, then the two base vertices.
    ///
    /// The base vertices sit [`ARROW_HEAD_LENGTH`] back from the tip along
    /// the line direction rotated by ±30°.
    pub fn head(&self) -> [Coord<CanvasSpace>; 3] {
        let angle = (self.end.y - self.start.y).atan2(self.end.x - self.start.x);
        let back = |theta: f64| {
            Coord::new(
                self.end.x - ARROW_HEAD_LENGTH * theta.cos(),
                self.end.y - ARROW_HEAD_LENGTH * theta.sin(),
            )
        };
        [
            self.end,
            back(angle - ARROW_HEAD_HALF_ANGLE),
            back(angle + ARROW_HEAD_HALF_ANGLE),
        ]
    }
}

fn solid_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = true;
    paint
}

fn to_rect(bbox: &RegionBox<CanvasSpace>) -> Option<Rect> {
    Rect::from_ltrb(
        bbox.x() as f32,
        bbox.y() as f32,
        bbox.right() as f32,
        bbox.bottom() as f32,
    )
}

/// Strokes the connector line and fills its arrowhead.
pub fn draw_connector(pixmap: &mut Pixmap, connector: &Connector, color: Color) {
    let paint = solid_paint(color);
    let stroke = Stroke {
        width: STROKE_WIDTH,
        ..Default::default()
    };

    let mut pb = PathBuilder::new();
    pb.move_to(connector.start.x as f32, connector.start.y as f32);
    pb.line_to(connector.end.x as f32, connector.end.y as f32);
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    let [tip, left, right] = connector.head();
    let mut pb = PathBuilder::new();
    pb.move_to(tip.x as f32, tip.y as f32);
    pb.line_to(left.x as f32, left.y as f32);
    pb.line_to(right.x as f32, right.y as f32);
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Strokes a 3px outline around a region.
pub fn draw_frame(pixmap: &mut Pixmap, frame: &RegionBox<CanvasSpace>, color: Color) {
    let Some(rect) = to_rect(frame) else {
        return;
    };
    let stroke = Stroke {
        width: STROKE_WIDTH,
        ..Default::default()
    };
    let path = PathBuilder::from_rect(rect);
    pixmap.stroke_path(&path, &solid_paint(color), &stroke, Transform::identity(), None);
}

/// Fills a label's background white and outlines it in the region color.
pub fn draw_label_box(pixmap: &mut Pixmap, label: &RegionBox<CanvasSpace>, color: Color) {
    let Some(rect) = to_rect(label) else {
        return;
    };
    pixmap.fill_rect(rect, &solid_paint(Color::WHITE), Transform::identity(), None);

    let stroke = Stroke {
        width: LABEL_OUTLINE_WIDTH,
        ..Default::default()
    };
    let path = PathBuilder::from_rect(rect);
    pixmap.stroke_path(&path, &solid_paint(color), &stroke, Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_head_of_rightward_arrow() {
        let connector = Connector::new(Coord::new(0.0, 0.0), Coord::new(100.0, 0.0));
        let [tip, a, b] = connector.head();

        assert_eq!((tip.x, tip.y), (100.0, 0.0));
        let dx = ARROW_HEAD_LENGTH * (PI / 6.0).cos();
        let dy = ARROW_HEAD_LENGTH * (PI / 6.0).sin();
        assert!(approx(a.x, 100.0 - dx) && approx(a.y, dy));
        assert!(approx(b.x, 100.0 - dx) && approx(b.y, -dy));
    }

    #[test]
    fn test_head_of_leftward_arrow_points_left() {
        let connector = Connector::new(Coord::new(100.0, 50.0), Coord::new(0.0, 50.0));
        let [_, a, b] = connector.head();
        assert!(a.x > 0.0 && b.x > 0.0);
        assert!(approx(a.y + b.y, 100.0));
    }

    #[test]
    fn test_head_base_vertices_are_head_length_from_tip() {
        let connector = Connector::new(Coord::new(10.0, 80.0), Coord::new(400.0, 20.0));
        let [tip, a, b] = connector.head();
        for v in [a, b] {
            let d = ((v.x - tip.x).powi(2) + (v.y - tip.y).powi(2)).sqrt();
            assert!(approx(d, ARROW_HEAD_LENGTH));
        }
    }

    #[test]
    fn test_draw_frame_paints_edges_only() {
        let mut pixmap = Pixmap::new(50, 50).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        let frame = RegionBox::from_xywh(10.0, 10.0, 30.0, 30.0);
        draw_frame(&mut pixmap, &frame, Color::rgb(255, 0, 0));

        let edge = pixmap.pixel(10, 25).unwrap();
        let inside = pixmap.pixel(25, 25).unwrap();
        assert!(edge.red() > 250 && edge.green() < 5);
        assert_eq!((inside.red(), inside.green()), (255, 255));
    }

    #[test]
    fn test_degenerate_shapes_are_skipped() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        let point = Coord::new(5.0, 5.0);
        draw_connector(&mut pixmap, &Connector::new(point, point), Color::rgb(0, 0, 0));
        draw_frame(
            &mut pixmap,
            &RegionBox::from_xywh(5.0, 5.0, -1.0, 3.0),
            Color::rgb(0, 0, 0),
        );
    }
}
