//! Replays a recorded display list with egui shapes.
//!
//! [`commands_to_shapes`] walks the [`DrawCommand`]s of a
//! [`swarm_core::surface::RecordingSurface`] and turns every finished shape
//! (a `Fill` or `Stroke`) into one or more [`egui::Shape`]s, offset by the
//! screen position of the surface origin.

use egui::{Color32, Pos2, Shape, Stroke};
use std::f32::consts::TAU;
use swarm_core::surface::DrawCommand;

/// Number of line segments used for a full turn of a partial arc.
const ARC_SEGMENTS_PER_TURN: f32 = 48.0;

/// Colours used when replaying a display list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub fill: Color32,
    pub stroke: Stroke,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            fill: Color32::from_rgb(120, 190, 255),
            stroke: Stroke::new(1.0, Color32::from_rgb(255, 210, 120)),
        }
    }
}

/// One piece of the path under construction.
#[derive(Debug)]
enum Segment {
    Circle { center: Pos2, radius: f32 },
    Polyline(Vec<Pos2>),
}

/// Accumulates path commands between `BeginShape` and `Fill` / `Stroke`.
#[derive(Debug, Default)]
struct PathBuilder {
    segments: Vec<Segment>,
}

impl PathBuilder {
    fn reset(&mut self) {
        self.segments.clear();
    }

    fn move_to(&mut self, p: Pos2) {
        self.segments.push(Segment::Polyline(vec![p]));
    }

    fn line_to(&mut self, p: Pos2) {
        match self.segments.last_mut() {
            Some(Segment::Polyline(points)) => points.push(p),
            _ => self.move_to(p),
        }
    }

    fn arc(&mut self, center: Pos2, radius: f32, start: f32, end: f32, anticlockwise: bool) {
        // A sweep of a full turn or more, in either direction, is a circle.
        if (end - start).abs() >= TAU {
            self.segments.push(Segment::Circle { center, radius });
            return;
        }

        let sweep = arc_sweep(start, end, anticlockwise);
        let steps = ((sweep.abs() / TAU) * ARC_SEGMENTS_PER_TURN).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let angle = start + sweep * (i as f32 / steps as f32);
            let p = Pos2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
            self.line_to(p);
        }
    }

    fn fill(&self, color: Color32, out: &mut Vec<Shape>) {
        for segment in &self.segments {
            match segment {
                Segment::Circle { center, radius } => {
                    out.push(Shape::circle_filled(*center, *radius, color));
                }
                Segment::Polyline(points) if points.len() >= 3 => {
                    out.push(Shape::convex_polygon(points.clone(), color, Stroke::NONE));
                }
                Segment::Polyline(_) => {}
            }
        }
    }

    fn stroke(&self, stroke: Stroke, out: &mut Vec<Shape>) {
        for segment in &self.segments {
            match segment {
                Segment::Circle { center, radius } => {
                    out.push(Shape::circle_stroke(*center, *radius, stroke));
                }
                Segment::Polyline(points) if points.len() >= 2 => {
                    out.push(Shape::line(points.clone(), stroke));
                }
                Segment::Polyline(_) => {}
            }
        }
    }
}

/// Signed sweep (radians) from `start` to `end` in the requested direction,
/// in `(-TAU, TAU)`. Positive is clockwise in screen space (y down).
fn arc_sweep(start: f32, end: f32, anticlockwise: bool) -> f32 {
    if anticlockwise {
        -(start - end).rem_euclid(TAU)
    } else {
        (end - start).rem_euclid(TAU)
    }
}

/// Converts a display list into egui shapes.
///
/// Surface coordinates are offset by `origin`, the screen position of the
/// surface's top-left corner. `Clear` commands produce nothing; the caller
/// paints the background.
pub fn commands_to_shapes(commands: &[DrawCommand], origin: Pos2, palette: Palette) -> Vec<Shape> {
    let at = |x: f32, y: f32| Pos2::new(origin.x + x, origin.y + y);

    let mut shapes = Vec::with_capacity(commands.len() / 2);
    let mut path = PathBuilder::default();

    for command in commands {
        match *command {
            DrawCommand::Clear { .. } => {}
            DrawCommand::BeginShape => path.reset(),
            DrawCommand::Arc {
                cx,
                cy,
                radius,
                start_angle,
                end_angle,
                anticlockwise,
            } => path.arc(at(cx, cy), radius, start_angle, end_angle, anticlockwise),
            DrawCommand::MoveTo { x, y } => path.move_to(at(x, y)),
            DrawCommand::LineTo { x, y } => path.line_to(at(x, y)),
            DrawCommand::Fill => path.fill(palette.fill, &mut shapes),
            DrawCommand::Stroke => path.stroke(palette.stroke, &mut shapes),
        }
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use swarm_core::surface::{RecordingSurface, Surface};

    fn replay(surface: &RecordingSurface, origin: Pos2) -> Vec<Shape> {
        commands_to_shapes(surface.commands(), origin, Palette::default())
    }

    #[test]
    fn full_arc_fill_becomes_filled_circle() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.begin_shape();
        surface.arc(10.0, 20.0, 3.0, 0.0, TAU, true);
        surface.fill();

        let shapes = replay(&surface, Pos2::new(100.0, 50.0));

        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Circle(c) => {
                assert_eq!(c.center, Pos2::new(110.0, 70.0));
                assert_eq!(c.radius, 3.0);
                assert_eq!(c.fill, Palette::default().fill);
            }
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn full_arc_stroke_becomes_outlined_circle() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.begin_shape();
        surface.arc(50.0, 50.0, 50.0, 0.0, TAU, true);
        surface.stroke();

        let shapes = replay(&surface, Pos2::ZERO);

        match &shapes[..] {
            [Shape::Circle(c)] => {
                assert_eq!(c.fill, Color32::TRANSPARENT);
                assert_eq!(c.stroke, Palette::default().stroke);
            }
            other => panic!("expected one circle, got {other:?}"),
        }
    }

    #[test]
    fn move_and_line_become_polyline() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.begin_shape();
        surface.move_to(1.0, 2.0);
        surface.line_to(3.0, 4.0);
        surface.stroke();

        let shapes = replay(&surface, Pos2::new(10.0, 10.0));

        match &shapes[..] {
            [Shape::LineSegment { points, .. }] => {
                assert_eq!(points, &[Pos2::new(11.0, 12.0), Pos2::new(13.0, 14.0)]);
            }
            [Shape::Path(path)] => {
                assert_eq!(path.points, vec![Pos2::new(11.0, 12.0), Pos2::new(13.0, 14.0)]);
            }
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn begin_shape_discards_unfinished_path() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.begin_shape();
        surface.arc(5.0, 5.0, 1.0, 0.0, TAU, false);
        surface.begin_shape();
        surface.move_to(0.0, 0.0);
        surface.line_to(1.0, 1.0);
        surface.stroke();

        let shapes = replay(&surface, Pos2::ZERO);
        assert_eq!(shapes.len(), 1);
        assert!(!matches!(shapes[0], Shape::Circle(_)));
    }

    #[test]
    fn clear_and_unfinished_shapes_draw_nothing() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.clear(0.0, 0.0, 100.0, 100.0);
        surface.begin_shape();
        surface.move_to(1.0, 1.0);

        assert!(replay(&surface, Pos2::ZERO).is_empty());
    }

    #[test]
    fn arc_sweep_follows_direction() {
        assert!((arc_sweep(0.0, PI / 2.0, false) - PI / 2.0).abs() < 1e-5);
        assert!((arc_sweep(0.0, PI / 2.0, true) + 3.0 * PI / 2.0).abs() < 1e-5);
        assert!((arc_sweep(PI, 0.0, true) + PI).abs() < 1e-5);
    }

    #[test]
    fn partial_arc_is_sampled_between_endpoints() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.begin_shape();
        surface.arc(0.0, 0.0, 10.0, 0.0, PI / 2.0, false);
        surface.stroke();

        let shapes = replay(&surface, Pos2::ZERO);
        let points = match &shapes[..] {
            [Shape::Path(path)] => path.points.clone(),
            other => panic!("expected a path, got {other:?}"),
        };

        let first = points[0];
        let last = points[points.len() - 1];
        assert!((first.x - 10.0).abs() < 1e-4 && first.y.abs() < 1e-4);
        assert!(last.x.abs() < 1e-4 && (last.y - 10.0).abs() < 1e-4);
        assert!(points.iter().all(|p| (p.to_vec2().length() - 10.0).abs() < 1e-3));
    }
}
