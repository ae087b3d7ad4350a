use inkroom_shared::{Point, Shape, ShapeStyle};

use crate::state::{Drag, Tool};

/// Bounding box independent of drag direction: min corner plus absolute
/// extents. Applying it twice yields the same box.
pub fn normalized_box(start: Point, current: Point) -> (f64, f64, f64, f64) {
    let x = start.x.min(current.x);
    let y = start.y.min(current.y);
    let width = (current.x - start.x).abs();
    let height = (current.y - start.y).abs();
    (x, y, width, height)
}

fn box_shape(tool: Tool, start: Point, current: Point) -> Shape {
    let (x, y, width, height) = normalized_box(start, current);
    match tool {
        Tool::Rect => Shape::Rect {
            x,
            y,
            width,
            height,
            properties: ShapeStyle::default(),
        },
        Tool::Ellipse => Shape::Ellipse {
            x,
            y,
            width,
            height,
            properties: ShapeStyle::default(),
        },
        _ => Shape::Eraser {
            x,
            y,
            width,
            height,
        },
    }
}

/// Live geometry for the preview layer while the pointer is held. `None`
/// when the tool constructs nothing or the pencil has a single sample.
pub fn preview(tool: Tool, drag: &Drag) -> Option<Shape> {
    let Drag::Active {
        start,
        current,
        path,
    } = drag
    else {
        return None;
    };
    match tool {
        Tool::Pointer => None,
        Tool::Rect | Tool::Ellipse | Tool::Eraser => Some(box_shape(tool, *start, *current)),
        Tool::Line => Some(Shape::Line {
            start_x: start.x,
            start_y: start.y,
            end_x: current.x,
            end_y: current.y,
        }),
        Tool::Arrow => Some(Shape::Arrow {
            from_x: start.x,
            from_y: start.y,
            to_x: current.x,
            to_y: current.y,
        }),
        Tool::Pencil => {
            if path.len() < 2 {
                None
            } else {
                Some(Shape::Pencil { path: path.clone() })
            }
        }
    }
}

/// Commit evaluation at pointer-up. Box tools drop when either extent is
/// zero; a pencil path needs at least two samples; line and arrow commit
/// even when degenerate.
pub fn finish(tool: Tool, drag: Drag) -> Option<Shape> {
    let Drag::Active {
        start,
        current,
        path,
    } = drag
    else {
        return None;
    };
    match tool {
        Tool::Pointer => None,
        Tool::Rect | Tool::Ellipse | Tool::Eraser => {
            let (_, _, width, height) = normalized_box(start, current);
            if width == 0.0 || height == 0.0 {
                return None;
            }
            Some(box_shape(tool, start, current))
        }
        Tool::Line => Some(Shape::Line {
            start_x: start.x,
            start_y: start.y,
            end_x: current.x,
            end_y: current.y,
        }),
        Tool::Arrow => Some(Shape::Arrow {
            from_x: start.x,
            from_y: start.y,
            to_x: current.x,
            to_y: current.y,
        }),
        Tool::Pencil => {
            if path.len() < 2 {
                return None;
            }
            Some(Shape::Pencil { path })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    fn drag_through(points: &[Point]) -> Drag {
        let mut drag = Drag::begin(points[0]);
        for sample in &points[1..] {
            drag.update(*sample);
        }
        drag
    }

    #[test]
    fn normalized_box_is_direction_independent() {
        let forward = normalized_box(point(10.0, 20.0), point(30.0, 50.0));
        let backward = normalized_box(point(30.0, 50.0), point(10.0, 20.0));
        assert_eq!(forward, (10.0, 20.0, 20.0, 30.0));
        assert_eq!(forward, backward);
    }

    #[test]
    fn normalized_box_is_idempotent() {
        let (x, y, width, height) = normalized_box(point(30.0, 50.0), point(10.0, 20.0));
        let again = normalized_box(point(x, y), point(x + width, y + height));
        assert_eq!(again, (x, y, width, height));
    }

    #[test]
    fn reverse_drag_previews_the_same_rect_as_forward() {
        let forward = preview(Tool::Rect, &drag_through(&[point(0.0, 0.0), point(4.0, 6.0)]));
        let backward = preview(Tool::Rect, &drag_through(&[point(4.0, 6.0), point(0.0, 0.0)]));
        assert_eq!(forward, backward);
        match forward.expect("preview") {
            Shape::Rect {
                x,
                y,
                width,
                height,
                ..
            } => {
                assert_eq!((x, y, width, height), (0.0, 0.0, 4.0, 6.0));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn zero_extent_boxes_drop_at_commit() {
        // Straight vertical drag: zero width.
        let drag = drag_through(&[point(5.0, 0.0), point(5.0, 40.0)]);
        assert_eq!(finish(Tool::Rect, drag), None);

        // Straight horizontal drag: zero height.
        let drag = drag_through(&[point(0.0, 5.0), point(40.0, 5.0)]);
        assert_eq!(finish(Tool::Ellipse, drag), None);

        // No movement at all.
        let drag = drag_through(&[point(5.0, 5.0)]);
        assert_eq!(finish(Tool::Eraser, drag), None);
    }

    #[test]
    fn degenerate_line_and_arrow_still_commit() {
        let drag = drag_through(&[point(5.0, 5.0)]);
        assert_eq!(
            finish(Tool::Line, drag),
            Some(Shape::Line {
                start_x: 5.0,
                start_y: 5.0,
                end_x: 5.0,
                end_y: 5.0,
            })
        );

        let drag = drag_through(&[point(1.0, 2.0), point(9.0, 4.0)]);
        assert_eq!(
            finish(Tool::Arrow, drag),
            Some(Shape::Arrow {
                from_x: 1.0,
                from_y: 2.0,
                to_x: 9.0,
                to_y: 4.0,
            })
        );
    }

    #[test]
    fn single_sample_pencil_never_commits() {
        let drag = drag_through(&[point(3.0, 3.0)]);
        assert_eq!(finish(Tool::Pencil, drag), None);
    }

    #[test]
    fn two_sample_pencil_commits_with_endpoints_preserved() {
        let drag = drag_through(&[point(3.0, 3.0), point(8.0, 1.0)]);
        match finish(Tool::Pencil, drag).expect("commit") {
            Shape::Pencil { path } => {
                assert_eq!(path.first().copied(), Some(point(3.0, 3.0)));
                assert_eq!(path.last().copied(), Some(point(8.0, 1.0)));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn pointer_tool_and_idle_drag_construct_nothing() {
        let drag = drag_through(&[point(0.0, 0.0), point(9.0, 9.0)]);
        assert_eq!(finish(Tool::Pointer, drag), None);
        assert_eq!(finish(Tool::Rect, Drag::Idle), None);
        assert_eq!(preview(Tool::Line, &Drag::Idle), None);
    }
}
