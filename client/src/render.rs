use web_sys::CanvasRenderingContext2d;

use inkroom_shared::{Point, Shape};

pub const BOARD_BACKGROUND: &str = "#121212";

const ARROW_HEAD_LEN: f64 = 10.0;
const ARROW_HEAD_ANGLE: f64 = std::f64::consts::PI / 7.0;
const TAU: f64 = std::f64::consts::PI * 2.0;

/// Full repaint of the committed layer: clear, background, then every shape
/// in scene order so later shapes (eraser marks included) paint over earlier
/// ones.
pub fn redraw_scene(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    shapes: &[Shape],
) {
    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str(BOARD_BACKGROUND);
    ctx.fill_rect(0.0, 0.0, width, height);
    for shape in shapes {
        draw_shape(ctx, shape);
    }
}

pub fn clear_preview(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
    ctx.clear_rect(0.0, 0.0, width, height);
}

/// Repaints the preview layer with the single in-progress shape; the
/// committed layer is not touched.
pub fn draw_preview(ctx: &CanvasRenderingContext2d, width: f64, height: f64, shape: &Shape) {
    ctx.clear_rect(0.0, 0.0, width, height);
    draw_shape(ctx, shape);
}

pub fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape) {
    match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            properties,
        } => {
            ctx.set_stroke_style_str(&properties.stroke);
            ctx.set_line_width(properties.stroke_width);
            ctx.stroke_rect(*x, *y, *width, *height);
        }
        Shape::Ellipse {
            x,
            y,
            width,
            height,
            properties,
        } => {
            ctx.set_stroke_style_str(&properties.stroke);
            ctx.set_line_width(properties.stroke_width);
            ctx.begin_path();
            let _ = ctx.ellipse(
                x + width / 2.0,
                y + height / 2.0,
                width / 2.0,
                height / 2.0,
                0.0,
                0.0,
                TAU,
            );
            ctx.stroke();
        }
        Shape::Line {
            start_x,
            start_y,
            end_x,
            end_y,
        } => {
            ctx.begin_path();
            ctx.move_to(*start_x, *start_y);
            ctx.line_to(*end_x, *end_y);
            ctx.set_stroke_style_str("white");
            ctx.set_line_width(1.0);
            ctx.stroke();
        }
        Shape::Arrow {
            from_x,
            from_y,
            to_x,
            to_y,
        } => {
            draw_arrow(ctx, *from_x, *from_y, *to_x, *to_y);
        }
        Shape::Pencil { path } => {
            draw_smoothed_path(ctx, path);
        }
        Shape::Eraser {
            x,
            y,
            width,
            height,
        } => {
            // Opaque cover in the background color; nothing is removed.
            ctx.set_fill_style_str(BOARD_BACKGROUND);
            ctx.fill_rect(*x, *y, *width, *height);
        }
    }
}

/// Shaft plus a filled triangular head derived from the endpoint angle.
fn draw_arrow(ctx: &CanvasRenderingContext2d, from_x: f64, from_y: f64, to_x: f64, to_y: f64) {
    let angle = (to_y - from_y).atan2(to_x - from_x);
    let shaft_x = to_x - angle.cos() * ARROW_HEAD_LEN;
    let shaft_y = to_y - angle.sin() * ARROW_HEAD_LEN;

    ctx.begin_path();
    ctx.move_to(from_x, from_y);
    ctx.line_to(shaft_x, shaft_y);
    ctx.set_stroke_style_str("white");
    ctx.set_line_width(2.0);
    ctx.stroke();

    ctx.begin_path();
    ctx.move_to(to_x, to_y);
    ctx.line_to(
        to_x - ARROW_HEAD_LEN * (angle - ARROW_HEAD_ANGLE).cos(),
        to_y - ARROW_HEAD_LEN * (angle - ARROW_HEAD_ANGLE).sin(),
    );
    ctx.line_to(
        to_x - ARROW_HEAD_LEN * (angle + ARROW_HEAD_ANGLE).cos(),
        to_y - ARROW_HEAD_LEN * (angle + ARROW_HEAD_ANGLE).sin(),
    );
    ctx.line_to(to_x, to_y);
    ctx.close_path();
    ctx.set_fill_style_str("white");
    ctx.fill();
    ctx.set_line_width(1.0);
}

/// Quadratic curve through consecutive sample midpoints. Smoothing is a
/// rendering detail only; the stored path keeps the raw samples.
fn draw_smoothed_path(ctx: &CanvasRenderingContext2d, path: &[Point]) {
    if path.len() < 2 {
        return;
    }
    ctx.begin_path();
    ctx.move_to(path[0].x, path[0].y);
    for i in 1..path.len() - 1 {
        let mid_x = (path[i].x + path[i + 1].x) / 2.0;
        let mid_y = (path[i].y + path[i + 1].y) / 2.0;
        ctx.quadratic_curve_to(path[i].x, path[i].y, mid_x, mid_y);
    }
    let last = path[path.len() - 1];
    ctx.line_to(last.x, last.y);
    ctx.set_stroke_style_str("white");
    ctx.set_line_width(2.0);
    ctx.stroke();
}
