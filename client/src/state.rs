use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use inkroom_shared::Point;

use crate::render;
use crate::scene::Scene;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tool {
    Pointer,
    Pencil,
    Rect,
    Ellipse,
    Line,
    Arrow,
    Eraser,
}

/// Construction state of the active tool. All pointer positions live here so
/// nothing leaks across sessions through module-level mutables.
pub enum Drag {
    Idle,
    Active {
        start: Point,
        current: Point,
        /// Every sample seen since pointer-down; only the pencil reads it.
        path: Vec<Point>,
    },
}

impl Drag {
    pub fn begin(point: Point) -> Self {
        Drag::Active {
            start: point,
            current: point,
            path: vec![point],
        }
    }

    pub fn update(&mut self, point: Point) {
        if let Drag::Active { current, path, .. } = self {
            *current = point;
            path.push(point);
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Drag::Active { .. })
    }
}

/// Everything the event handlers share. Two render targets over the same
/// coordinate space: the committed scene below, the in-progress preview above.
pub struct State {
    pub scene_canvas: HtmlCanvasElement,
    pub scene_ctx: CanvasRenderingContext2d,
    pub preview_canvas: HtmlCanvasElement,
    pub preview_ctx: CanvasRenderingContext2d,
    pub scene: Scene,
    pub tool: Tool,
    pub drag: Drag,
    pub room_id: String,
    pub board_width: f64,
    pub board_height: f64,
}

impl State {
    /// Full repaint of the committed layer, in scene order.
    pub fn redraw_scene(&self) {
        render::redraw_scene(
            &self.scene_ctx,
            self.board_width,
            self.board_height,
            self.scene.snapshot(),
        );
    }

    pub fn clear_preview(&self) {
        render::clear_preview(&self.preview_ctx, self.board_width, self.board_height);
    }

    /// Drops any in-progress construction without committing or sending.
    pub fn cancel_drag(&mut self) {
        if self.drag.is_active() {
            self.drag = Drag::Idle;
            self.clear_preview();
        }
    }
}
