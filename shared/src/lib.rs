use serde::{Deserialize, Serialize};

pub mod wire;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Stroke appearance carried by the box-like shapes. Field names follow the
/// wire protocol verbatim.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShapeStyle {
    pub stroke: String,
    #[serde(rename = "strokeWidth")]
    pub stroke_width: f64,
    pub roughness: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke: "white".to_string(),
            stroke_width: 1.0,
            roughness: 0.5,
        }
    }
}

/// One committed drawing primitive. The scene is an ordered sequence of these;
/// once appended a value is never mutated again.
///
/// Rect/Ellipse/Eraser store the min corner with non-negative extents. Line
/// and Arrow keep their raw endpoints because direction is meaningful. An
/// eraser mark is a shape like any other: it paints over earlier geometry and
/// removes nothing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum Shape {
    #[serde(rename = "rect")]
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        properties: ShapeStyle,
    },
    #[serde(rename = "ellipse")]
    Ellipse {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        properties: ShapeStyle,
    },
    #[serde(rename = "line", rename_all = "camelCase")]
    Line {
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
    },
    #[serde(rename = "arrow", rename_all = "camelCase")]
    Arrow {
        from_x: f64,
        from_y: f64,
        to_x: f64,
        to_y: f64,
    },
    #[serde(rename = "pencil")]
    Pencil { path: Vec<Point> },
    #[serde(rename = "eraser")]
    Eraser {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_serializes_with_wire_field_names() {
        let shape = Shape::Rect {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
            properties: ShapeStyle::default(),
        };
        let value = serde_json::to_value(&shape).expect("serialize");
        assert_eq!(value["type"], "rect");
        assert_eq!(value["x"], 10.0);
        assert_eq!(value["properties"]["stroke"], "white");
        assert_eq!(value["properties"]["strokeWidth"], 1.0);
        assert_eq!(value["properties"]["roughness"], 0.5);
    }

    #[test]
    fn line_and_arrow_keep_camel_case_endpoints() {
        let line = Shape::Line {
            start_x: 1.0,
            start_y: 2.0,
            end_x: 3.0,
            end_y: 4.0,
        };
        let value = serde_json::to_value(&line).expect("serialize");
        assert_eq!(value["type"], "line");
        assert_eq!(value["startX"], 1.0);
        assert_eq!(value["endY"], 4.0);

        let arrow = Shape::Arrow {
            from_x: 5.0,
            from_y: 6.0,
            to_x: 7.0,
            to_y: 8.0,
        };
        let value = serde_json::to_value(&arrow).expect("serialize");
        assert_eq!(value["type"], "arrow");
        assert_eq!(value["fromX"], 5.0);
        assert_eq!(value["toY"], 8.0);
    }

    #[test]
    fn pencil_path_serializes_as_point_list() {
        let pencil = Shape::Pencil {
            path: vec![Point { x: 0.0, y: 0.0 }, Point { x: 4.0, y: 2.0 }],
        };
        let value = serde_json::to_value(&pencil).expect("serialize");
        assert_eq!(value["type"], "pencil");
        assert_eq!(value["path"][1]["x"], 4.0);
    }

    #[test]
    fn eraser_parses_from_wire_form() {
        let raw = r#"{"type":"eraser","x":1.0,"y":2.0,"width":3.0,"height":4.0}"#;
        let shape: Shape = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(
            shape,
            Shape::Eraser {
                x: 1.0,
                y: 2.0,
                width: 3.0,
                height: 4.0
            }
        );
    }
}
