use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, Window};

use inkroom_shared::wire::{decode_envelope, HistoryResponse, WireError};
use inkroom_shared::Shape;

/// Decodes the durable store's history payload. Each record carries an
/// envelope-encoded shape string; any undecodable record fails the whole
/// read, which callers treat as empty history.
pub fn parse_history(text: &str) -> Result<Vec<Shape>, WireError> {
    let response: HistoryResponse = serde_json::from_str(text)?;
    response
        .shapes
        .iter()
        .map(|record| decode_envelope(&record.shape))
        .collect()
}

/// One-shot history read, issued before the inbound handler attaches. The
/// bearer credential rides in the Authorization header and is never
/// inspected here.
pub async fn fetch_history(
    window: &Window,
    url: &str,
    token: &str,
) -> Result<Vec<Shape>, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Authorization", token)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "history request failed: {}",
            response.status()
        )));
    }

    let text = JsFuture::from(response.text()?).await?;
    let text = text
        .as_string()
        .ok_or_else(|| JsValue::from_str("history response is not text"))?;
    parse_history(&text).map_err(|error| JsValue::from_str(&format!("history decode: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkroom_shared::wire::encode_envelope;

    fn history_text(shapes: &[Shape]) -> String {
        let records: Vec<serde_json::Value> = shapes
            .iter()
            .map(|shape| {
                serde_json::json!({ "shape": encode_envelope(shape).expect("encode") })
            })
            .collect();
        serde_json::json!({ "shapes": records }).to_string()
    }

    #[test]
    fn n_records_decode_to_n_shapes_in_order() {
        let shapes = vec![
            Shape::Line {
                start_x: 1.0,
                start_y: 0.0,
                end_x: 1.0,
                end_y: 1.0,
            },
            Shape::Eraser {
                x: 0.0,
                y: 0.0,
                width: 5.0,
                height: 5.0,
            },
            Shape::Arrow {
                from_x: 2.0,
                from_y: 2.0,
                to_x: 3.0,
                to_y: 3.0,
            },
        ];
        let decoded = parse_history(&history_text(&shapes)).expect("parse");
        assert_eq!(decoded, shapes);
    }

    #[test]
    fn empty_history_decodes_to_empty_scene() {
        let decoded = parse_history(r#"{"shapes":[]}"#).expect("parse");
        assert!(decoded.is_empty());
    }

    #[test]
    fn corrupt_record_fails_the_whole_read() {
        let text = r#"{"shapes":[{"shape":"{\"shape\":{\"type\":\"line\",\"startX\":0.0,\"startY\":0.0,\"endX\":1.0,\"endY\":1.0}}"},{"shape":"garbage"}]}"#;
        assert!(parse_history(text).is_err());
    }

    #[test]
    fn non_history_payload_is_rejected() {
        assert!(parse_history("<html>not json</html>").is_err());
        assert!(parse_history(r#"{"rows":[]}"#).is_err());
    }
}
