use wasm_bindgen::JsValue;
use web_sys::Window;

/// Relay endpoint derived from the page location; the bearer token rides
/// along as a query parameter, which is what the relay expects.
pub fn websocket_url(window: &Window) -> Result<String, JsValue> {
    let location = window.location();
    let protocol = location.protocol()?;
    let host = location.host()?;
    let search = location.search()?;
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    match token_from_search(&search) {
        Some(token) => Ok(format!("{scheme}://{host}/ws?token={token}")),
        None => Ok(format!("{scheme}://{host}/ws")),
    }
}

/// Room-scoped read of the durable shape store.
pub fn history_url(room_id: &str) -> String {
    format!("/api/room/shapes/{room_id}")
}

pub fn room_id(window: &Window) -> Option<String> {
    let path = window.location().pathname().ok()?;
    room_id_from_path(&path)
}

pub fn auth_token(window: &Window) -> Option<String> {
    let search = window.location().search().ok()?;
    token_from_search(&search)
}

fn room_id_from_path(path: &str) -> Option<String> {
    let mut parts = path.trim_matches('/').split('/');
    if parts.next()? != "room" {
        return None;
    }
    let room_id = parts.next()?;
    if room_id.is_empty() {
        None
    } else {
        Some(room_id.to_string())
    }
}

fn token_from_search(search: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == "token" && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_id_parses_from_room_path() {
        assert_eq!(room_id_from_path("/room/abc-123"), Some("abc-123".to_string()));
        assert_eq!(room_id_from_path("/room/abc/extra"), Some("abc".to_string()));
        assert_eq!(room_id_from_path("/room/"), None);
        assert_eq!(room_id_from_path("/dashboard"), None);
        assert_eq!(room_id_from_path("/"), None);
    }

    #[test]
    fn token_parses_from_query_string() {
        assert_eq!(
            token_from_search("?token=tok-1&debug=1"),
            Some("tok-1".to_string())
        );
        assert_eq!(
            token_from_search("?debug=1&token=tok-2"),
            Some("tok-2".to_string())
        );
        assert_eq!(token_from_search("?token="), None);
        assert_eq!(token_from_search("?other=x"), None);
        assert_eq!(token_from_search(""), None);
    }

    #[test]
    fn history_url_targets_the_room() {
        assert_eq!(history_url("r1"), "/api/room/shapes/r1");
    }
}
