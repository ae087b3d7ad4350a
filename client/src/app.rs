use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlButtonElement, HtmlCanvasElement, HtmlSpanElement, PointerEvent};

use inkroom_shared::wire::{shape_broadcast, RoomMessage, ServerFrame};

use crate::bootstrap;
use crate::dom::{
    context_2d, event_to_point, get_element, resize_canvas, set_status, set_tool_button,
};
use crate::net;
use crate::render::draw_preview;
use crate::scene::{apply_envelope, Scene};
use crate::state::{Drag, State, Tool};
use crate::tools;
use crate::ws::{Channel, WsEvent};

const TOOL_BUTTONS: [(&str, Tool); 7] = [
    ("pointer", Tool::Pointer),
    ("pencil", Tool::Pencil),
    ("rect", Tool::Rect),
    ("ellipse", Tool::Ellipse),
    ("line", Tool::Line),
    ("arrow", Tool::Arrow),
    ("eraser", Tool::Eraser),
];

/// Entry point. The hosting page must provide two stacked canvases with ids
/// `scene` and `preview` (preview on top, receiving pointer events), one
/// button per tool id, `status`/`statusText` elements and a `visitors` span,
/// and serve the app at `/room/<roomId>?token=<credential>`. A missing
/// surface is the one fatal precondition.
#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let scene_canvas: HtmlCanvasElement = get_element(&document, "scene")?;
    let preview_canvas: HtmlCanvasElement = get_element(&document, "preview")?;
    let scene_ctx = context_2d(&scene_canvas)?;
    let preview_ctx = context_2d(&preview_canvas)?;
    for ctx in [&scene_ctx, &preview_ctx] {
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
    }

    let status_el = document
        .get_element_by_id("status")
        .ok_or_else(|| JsValue::from_str("Missing status element"))?;
    let status_text = document
        .get_element_by_id("statusText")
        .ok_or_else(|| JsValue::from_str("Missing status text"))?;
    let visitors_el: HtmlSpanElement = get_element(&document, "visitors")?;

    let room_id = net::room_id(&window)
        .ok_or_else(|| JsValue::from_str("Missing room id in path"))?;
    let token = net::auth_token(&window).unwrap_or_default();

    let state = Rc::new(RefCell::new(State {
        scene_canvas: scene_canvas.clone(),
        scene_ctx,
        preview_canvas: preview_canvas.clone(),
        preview_ctx,
        scene: Scene::new(),
        tool: Tool::Pencil,
        drag: Drag::Idle,
        room_id: room_id.clone(),
        board_width: 0.0,
        board_height: 0.0,
    }));

    let buttons: Rc<Vec<(Tool, HtmlButtonElement)>> = {
        let mut buttons = Vec::with_capacity(TOOL_BUTTONS.len());
        for (id, tool) in TOOL_BUTTONS {
            buttons.push((tool, get_element::<HtmlButtonElement>(&document, id)?));
        }
        Rc::new(buttons)
    };
    for (tool, button) in buttons.iter() {
        set_tool_button(button, *tool == Tool::Pencil);
    }

    for (tool, button) in buttons.iter() {
        let tool = *tool;
        let buttons = buttons.clone();
        let tool_state = state.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = tool_state.borrow_mut();
            // A tool switch never leaks a partial shape.
            state.cancel_drag();
            state.tool = tool;
            for (candidate, button) in buttons.iter() {
                set_tool_button(button, *candidate == tool);
            }
        });
        button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let mut state = state.borrow_mut();
        let (width, height) = resize_canvas(&window, &state.scene_canvas, &state.scene_ctx);
        let _ = resize_canvas(&window, &state.preview_canvas, &state.preview_ctx);
        state.board_width = width;
        state.board_height = height;
        state.redraw_scene();
    }

    set_status(&status_el, &status_text, "connecting", "Connecting...");

    let ws_url = net::websocket_url(&window)?;
    let channel_slot: Rc<RefCell<Option<Rc<Channel>>>> = Rc::new(RefCell::new(None));
    let channel = {
        let channel_slot = channel_slot.clone();
        let status_el = status_el.clone();
        let status_text = status_text.clone();
        let link = room_id.clone();
        Channel::connect(&ws_url, move |event| match event {
            WsEvent::Open => {
                if let Some(channel) = channel_slot.borrow().as_ref() {
                    channel.send(&RoomMessage::JoinRoom { link: link.clone() });
                }
                set_status(&status_el, &status_text, "open", "Live connection");
            }
            WsEvent::Close => {
                set_status(&status_el, &status_text, "closed", "Offline");
            }
            WsEvent::Error => {
                set_status(&status_el, &status_text, "closed", "Connection error");
            }
        })?
    };
    channel_slot.replace(Some(channel.clone()));

    {
        let window_cb = window.clone();
        let bootstrap_state = state.clone();
        let channel = channel.clone();
        let status_el = status_el.clone();
        let status_text = status_text.clone();
        let visitors_el = visitors_el.clone();
        let room_id_cb = room_id.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let url = net::history_url(&room_id_cb);
            match bootstrap::fetch_history(&window_cb, &url, &token).await {
                Ok(shapes) => {
                    let mut state = bootstrap_state.borrow_mut();
                    web_sys::console::log_1(
                        &format!("History loaded shapes={}", shapes.len()).into(),
                    );
                    state.scene.replace_all(shapes);
                    state.redraw_scene();
                }
                Err(error) => {
                    // Not fatal: the session continues with an empty scene.
                    web_sys::console::warn_1(
                        &format!("History unavailable, starting empty: {error:?}").into(),
                    );
                    set_status(&status_el, &status_text, "degraded", "History unavailable");
                }
            }

            // Live frames attach only after history has been installed.
            let message_state = bootstrap_state.clone();
            channel.attach_inbound(move |frame| match frame {
                ServerFrame::Room(RoomMessage::Chat { shape, .. }) => {
                    let mut state = message_state.borrow_mut();
                    match apply_envelope(&mut state.scene, &shape) {
                        Ok(()) => state.redraw_scene(),
                        Err(error) => {
                            web_sys::console::warn_1(
                                &format!("Dropping malformed shape frame: {error}").into(),
                            );
                        }
                    }
                }
                ServerFrame::Room(RoomMessage::VisitorCount { visitors }) => {
                    visitors_el.set_text_content(Some(&visitors.to_string()));
                }
                ServerFrame::Room(_) => {}
                ServerFrame::Ack(ack) => {
                    web_sys::console::log_1(&format!("Room join status={}", ack.status).into());
                }
            });
        });
    }

    {
        let pointer_state = state.clone();
        let onpointerdown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = pointer_state.borrow_mut();
            if state.tool == Tool::Pointer {
                return;
            }
            let Some(point) = event_to_point(&state.preview_canvas, &event) else {
                return;
            };
            state.drag = Drag::begin(point);
            let _ = state.preview_canvas.set_pointer_capture(event.pointer_id());
        });
        preview_canvas
            .add_event_listener_with_callback("pointerdown", onpointerdown.as_ref().unchecked_ref())?;
        onpointerdown.forget();
    }

    {
        let pointer_state = state.clone();
        let onpointermove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = pointer_state.borrow_mut();
            if !state.drag.is_active() {
                return;
            }
            let Some(point) = event_to_point(&state.preview_canvas, &event) else {
                return;
            };
            state.drag.update(point);
            match tools::preview(state.tool, &state.drag) {
                Some(shape) => draw_preview(
                    &state.preview_ctx,
                    state.board_width,
                    state.board_height,
                    &shape,
                ),
                None => state.clear_preview(),
            }
        });
        preview_canvas
            .add_event_listener_with_callback("pointermove", onpointermove.as_ref().unchecked_ref())?;
        onpointermove.forget();
    }

    {
        let pointer_state = state.clone();
        let channel = channel.clone();
        let onpointerup = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let message = {
                let mut state = pointer_state.borrow_mut();
                if !state.drag.is_active() {
                    return;
                }
                if let Some(point) = event_to_point(&state.preview_canvas, &event) {
                    state.drag.update(point);
                }
                let drag = std::mem::replace(&mut state.drag, Drag::Idle);
                state.clear_preview();
                let Some(shape) = tools::finish(state.tool, drag) else {
                    return;
                };
                // Local echo first: the author sees the shape before any
                // network traffic happens.
                state.scene.append(shape.clone());
                state.redraw_scene();
                shape_broadcast(&state.room_id, &shape)
            };
            match message {
                Ok(message) => channel.send(&message),
                Err(error) => {
                    web_sys::console::error_1(
                        &format!("Failed to encode shape broadcast: {error}").into(),
                    );
                }
            }
        });
        preview_canvas
            .add_event_listener_with_callback("pointerup", onpointerup.as_ref().unchecked_ref())?;
        onpointerup.forget();
    }

    {
        let pointer_state = state.clone();
        let onpointercancel = Closure::<dyn FnMut(PointerEvent)>::new(move |_| {
            let mut state = pointer_state.borrow_mut();
            state.cancel_drag();
        });
        preview_canvas.add_event_listener_with_callback(
            "pointercancel",
            onpointercancel.as_ref().unchecked_ref(),
        )?;
        onpointercancel.forget();
    }

    {
        let resize_state = state.clone();
        let window_cb = window.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            let mut state = resize_state.borrow_mut();
            let (width, height) = resize_canvas(&window_cb, &state.scene_canvas, &state.scene_ctx);
            let _ = resize_canvas(&window_cb, &state.preview_canvas, &state.preview_ctx);
            state.board_width = width;
            state.board_height = height;
            state.redraw_scene();
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    {
        let channel = channel.clone();
        let room_id = room_id.clone();
        let onbeforeunload = Closure::<dyn FnMut(Event)>::new(move |_| {
            channel.shutdown(&room_id);
        });
        window.add_event_listener_with_callback(
            "beforeunload",
            onbeforeunload.as_ref().unchecked_ref(),
        )?;
        onbeforeunload.forget();
    }

    Ok(())
}
