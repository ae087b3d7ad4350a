use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use inkroom_shared::wire::{decode_server_frame, RoomMessage, ServerFrame};

#[derive(Debug)]
pub enum WsEvent {
    Open,
    Close,
    Error,
}

/// One persistent connection to the relay. Outbound sends are
/// fire-and-forget; the inbound handler is attached separately so history
/// replay can finish first.
pub struct Channel {
    socket: WebSocket,
}

impl Channel {
    pub fn connect(
        url: &str,
        on_event: impl 'static + FnMut(WsEvent),
    ) -> Result<Rc<Channel>, JsValue> {
        let socket = WebSocket::new(url)?;
        let channel = Rc::new(Channel {
            socket: socket.clone(),
        });
        let on_event = Rc::new(RefCell::new(on_event));

        {
            let on_event = on_event.clone();
            let onopen = Closure::<dyn FnMut(Event)>::new(move |_| {
                on_event.borrow_mut()(WsEvent::Open);
            });
            socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
            onopen.forget();
        }

        {
            let on_event = on_event.clone();
            let onclose = Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
                web_sys::console::warn_1(
                    &format!(
                        "WS close code={} was_clean={} reason={:?}",
                        event.code(),
                        event.was_clean(),
                        event.reason()
                    )
                    .into(),
                );
                on_event.borrow_mut()(WsEvent::Close);
            });
            socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
            onclose.forget();
        }

        {
            let on_event = on_event.clone();
            let onerror = Closure::<dyn FnMut(Event)>::new(move |_| {
                on_event.borrow_mut()(WsEvent::Error);
            });
            socket.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        }

        Ok(channel)
    }

    pub fn is_open(&self) -> bool {
        self.socket.ready_state() == WebSocket::OPEN
    }

    /// Serialize and send if the socket is open; no ack, no retry, no
    /// buffering of our own.
    pub fn send(&self, message: &RoomMessage) {
        if !self.is_open() {
            return;
        }
        if let Ok(payload) = serde_json::to_string(message) {
            let _ = self.socket.send_with_str(&payload);
        }
    }

    /// Attaches the inbound handler. Called only after bootstrap has seeded
    /// the scene, so an early live frame can neither precede nor duplicate
    /// the historical replay. Malformed frames are logged and dropped; the
    /// handler never throws.
    pub fn attach_inbound(&self, mut on_frame: impl 'static + FnMut(ServerFrame)) {
        let onmessage = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let Some(text) = event.data().as_string() else {
                web_sys::console::error_2(
                    &"WS message data is not a string".into(),
                    &event.data(),
                );
                return;
            };
            match decode_server_frame(&text) {
                Ok(frame) => on_frame(frame),
                Err(error) => {
                    let snippet: String = text.chars().take(200).collect();
                    web_sys::console::warn_1(
                        &format!("WS message parse error: {error} payload={snippet:?}").into(),
                    );
                }
            }
        });
        self.socket
            .set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        onmessage.forget();
    }

    /// Sends the leave notice if the socket is still open, then detaches
    /// every handler and closes. Nothing is processed after this returns.
    pub fn shutdown(&self, room_id: &str) {
        if self.is_open() {
            self.send(&RoomMessage::LeaveRoom {
                room_id: room_id.to_string(),
            });
        }
        self.socket.set_onopen(None);
        self.socket.set_onclose(None);
        self.socket.set_onerror(None);
        self.socket.set_onmessage(None);
        let _ = self.socket.close();
    }
}
