// src/app/browser_event_manager.rs
//! Attaches click listeners for the card elements and the control buttons.
//!
//! Listeners only hold a `Weak` reference to the app state, so a dropped `GameApp`
//! turns every pending click into a no-op instead of keeping the game alive.

use std::cell::RefCell;
use std::rc::Weak;

use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

use crate::app::game_app::{run_command, AppState, GameCore};

/// Attaches `handler` as a `click` listener on `element` and hands back the closure.
/// The caller owns the closure: dropping it while attached makes the listener throw,
/// so keep it alive for as long as the element is in the page.
pub(crate) fn attach_click_listener(
    element: &Element,
    handler: impl FnMut(Event) + 'static,
) -> Result<Closure<dyn FnMut(Event)>, JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    Ok(closure)
}

/// Click on a card: forwards to `MatchGame::reveal_card`.
pub(crate) fn attach_card_listener(
    element: &Element,
    state: Weak<RefCell<AppState>>,
    card_id: usize,
) -> Result<Closure<dyn FnMut(Event)>, JsValue> {
    attach_click_listener(element, move |_event: Event| {
        run_command(&state, |game| game.reveal_card(card_id));
    })
}

/// Click on one of the control buttons. Missing buttons are tolerated
/// (the page may not offer a hint button, for example).
pub(crate) fn attach_button_listener(
    document: &web_sys::Document,
    button_id: &str,
    state: Weak<RefCell<AppState>>,
    command: fn(&mut GameCore) -> bool,
) -> Result<Option<Closure<dyn FnMut(Event)>>, JsValue> {
    let Some(button) = document.get_element_by_id(button_id) else {
        warn!("BrowserEventManager: button #{} not found, skipping", button_id);
        return Ok(None);
    };
    let closure = attach_click_listener(&button, move |_event: Event| {
        run_command(&state, command);
    })?;
    Ok(Some(closure))
}
