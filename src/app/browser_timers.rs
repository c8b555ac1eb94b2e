// src/app/browser_timers.rs
//! `Timers` トレイトのブラウザ実装。`window.setTimeout` / `window.setInterval` を使うよ！
//!
//! 発火したら `AppState` を借りて `MatchGame::on_timer` を呼び、そのまま再描画まで行う。
//! `AppState` への参照は `Weak` で持つ (AppState → MatchGame → BrowserTimers → AppState の循環を切るため)。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;

use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::app::game_app::AppState;
use crate::logic::timer::{Timer, TimerId, Timers};

enum ActiveTimer {
    /// setTimeout のハンドル。コールバックは once_into_js で JS 側が持っている
    Once(i32),
    /// setInterval のハンドルと、そのコールバック (キャンセルまでこちらで保持)
    Repeating(i32, Closure<dyn FnMut()>),
}

pub struct BrowserTimers {
    target: Weak<RefCell<AppState>>,
    next_id: u64,
    active: HashMap<TimerId, ActiveTimer>,
}

impl BrowserTimers {
    /// 呼び返し先は後から `set_target` で設定する。
    pub(crate) fn new() -> Self {
        Self {
            target: Weak::new(),
            next_id: 0,
            active: HashMap::new(),
        }
    }

    pub(crate) fn set_target(&mut self, target: Weak<RefCell<AppState>>) {
        self.target = target;
    }

    /// 発火済みの 1 回タイマーを管理表から消す。
    fn forget(&mut self, id: TimerId) {
        self.active.remove(&id);
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// タイマーが発火したときの共通処理。
fn dispatch(target: &Weak<RefCell<AppState>>, id: TimerId, timer: Timer, once: bool) {
    let Some(state) = target.upgrade() else {
        debug!("BrowserTimers: app already dropped, {:?} ignored", timer.kind);
        return;
    };
    let Ok(mut app) = state.try_borrow_mut() else {
        warn!("BrowserTimers: app state busy, {:?} timer dropped", timer.kind);
        return;
    };
    if once {
        app.game.timers_mut().forget(id);
    }
    app.game.on_timer(timer);
    app.flush();
}

impl Timers for BrowserTimers {
    fn schedule_once(&mut self, delay_ms: u32, timer: Timer) -> TimerId {
        let id = self.allocate_id();
        let target = self.target.clone();
        let callback = Closure::once_into_js(move || dispatch(&target, id, timer, true));

        let handle = web_sys::window().ok_or_else(|| JsValue::from_str("no window")).and_then(|window| {
            window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms as i32,
            )
        });
        match handle {
            Ok(handle) => {
                self.active.insert(id, ActiveTimer::Once(handle));
            }
            Err(e) => error!("BrowserTimers: setTimeout failed for {:?}: {:?}", timer.kind, e),
        }
        id
    }

    fn schedule_repeating(&mut self, interval_ms: u32, timer: Timer) -> TimerId {
        let id = self.allocate_id();
        let target = self.target.clone();
        let callback = Closure::<dyn FnMut()>::new(move || dispatch(&target, id, timer, false));

        let handle = web_sys::window().ok_or_else(|| JsValue::from_str("no window")).and_then(|window| {
            window.set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                interval_ms as i32,
            )
        });
        match handle {
            Ok(handle) => {
                self.active.insert(id, ActiveTimer::Repeating(handle, callback));
            }
            Err(e) => error!("BrowserTimers: setInterval failed for {:?}: {:?}", timer.kind, e),
        }
        id
    }

    fn cancel(&mut self, id: TimerId) {
        let Some(active) = self.active.remove(&id) else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        match active {
            ActiveTimer::Once(handle) => window.clear_timeout_with_handle(handle),
            // clearInterval の後なら Closure を捨てても呼ばれることはない
            ActiveTimer::Repeating(handle, _callback) => window.clear_interval_with_handle(handle),
        }
    }
}
