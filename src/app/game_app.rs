// src/app/game_app.rs

// --- 必要なものをインポート ---
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::Event;

use crate::app::browser_event_manager;
use crate::app::browser_timers::BrowserTimers;
use crate::app::renderer::BoardView;
use crate::config::{dom, GameConfig};
use crate::error::AppError;
use crate::logic::{MatchGame, ThreadRngShuffler};

/// ブラウザで動かすときの MatchGame。タイマーは setTimeout / setInterval。
pub(crate) type GameCore = MatchGame<BrowserTimers>;

/// ボタンやタイマーのコールバックと共有する状態。
/// `Rc<RefCell<..>>` で包んで、コールバック側は `Weak` で持つよ。
pub(crate) struct AppState {
    pub(crate) game: GameCore,
    // mount() するまでは None (描画しない)
    pub(crate) view: Option<BoardView>,
}

impl AppState {
    /// 溜まったイベントを画面に反映する。mount 前はイベントを溜めたまま (take_events_json 用)。
    pub(crate) fn flush(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let events = self.game.take_events();
        if events.is_empty() {
            return;
        }
        if let Err(err) = view.render(&events, self.game.cards()) {
            report_error(&err);
        }
    }
}

/// コマンドを実行して、そのまま再描画まで行う共通処理。
/// アプリが既に捨てられていたり、借用中だったりしたら何もせず `R::default()` を返す。
pub(crate) fn run_command<R: Default>(
    state: &Weak<RefCell<AppState>>,
    command: impl FnOnce(&mut GameCore) -> R,
) -> R {
    let Some(state) = state.upgrade() else {
        debug!("App::GameApp: command after app was dropped, ignored");
        return R::default();
    };
    let Ok(mut app) = state.try_borrow_mut() else {
        warn!("App::GameApp: app state busy, command ignored");
        return R::default();
    };
    let result = command(&mut app.game);
    app.flush();
    result
}

/// 描画の失敗はゲームの状態には影響しないので、ログに出してユーザーに知らせるだけ。
fn report_error(err: &AppError) {
    error!("App::GameApp: render failed: {}", err);
    if let Some(window) = web_sys::window() {
        if window.alert_with_message(&format!("Something went wrong: {}", err)).is_err() {
            error!("App::GameApp: alert failed too");
        }
    }
}

// --- JS に公開するアプリ本体 ---
#[wasm_bindgen]
pub struct GameApp {
    state: Rc<RefCell<AppState>>,
    // ボタンのクリックリスナー。GameApp が生きている間は保持しておく
    button_closures: Vec<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl GameApp {
    /// デフォルト設定 (絵文字 8 種類、1 秒ディレイ) で作る。
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<GameApp, JsValue> {
        Ok(Self::build(GameConfig::default())?)
    }

    /// JSON の設定から作る。書いてない項目はデフォルトになるよ。
    /// 例: `{"symbols": ["A", "B", "C"], "revert_delay_ms": 800}`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<GameApp, JsValue> {
        let config = GameConfig::from_json(json).map_err(AppError::from)?;
        Ok(Self::build(config)?)
    }

    /// ページの要素 (#game-board など) を探して、ボタンをつないで盤面を描く。
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.borrow_app()?.view.is_some() {
            return Err(AppError::AlreadyMounted.into());
        }
        let window = web_sys::window().ok_or(AppError::NoWindow)?;
        let document = window.document().ok_or(AppError::NoDocument)?;
        let weak = Rc::downgrade(&self.state);

        let mut view = BoardView::mount(document.clone(), weak.clone())?;
        {
            let mut app = self.borrow_app()?;
            view.render_snapshot(&app.game.snapshot())?;
            // スナップショットで描いた分のイベントはもう要らない
            let discarded = app.game.take_events();
            debug!("App::GameApp: {} queued events folded into initial render", discarded.len());
            app.view = Some(view);
        }

        let buttons: [(&str, fn(&mut GameCore) -> bool); 4] = [
            (dom::NEW_GAME_BUTTON_ID, GameCore::start_new_game),
            (dom::PLAY_AGAIN_BUTTON_ID, GameCore::start_new_game),
            (dom::HINT_BUTTON_ID, GameCore::hint),
            (dom::CANCEL_BUTTON_ID, GameCore::cancel),
        ];
        for (button_id, command) in buttons {
            if let Some(closure) = browser_event_manager::attach_button_listener(&document, button_id, weak.clone(), command)? {
                self.button_closures.push(closure);
            }
        }

        info!("App::GameApp: mounted ({} buttons attached)", self.button_closures.len());
        Ok(())
    }

    #[wasm_bindgen(js_name = startNewGame)]
    pub fn start_new_game(&self) -> bool {
        self.command(GameCore::start_new_game)
    }

    /// 絵柄を差し替えて新しいゲーム。不正な絵柄なら false で、今のゲームはそのまま。
    #[wasm_bindgen(js_name = startNewGameWith)]
    pub fn start_new_game_with(&self, symbols: Vec<String>) -> bool {
        self.command(|game| game.start_new_game_with(symbols.as_slice()))
    }

    #[wasm_bindgen(js_name = revealCard)]
    pub fn reveal_card(&self, card_id: usize) -> bool {
        self.command(|game| game.reveal_card(card_id))
    }

    pub fn hint(&self) -> bool {
        self.command(GameCore::hint)
    }

    pub fn cancel(&self) -> bool {
        self.command(GameCore::cancel)
    }

    /// 今の状態を JSON で返す (GameSnapshot)。
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        let app = self.borrow_app()?;
        Ok(serde_json::to_string(&app.game.snapshot()).map_err(AppError::from)?)
    }

    /// 溜まっているイベントを JSON 配列で取り出す。mount していないとき用 (mount 後は描画側が消費する)。
    #[wasm_bindgen(js_name = takeEventsJson)]
    pub fn take_events_json(&self) -> Result<String, JsValue> {
        let mut app = self.borrow_app()?;
        let events = app.game.take_events();
        Ok(serde_json::to_string(&events).map_err(AppError::from)?)
    }
}

impl GameApp {
    fn build(config: GameConfig) -> Result<GameApp, AppError> {
        let pairs = config.pair_count();
        let game = MatchGame::new(config, BrowserTimers::new(), Box::new(ThreadRngShuffler))?;
        let state = Rc::new(RefCell::new(AppState { game, view: None }));
        // タイマーの呼び返し先は Rc ができてからでないと渡せない
        state.borrow_mut().game.timers_mut().set_target(Rc::downgrade(&state));

        info!("App::GameApp: created with {} pairs", pairs);
        Ok(GameApp {
            state,
            button_closures: Vec::new(),
        })
    }

    fn command(&self, command: impl FnOnce(&mut GameCore) -> bool) -> bool {
        run_command(&Rc::downgrade(&self.state), command)
    }

    fn borrow_app(&self) -> Result<std::cell::RefMut<'_, AppState>, AppError> {
        self.state.try_borrow_mut().map_err(|_| AppError::Busy)
    }
}
