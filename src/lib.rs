// src/lib.rs

// WASM と JavaScript を繋ぐための基本！
use wasm_bindgen::prelude::*;

use log::{info, LevelFilter};

// 自分で作ったモジュールたち！ これでコードを整理してるんだ。
pub mod app; // ブラウザ側のつなぎこみ (DOM、タイマー、クリック)
pub mod components; // カードやゲーム状態のデータ型
pub mod config; // 設定値と DOM の ID
pub mod error;
pub mod logger;
pub mod logic; // ルールとステートマシン (DOM なしで動く)

// よく使う型はクレートのトップからも使えるようにしておくよ。
pub use app::game_app::GameApp;
pub use components::{Card, CardState, GamePhase, GameSnapshot};
pub use config::GameConfig;
pub use error::{AppError, ConfigError, DeckError};
pub use logic::{GameEvent, ManualTimers, MatchGame, Shuffler, Timers};

// main 関数の代わりに、Wasm がロードされた時に最初に実行される関数だよ。
#[wasm_bindgen(start)]
pub fn start() {
    // パニックしたときにブラウザのコンソールにちゃんとメッセージが出るようにする
    console_error_panic_hook::set_once();
    logger::init(LevelFilter::Info);
    info!("memory_match_wasm: module loaded");
}
