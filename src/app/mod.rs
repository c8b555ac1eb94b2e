// src/app/mod.rs
//! ブラウザ側のつなぎこみ (DOM、タイマー、クリック) をまとめるモジュールだよ！
//! ゲームのルールは全部 `logic` 側。ここは呼び出して描くだけ。

pub mod browser_event_manager;
pub mod browser_timers;
pub mod game_app;
pub mod renderer;
