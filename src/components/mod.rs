// src/components/mod.rs

// ゲームに登場する「データ」の型をまとめるモジュールだよ！
pub mod card;
pub mod game_state;

pub use card::{Card, CardState};
pub use game_state::{format_elapsed, GamePhase, GameSnapshot};
