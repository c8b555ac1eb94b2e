// src/config/mod.rs
//! 設定値と定数をまとめるモジュール。

pub mod dom;
pub mod game_config;

pub use game_config::GameConfig;
