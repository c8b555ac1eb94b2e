// src/error.rs
//! クレート全体で使うエラー型だよ！
//!
//! ゲーム中の操作 (reveal とか hint とか) はエラーを返さずに「無視する」設計なので、
//! ここに並ぶのは主に「組み立て時」の失敗 (デッキ生成、設定読み込み、DOM 操作) だけ。

use thiserror::Error;
use wasm_bindgen::JsValue;

/// デッキを作るときの失敗。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// シンボルが 1 つもない
    #[error("symbol set is empty")]
    EmptySymbolSet,
    /// 同じシンボルが 2 回以上指定された (ペアが 4 枚になっちゃう！)
    #[error("symbol {0:?} appears more than once in the symbol set")]
    DuplicateSymbol(String),
}

/// 設定 (GameConfig) の読み込み・検証の失敗。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

/// ブラウザ側 (app モジュール) の失敗。
#[derive(Debug, Error)]
pub enum AppError {
    #[error("browser window is not available")]
    NoWindow,
    #[error("document is not available")]
    NoDocument,
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("app is already mounted")]
    AlreadyMounted,
    #[error("app state is busy (re-entrant call)")]
    Busy,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for AppError {
    fn from(value: JsValue) -> Self {
        AppError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

// #[wasm_bindgen] の境界では JsValue に変換して JS 側に投げる
impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        JsValue::from(js_sys::Error::new(&err.to_string()))
    }
}
