// src/config/game_config.rs
//! ゲームの設定値だよ！絵柄のセットや、各種タイマーの長さ (ms) をまとめて持つ。
//!
//! JS 側から JSON で渡すこともできる。書かなかった項目はデフォルト値になるよ。
//!
//! ```json
//! { "symbols": ["🐶", "🐱"], "revert_delay_ms": 800 }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logic::deck::{validate_symbols, DEFAULT_SYMBOLS};

pub const DEFAULT_REVERT_DELAY_MS: u32 = 1000;
pub const DEFAULT_HINT_DURATION_MS: u32 = 1000;
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 使う絵柄 (重複なし、1 種類以上)
    pub symbols: Vec<String>,
    /// ハズレたカードを裏に戻すまでの時間
    pub revert_delay_ms: u32,
    /// ヒントで全カードを見せている時間
    pub hint_duration_ms: u32,
    /// 経過時間を 1 秒進める間隔
    pub tick_interval_ms: u32,
    /// ヒント機能を使うかどうか
    pub hint_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            revert_delay_ms: DEFAULT_REVERT_DELAY_MS,
            hint_duration_ms: DEFAULT_HINT_DURATION_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            hint_enabled: true,
        }
    }
}

impl GameConfig {
    /// JSON 文字列から読み込んで、そのまま検証までするよ。
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 絵柄が正しいか、タイマーの長さが 0 じゃないかをチェック。
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_symbols(self.symbols.as_slice())?;
        if self.revert_delay_ms == 0 {
            return Err(ConfigError::ZeroDuration("revert_delay_ms"));
        }
        if self.hint_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration("hint_duration_ms"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration("tick_interval_ms"));
        }
        Ok(())
    }

    /// ペアの数 (= 絵柄の種類数)。
    pub fn pair_count(&self) -> usize {
        self.symbols.len()
    }
}
