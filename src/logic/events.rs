// src/logic/events.rs
//! MatchGame から描画側 (app::renderer) への「状態が変わったよ」通知。
//!
//! MatchGame は操作のたびにここのイベントをキューに積むだけ。
//! 描画側は `take_events()` でまとめて受け取って DOM に反映する。
//! ゲームロジックと描画を分けておくと、DOM なしでテストできるのが嬉しいところ！

use serde::Serialize;

use crate::components::{CardState, GamePhase};
use crate::logic::timer::SessionToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// 新しいゲームが始まった (盤面を作り直す合図)
    SessionStarted { token: SessionToken, card_count: usize },
    /// カード 1 枚の状態が変わった
    CardChanged { id: usize, state: CardState },
    MovesChanged { moves: u32 },
    MatchesChanged { matches: u32 },
    ElapsedChanged { seconds: u32 },
    PhaseChanged { phase: GamePhase },
    HintStarted,
    HintEnded,
    /// クリア！最終手数と時間つき
    Won { moves: u32, seconds: u32 },
}
