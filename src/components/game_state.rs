// src/components/game_state.rs

use serde::{Deserialize, Serialize};

use crate::components::card::Card;

/// 1 ゲーム (セッション) の進行状況を表す列挙型だよ！🏁
///
/// ```text
/// NotStarted → Running → (Locked ⇄ Running) → Won
///      \__________\___________\______→ Cancelled
/// ```
///
/// `Won` と `Cancelled` は終端。抜けるには新しいゲームを始めるしかないよ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// デッキはできてるけど、まだ 1 枚もめくってない (タイマーも止まってる)
    NotStarted,
    /// プレイ中！選択中のカードは 0 枚か 1 枚
    Running,
    /// 2 枚めくって、ハズレの裏返し待ち。カードのクリックは無視
    Locked,
    /// 全ペア揃った！🏆
    Won,
    /// キャンセルされた
    Cancelled,
}

impl GamePhase {
    /// 終端状態 (Won / Cancelled) かどうか。
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Cancelled)
    }

    /// 経過時間のタイマーが進むべき状態かどうか。
    pub fn is_ticking(self) -> bool {
        matches!(self, GamePhase::Running | GamePhase::Locked)
    }
}

/// JS 側に渡す、ゲーム状態のスナップショットだよ。
///
/// 読み取り専用のコピーなので、これを書き換えてもゲームには影響しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub cards: Vec<Card>,
    pub moves: u32,
    pub matches: u32,
    pub total_pairs: u32,
    pub elapsed_seconds: u32,
    pub elapsed_label: String,
    pub phase: GamePhase,
    pub hint_active: bool,
}

/// 経過秒数を `MM:SS` 形式にするよ。60 分を超えたら分の桁が増えるだけ。
pub fn format_elapsed(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
