// src/config/dom.rs
//! ページ側の HTML と約束している要素 ID・クラス名の定数だよ！
//! index.html を変えたらここも合わせてね。

// --- 要素 ID ---
pub const BOARD_ID: &str = "game-board";
pub const MOVES_ID: &str = "moves";
pub const MATCHES_ID: &str = "matches";
pub const TIME_ID: &str = "time";
pub const NEW_GAME_BUTTON_ID: &str = "new-game";
pub const HINT_BUTTON_ID: &str = "hint";
pub const CANCEL_BUTTON_ID: &str = "cancel";
pub const PLAY_AGAIN_BUTTON_ID: &str = "play-again";
pub const WIN_MESSAGE_ID: &str = "win-message";
pub const OVERLAY_ID: &str = "overlay";
pub const FINAL_TIME_ID: &str = "final-time";
pub const FINAL_MOVES_ID: &str = "final-moves";

// --- クラス名 ---
pub const CARD_CLASS: &str = "card";
pub const CARD_INNER_CLASS: &str = "card-inner";
pub const CARD_FRONT_CLASS: &str = "card-front";
pub const CARD_BACK_CLASS: &str = "card-back";
pub const FLIPPED_CLASS: &str = "flipped";
pub const MATCHED_CLASS: &str = "matched";
pub const LOCKED_BOARD_CLASS: &str = "locked";
pub const HINT_BOARD_CLASS: &str = "hinting";
pub const CANCELLED_BOARD_CLASS: &str = "cancelled";
pub const CANCEL_NOTICE_CLASS: &str = "cancel-notice";

/// 裏面に表示する文字
pub const CARD_BACK_TEXT: &str = "?";

/// キャンセルしたときに盤面の代わりに出すメッセージ
pub const CANCEL_NOTICE_LINES: [&str; 2] = ["🚫 Game Cancelled", "Press New Game to play again."];
