// src/components/card.rs

// serde を使う宣言！カード情報を JSON にして JS 側へ渡すときに使うよ。
use serde::{Deserialize, Serialize};

/// カードの状態だよ！🂠
///
/// - `Hidden`: 裏向き (まだ誰も見てない)
/// - `Revealed`: 表向き (めくられてて、ペア判定待ち or ヒント表示中)
/// - `Matched`: ペアが揃った！このセッション中はもう動かない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    Hidden,
    Revealed,
    Matched,
}

/// 神経衰弱のカード 1 枚を表す構造体だよ！🃏
///
/// - `id`: デッキの中での位置 (生成時に 0 から振られる、ずっと変わらない)
/// - `symbol`: 絵柄。1 つのデッキの中で同じ絵柄はちょうど 2 枚
/// - `state`: 今の状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: usize,
    pub symbol: String,
    pub state: CardState,
}

impl Card {
    /// 裏向きのカードを作るよ。
    pub fn new(id: usize, symbol: impl Into<String>) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            state: CardState::Hidden,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.state == CardState::Hidden
    }

    pub fn is_revealed(&self) -> bool {
        self.state == CardState::Revealed
    }

    pub fn is_matched(&self) -> bool {
        self.state == CardState::Matched
    }

    /// 2 枚の絵柄が同じかどうか！ペア判定の本体はこれだけ。
    pub fn same_symbol(&self, other: &Card) -> bool {
        self.symbol == other.symbol
    }
}
