// src/logic/deck.rs

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{seq::SliceRandom, thread_rng, SeedableRng};

use crate::components::card::Card;
use crate::error::DeckError;

/// デフォルトの絵柄 8 種類だよ！🍎🍌🍒🍓🍕🍦🍩🎮 (4x4 の盤面になる)
pub const DEFAULT_SYMBOLS: [&str; 8] = ["🍎", "🍌", "🍒", "🍓", "🍕", "🍦", "🍩", "🎮"];

/// デッキの並びをかき混ぜる役割のトレイト。
///
/// 「一様ランダムな並べ替え」が約束。乱数の出どころは実装側で自由に決めてね。
/// テストでは `IdentityShuffler` を使えば並びが固定できる！
pub trait Shuffler {
    fn shuffle(&mut self, symbols: &mut [String]);
}

/// `rand::thread_rng` を使う普通のシャッフル。ブラウザでは getrandom (js) 経由で crypto API を使うよ。
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngShuffler;

impl Shuffler for ThreadRngShuffler {
    fn shuffle(&mut self, symbols: &mut [String]) {
        let mut rng = thread_rng();
        symbols.shuffle(&mut rng);
    }
}

/// シード固定のシャッフル。同じシードなら毎回同じ並びになる (再現したいとき用)。
#[derive(Debug, Clone)]
pub struct SeededShuffler {
    rng: StdRng,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle(&mut self, symbols: &mut [String]) {
        symbols.shuffle(&mut self.rng);
    }
}

/// 何もしないシャッフル。`[A, B] -> [A, B, A, B]` のまま並ぶ。
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityShuffler;

impl Shuffler for IdentityShuffler {
    fn shuffle(&mut self, _symbols: &mut [String]) {}
}

// クロージャもそのままシャッフラーとして渡せるようにしておく
impl<F> Shuffler for F
where
    F: FnMut(&mut [String]),
{
    fn shuffle(&mut self, symbols: &mut [String]) {
        self(symbols)
    }
}

/// シンボル集合が「空じゃない & 重複なし」かチェックするよ。
pub fn validate_symbols<S: AsRef<str>>(symbols: &[S]) -> Result<(), DeckError> {
    if symbols.is_empty() {
        return Err(DeckError::EmptySymbolSet);
    }
    match symbols.iter().map(|s| s.as_ref()).duplicates().next() {
        Some(dup) => Err(DeckError::DuplicateSymbol(dup.to_string())),
        None => Ok(()),
    }
}

/// N 種類の絵柄から 2N 枚のデッキを作る関数だよ！
///
/// 1. 絵柄を検証 (空 or 重複なら `DeckError`)
/// 2. 各絵柄を 2 枚ずつ並べる
/// 3. `shuffler` でかき混ぜる
/// 4. 並んだ順に `id` を 0 から振る
///
/// 返ってくるカードは全部裏向き (`Hidden`)。
pub fn build_deck<S: AsRef<str>>(
    symbols: &[S],
    shuffler: &mut dyn Shuffler,
) -> Result<Vec<Card>, DeckError> {
    validate_symbols(symbols)?;

    let mut pairs: Vec<String> = symbols
        .iter()
        .chain(symbols.iter())
        .map(|s| s.as_ref().to_string())
        .collect();
    shuffler.shuffle(&mut pairs);

    Ok(pairs
        .into_iter()
        .enumerate()
        .map(|(id, symbol)| Card::new(id, symbol))
        .collect())
}
