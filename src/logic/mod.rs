// src/logic/mod.rs
//! ゲームのルールとステートマシン。DOM には一切触らないので、普通の `cargo test` で全部試せるよ！

pub mod deck;
pub mod events;
pub mod match_game;
pub mod timer;

#[cfg(test)]
mod match_game_tests;

pub use deck::{build_deck, IdentityShuffler, SeededShuffler, Shuffler, ThreadRngShuffler, DEFAULT_SYMBOLS};
pub use events::GameEvent;
pub use match_game::MatchGame;
pub use timer::{ManualTimers, SessionToken, Timer, TimerId, TimerKind, Timers};
