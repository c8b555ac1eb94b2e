// src/logic/match_game_tests.rs
// MatchGame のシナリオテスト！仮想時計 (ManualTimers) で時間を進めながら確認するよ。

use super::deck::{IdentityShuffler, SeededShuffler};
use super::events::GameEvent;
use super::match_game::MatchGame;
use super::timer::{ManualTimers, Timer, TimerKind};
use crate::components::{CardState, GamePhase};
use crate::components::CardState::{Hidden, Matched, Revealed};
use crate::config::GameConfig;
use std::collections::HashMap;

// --- テスト用ヘルパー ---

fn config_with(symbols: &[&str]) -> GameConfig {
    GameConfig {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        ..GameConfig::default()
    }
}

/// デッキが [A, B, A, B] に並ぶゲームを作るよ。
fn game_ab() -> MatchGame<ManualTimers> {
    MatchGame::new(config_with(&["A", "B"]), ManualTimers::new(), Box::new(IdentityShuffler))
        .expect("valid config")
}

fn states(game: &MatchGame<ManualTimers>) -> Vec<CardState> {
    game.cards().iter().map(|c| c.state).collect()
}

fn revealed_count(game: &MatchGame<ManualTimers>) -> usize {
    game.cards().iter().filter(|c| c.is_revealed()).count()
}


// --- シナリオ ---

#[test]
fn two_pair_game_from_first_flip_to_win() {
    let mut game = game_ab();
    assert_eq!(game.phase(), GamePhase::NotStarted);
    assert_eq!(game.total_pairs(), 2);

    // 0 (A) をめくる
    assert!(game.reveal_card(0));
    assert_eq!(game.phase(), GamePhase::Running);
    assert_eq!(game.selection(), &[0]);
    assert_eq!(states(&game), vec![Revealed, Hidden, Hidden, Hidden]);
    assert_eq!(game.moves(), 0, "1 枚めくっただけでは手数は増えない");

    // 1 (B) をめくる → ハズレ
    assert!(game.reveal_card(1));
    assert_eq!(game.moves(), 1);
    assert_eq!(game.phase(), GamePhase::Locked);
    assert_eq!(states(&game), vec![Revealed, Revealed, Hidden, Hidden]);

    // 1 秒後に裏へ戻る
    game.advance(1000);
    assert_eq!(game.phase(), GamePhase::Running);
    assert_eq!(states(&game), vec![Hidden, Hidden, Hidden, Hidden]);
    assert!(game.selection().is_empty());

    // 0 と 2 (A, A) → アタリ
    assert!(game.reveal_card(0));
    assert!(game.reveal_card(2));
    assert_eq!(game.moves(), 2);
    assert_eq!(game.matches(), 1);
    assert_eq!(game.phase(), GamePhase::Running, "アタリなら待たずにすぐ再開");
    assert_eq!(states(&game), vec![Matched, Hidden, Matched, Hidden]);

    // 1 と 3 (B, B) → 全部そろってクリア！
    assert!(game.reveal_card(1));
    assert!(game.reveal_card(3));
    assert_eq!(game.moves(), 3);
    assert_eq!(game.matches(), 2);
    assert_eq!(game.phase(), GamePhase::Won);
    assert_eq!(states(&game), vec![Matched, Matched, Matched, Matched]);
    println!("2 ペアのシナリオ、成功！🎉");
}

#[test]
fn cancel_while_locked_makes_the_pending_revert_a_no_op() {
    let mut game = game_ab();
    game.reveal_card(0);
    game.reveal_card(1);
    assert_eq!(game.phase(), GamePhase::Locked);

    assert!(game.cancel());
    assert_eq!(game.phase(), GamePhase::Cancelled);
    let before = states(&game);

    // キャンセルで予約は消えているはず
    assert_eq!(game.timers().pending(), 0);
    game.advance(5000);
    assert_eq!(states(&game), before, "キャンセル後にカードが動いちゃダメ");
    assert_eq!(game.elapsed_seconds(), 0);

    // たとえ古いタイマーが届いても何も起きない
    let late = Timer { token: game.token(), kind: TimerKind::MismatchRevert };
    assert!(!game.on_timer(late));
    assert_eq!(states(&game), before);
}

#[test]
fn cancel_is_idempotent_and_blocks_further_commands() {
    let mut game = game_ab();
    game.reveal_card(0);
    assert!(game.cancel());
    assert!(!game.cancel(), "2 回目のキャンセルは何もしない");

    assert!(!game.reveal_card(1));
    assert!(!game.hint());
    assert_eq!(game.phase(), GamePhase::Cancelled);
}

#[test]
fn cancel_before_first_flip_is_allowed() {
    let mut game = game_ab();
    assert!(game.cancel());
    assert_eq!(game.phase(), GamePhase::Cancelled);
}

#[test]
fn cancel_after_win_is_ignored() {
    let mut game = game_ab();
    for id in [0, 2, 1, 3] {
        game.reveal_card(id);
    }
    assert_eq!(game.phase(), GamePhase::Won);
    assert!(!game.cancel());
    assert_eq!(game.phase(), GamePhase::Won);
}

#[test]
fn new_game_supersedes_a_pending_revert() {
    let mut game = game_ab();
    game.reveal_card(0);
    game.reveal_card(1);
    let old_token = game.token();

    assert!(game.start_new_game());
    assert_ne!(game.token(), old_token);
    assert_eq!(game.phase(), GamePhase::NotStarted);
    assert_eq!(game.moves(), 0);
    assert_eq!(game.timers().pending(), 0, "前のゲームのタイマーは全部キャンセル");

    // 新しいゲームで 1 枚めくった後に、古いセッションの revert が届いたとしても…
    game.reveal_card(0);
    let stale = Timer { token: old_token, kind: TimerKind::MismatchRevert };
    assert!(!game.on_timer(stale));
    assert_eq!(game.card(0).map(|c| c.state), Some(Revealed), "新しいゲームは壊れない");
    assert_eq!(game.selection(), &[0]);

    // 古いセッションの tick も無視される
    let stale_tick = Timer { token: old_token, kind: TimerKind::Tick };
    assert!(!game.on_timer(stale_tick));
    assert_eq!(game.elapsed_seconds(), 0);
}

// --- めくる操作の細かいルール ---

#[test]
fn double_click_on_the_same_card_is_a_no_op() {
    let mut game = game_ab();
    assert!(game.reveal_card(0));
    assert!(!game.reveal_card(0));
    assert_eq!(game.selection(), &[0]);
    assert_eq!(game.moves(), 0);
}

#[test]
fn unknown_card_id_is_a_no_op() {
    let mut game = game_ab();
    assert!(!game.reveal_card(99));
    assert_eq!(game.phase(), GamePhase::NotStarted, "存在しないカードでタイマーが始まっちゃダメ");
    assert_eq!(game.timers().pending(), 0);
}

#[test]
fn input_is_ignored_while_locked() {
    let mut game = game_ab();
    game.reveal_card(0);
    game.reveal_card(1);

    assert!(!game.reveal_card(2));
    assert!(!game.reveal_card(3));
    assert_eq!(game.moves(), 1);
    assert_eq!(revealed_count(&game), 2);
    assert_eq!(game.selection().len(), 2);
}

#[test]
fn matched_cards_cannot_be_revealed_again() {
    let mut game = game_ab();
    game.reveal_card(0);
    game.reveal_card(2);
    assert_eq!(game.matches(), 1);

    assert!(!game.reveal_card(0));
    assert!(!game.reveal_card(2));
    assert_eq!(game.card(0).map(|c| c.state), Some(Matched));
}

#[test]
fn commands_after_win_are_ignored() {
    let mut game = game_ab();
    for id in [0, 2, 1, 3] {
        game.reveal_card(id);
    }
    assert!(!game.reveal_card(0));
    assert!(!game.hint());
    assert_eq!(game.moves(), 2);
}

// --- 経過時間 ---

#[test]
fn timer_starts_on_first_flip_and_stops_on_win() {
    let mut game = game_ab();

    game.advance(5000);
    assert_eq!(game.elapsed_seconds(), 0, "最初にめくるまでは時間は進まない");

    game.reveal_card(0);
    game.advance(3000);
    assert_eq!(game.elapsed_seconds(), 3);

    game.reveal_card(2);
    game.reveal_card(1);
    game.reveal_card(3);
    assert_eq!(game.phase(), GamePhase::Won);
    assert!(!game.timers().is_pending(TimerKind::Tick), "クリアしたら tick は止まる");

    game.advance(10_000);
    assert_eq!(game.elapsed_seconds(), 3);
}

#[test]
fn timer_keeps_ticking_while_locked() {
    let mut game = game_ab();
    game.reveal_card(0);
    game.advance(500);
    game.reveal_card(1);
    assert_eq!(game.phase(), GamePhase::Locked);

    // t=1000 で tick、t=1500 で revert
    game.advance(600);
    assert_eq!(game.elapsed_seconds(), 1);
    assert_eq!(game.phase(), GamePhase::Locked);
    game.advance(400);
    assert_eq!(game.phase(), GamePhase::Running);
}

#[test]
fn cancel_stops_the_clock() {
    let mut game = game_ab();
    game.reveal_card(0);
    game.advance(2000);
    game.cancel();
    game.advance(2000);
    assert_eq!(game.elapsed_seconds(), 2);
    assert!(!game.timers().is_pending(TimerKind::Tick));
}

// --- ヒント ---

#[test]
fn hint_is_rejected_before_the_game_starts() {
    let mut game = game_ab();
    assert!(!game.hint());
    assert_eq!(revealed_count(&game), 0);
}

#[test]
fn hint_reveals_everything_then_hides_it_again() {
    let mut game = game_ab();
    game.reveal_card(0);
    game.reveal_card(2);
    game.reveal_card(1);
    assert_eq!(game.matches(), 1);

    assert!(game.hint());
    assert!(game.hint_active());
    assert_eq!(states(&game), vec![Matched, Revealed, Matched, Revealed]);

    // ヒント中はめくれない & 2 回目のヒントも無理
    assert!(!game.reveal_card(3));
    assert!(!game.hint());

    game.advance(1000);
    assert!(!game.hint_active());
    assert_eq!(states(&game), vec![Matched, Hidden, Matched, Hidden]);
    assert!(game.selection().is_empty(), "ヒント前に選んでたカードも解除される");
    assert_eq!(game.moves(), 1, "ヒントで手数は変わらない");
    assert_eq!(game.matches(), 1, "ヒントでペア数は変わらない");

    // 操作は再開できる
    assert!(game.reveal_card(1));
    assert!(game.reveal_card(3));
    assert_eq!(game.phase(), GamePhase::Won);
}

#[test]
fn hint_is_rejected_while_locked() {
    let mut game = game_ab();
    game.reveal_card(0);
    game.reveal_card(1);
    assert!(!game.hint());
    assert!(!game.timers().is_pending(TimerKind::HintEnd));
}

#[test]
fn hint_can_be_disabled_by_config() {
    let config = GameConfig { hint_enabled: false, ..config_with(&["A", "B"]) };
    let mut game = MatchGame::new(config, ManualTimers::new(), Box::new(IdentityShuffler)).expect("valid");
    game.reveal_card(0);
    assert!(!game.hint());
}

#[test]
fn cancel_during_hint_drops_the_hint_timer() {
    let mut game = game_ab();
    game.reveal_card(0);
    game.hint();
    assert!(game.cancel());
    assert!(!game.hint_active());
    assert_eq!(game.timers().pending(), 0);

    let before = states(&game);
    game.advance(2000);
    assert_eq!(states(&game), before);
}

// --- 新しいゲーム ---

#[test]
fn invalid_symbols_keep_the_current_session() {
    let mut game = game_ab();
    game.reveal_card(0);
    let token = game.token();

    let empty: [&str; 0] = [];
    assert!(!game.start_new_game_with(&empty));
    assert!(!game.start_new_game_with(&["X", "X"]));
    assert_eq!(game.token(), token);
    assert_eq!(game.phase(), GamePhase::Running);
    assert_eq!(game.config().symbols, vec!["A", "B"]);
}

#[test]
fn new_game_with_other_symbols_resizes_the_deck() {
    let mut game = game_ab();
    assert!(game.start_new_game_with(&["1", "2", "3"]));
    assert_eq!(game.cards().len(), 6);
    assert_eq!(game.total_pairs(), 3);

    // 「もう一回」は最後に使った絵柄を使う
    assert!(game.start_new_game());
    assert_eq!(game.cards().len(), 6);
}

// --- イベント ---

#[test]
fn events_describe_each_transition() {
    let mut game = game_ab();
    let started = game.take_events();
    assert!(matches!(started[0], GameEvent::SessionStarted { card_count: 4, .. }));
    assert!(started.contains(&GameEvent::PhaseChanged { phase: GamePhase::NotStarted }));

    game.reveal_card(0);
    assert_eq!(
        game.take_events(),
        vec![
            GameEvent::PhaseChanged { phase: GamePhase::Running },
            GameEvent::CardChanged { id: 0, state: Revealed },
        ]
    );

    game.reveal_card(2);
    let events = game.take_events();
    assert!(events.contains(&GameEvent::MovesChanged { moves: 1 }));
    assert!(events.contains(&GameEvent::CardChanged { id: 0, state: Matched }));
    assert!(events.contains(&GameEvent::CardChanged { id: 2, state: Matched }));
    assert!(events.contains(&GameEvent::MatchesChanged { matches: 1 }));

    game.advance(2000);
    assert_eq!(
        game.take_events(),
        vec![GameEvent::ElapsedChanged { seconds: 1 }, GameEvent::ElapsedChanged { seconds: 2 }]
    );

    game.reveal_card(1);
    game.reveal_card(3);
    let events = game.take_events();
    assert!(events.contains(&GameEvent::PhaseChanged { phase: GamePhase::Won }));
    assert_eq!(events.last(), Some(&GameEvent::Won { moves: 2, seconds: 2 }));
    assert!(game.take_events().is_empty(), "取り出したらキューは空");
}

#[test]
fn snapshot_mirrors_the_game() {
    let mut game = game_ab();
    game.reveal_card(0);
    game.advance(65_000);

    let snapshot = game.snapshot();
    assert_eq!(snapshot.cards.len(), 4);
    assert_eq!(snapshot.phase, GamePhase::Running);
    assert_eq!(snapshot.elapsed_seconds, 65);
    assert_eq!(snapshot.elapsed_label, "01:05");
    assert_eq!(snapshot.total_pairs, 2);
    assert!(!snapshot.hint_active);
}

// --- いろんな並びで不変条件をチェック ---

#[test]
fn invariants_hold_over_many_shuffled_games() {
    for seed in 0..40u64 {
        let config = config_with(&["a", "b", "c", "d", "e"]);
        let mut game = MatchGame::new(config, ManualTimers::new(), Box::new(SeededShuffler::new(seed)))
            .expect("valid");
        let n = game.total_pairs();
        let mut judgments = 0;
        let mut matched_once: HashMap<usize, bool> = HashMap::new();

        // まず左から順番にめくる (ハズレも混ざる)
        for step in 0..game.cards().len() {
            let moves_before = game.moves();
            let selection_before = game.selection().len();
            let accepted = game.reveal_card(step);

            if accepted && selection_before == 1 {
                judgments += 1;
            }
            assert_eq!(game.moves(), judgments, "seed {}: 手数は判定の回数と同じ", seed);
            assert!(game.moves() <= moves_before + 1);
            assert!(game.selection().len() <= 2);
            assert!(revealed_count(&game) <= 2, "seed {}: 表向きは 2 枚まで", seed);

            for card in game.cards() {
                if card.is_matched() {
                    matched_once.insert(card.id, true);
                } else {
                    assert!(!matched_once.contains_key(&card.id), "seed {}: マッチ済みが戻った", seed);
                }
            }
            game.advance(1000);
        }

        // 残りは絵柄を知っている「ズル」プレイヤーで片付ける
        loop {
            let remaining: Vec<(usize, String)> = game
                .cards()
                .iter()
                .filter(|c| c.is_hidden())
                .map(|c| (c.id, c.symbol.clone()))
                .collect();
            let Some((first, symbol)) = remaining.first().cloned() else { break };
            let second = remaining
                .iter()
                .skip(1)
                .find(|(_, s)| *s == symbol)
                .map(|(id, _)| *id)
                .expect("pair partner exists");
            assert!(game.reveal_card(first));
            assert!(game.reveal_card(second));
        }

        assert_eq!(game.matches(), n);
        assert_eq!(game.phase(), GamePhase::Won, "seed {}: 全ペアそろったら Won", seed);
        assert!(game.cards().iter().all(|c| c.is_matched()));
    }
    println!("不変条件テスト、成功！🎉");
}
