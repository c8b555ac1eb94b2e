// src/logic/match_game.rs
//! 神経衰弱の本体、ターンとペア判定のステートマシンだよ！🧠
//!
//! 外から来る入力はこれだけ:
//! - `start_new_game` / `start_new_game_with` : 新しいゲーム (セッション) を作る
//! - `reveal_card(id)` : カードを 1 枚めくる
//! - `hint()` : 少しの間、全部のカードを見せる
//! - `cancel()` : ゲームを中止する
//! - `on_timer(timer)` : 予約しておいたタイマーが発火した
//!
//! どの操作も「条件を満たさなければ何もしない」で、戻り値の bool で受け付けたかどうかを返す。
//! パニックもエラーもなし！UI から連打されても壊れないのが大事。

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::components::{format_elapsed, Card, CardState, GamePhase, GameSnapshot};
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::logic::deck::{build_deck, Shuffler};
use crate::logic::events::GameEvent;
use crate::logic::timer::{ManualTimers, SessionToken, Timer, TimerId, TimerKind, Timers};

/// ゲーム 1 回ぶんの状態。新しいゲームを始めるたびに丸ごと作り直す (使い回さない)。
#[derive(Debug, Clone)]
struct GameSession {
    token: SessionToken,
    deck: Vec<Card>,
    /// めくられていて、まだ判定が終わってないカードの id (0〜2 枚)
    selection: Vec<usize>,
    moves: u32,
    matches: u32,
    elapsed_seconds: u32,
    phase: GamePhase,
    hint_active: bool,
    tick_timer: Option<TimerId>,
    revert_timer: Option<TimerId>,
    hint_timer: Option<TimerId>,
}

impl GameSession {
    fn new(token: SessionToken, deck: Vec<Card>) -> Self {
        Self {
            token,
            deck,
            selection: Vec::with_capacity(2),
            moves: 0,
            matches: 0,
            elapsed_seconds: 0,
            phase: GamePhase::NotStarted,
            hint_active: false,
            tick_timer: None,
            revert_timer: None,
            hint_timer: None,
        }
    }

    fn total_pairs(&self) -> u32 {
        (self.deck.len() / 2) as u32
    }
}

/// 神経衰弱のゲーム本体だよ！
///
/// `T` はタイマーの提供元。ブラウザなら `app::browser_timers::BrowserTimers`、
/// テストなら `ManualTimers` を使う。
pub struct MatchGame<T: Timers> {
    config: GameConfig,
    timers: T,
    shuffler: Box<dyn Shuffler>,
    session: GameSession,
    next_token: u64,
    events: VecDeque<GameEvent>,
}

impl<T: Timers> MatchGame<T> {
    /// 設定を検証して、最初のゲームを `NotStarted` の状態で用意するよ。
    pub fn new(config: GameConfig, timers: T, shuffler: Box<dyn Shuffler>) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut shuffler = shuffler;
        let deck = build_deck(config.symbols.as_slice(), &mut *shuffler)?;

        let mut game = Self {
            config,
            timers,
            shuffler,
            session: GameSession::new(SessionToken(0), Vec::new()),
            next_token: 0,
            events: VecDeque::new(),
        };
        game.install_session(deck);
        Ok(game)
    }

    // --- コマンド ---

    /// 設定中の絵柄で新しいゲームを始める。「もう一回遊ぶ」もこれ。
    pub fn start_new_game(&mut self) -> bool {
        let symbols = self.config.symbols.clone();
        self.start_new_game_with(&symbols)
    }

    /// 指定した絵柄で新しいゲームを始める。
    ///
    /// 絵柄が不正 (空 or 重複) なら何もせず false。今のゲームはそのまま残るよ。
    /// 成功したら、前のゲームのタイマーは全部キャンセルされる。
    pub fn start_new_game_with<S: AsRef<str>>(&mut self, symbols: &[S]) -> bool {
        let deck = match build_deck(symbols, &mut *self.shuffler) {
            Ok(deck) => deck,
            Err(e) => {
                warn!("MatchGame: new game rejected: {}", e);
                return false;
            }
        };
        self.config.symbols = symbols.iter().map(|s| s.as_ref().to_string()).collect();

        self.stop_all_timers();
        self.install_session(deck);
        true
    }

    /// カードを 1 枚めくるよ！
    ///
    /// 受け付けるのは `NotStarted` か `Running` で、ヒント中じゃなくて、
    /// そのカードが裏向きのときだけ。それ以外は何もせず false。
    pub fn reveal_card(&mut self, card_id: usize) -> bool {
        let phase = self.session.phase;
        if !matches!(phase, GamePhase::NotStarted | GamePhase::Running) {
            debug!("MatchGame: reveal_card({}) ignored in phase {:?}", card_id, phase);
            return false;
        }
        if self.session.hint_active {
            debug!("MatchGame: reveal_card({}) ignored while hint is showing", card_id);
            return false;
        }
        match self.session.deck.get(card_id) {
            Some(card) if card.is_hidden() => {}
            Some(card) => {
                debug!("MatchGame: reveal_card({}) ignored, card is {:?}", card_id, card.state);
                return false;
            }
            None => {
                debug!("MatchGame: reveal_card({}) ignored, no such card", card_id);
                return false;
            }
        }

        // 最初の 1 枚でタイマースタート！
        if phase == GamePhase::NotStarted {
            self.start_ticking();
            self.set_phase(GamePhase::Running);
        }

        self.set_card_state(card_id, CardState::Revealed);
        self.session.selection.push(card_id);

        if self.session.selection.len() == 2 {
            self.judge_selection();
        }
        true
    }

    /// ヒント：マッチ済み以外のカードを全部表にして、少ししたら全部裏に戻す。
    ///
    /// `Running` のときだけ。`Locked` 中はタイマーが重なるので受け付けないよ。
    /// 手数やペア数は一切変わらない。
    pub fn hint(&mut self) -> bool {
        if !self.config.hint_enabled {
            debug!("MatchGame: hint is disabled");
            return false;
        }
        if self.session.phase != GamePhase::Running || self.session.hint_active {
            debug!(
                "MatchGame: hint ignored (phase {:?}, hint_active {})",
                self.session.phase, self.session.hint_active
            );
            return false;
        }

        let hidden: Vec<usize> = self
            .session
            .deck
            .iter()
            .filter(|c| c.is_hidden())
            .map(|c| c.id)
            .collect();
        for id in hidden {
            self.set_card_state(id, CardState::Revealed);
        }

        self.session.hint_active = true;
        self.events.push_back(GameEvent::HintStarted);
        let timer = self.timer(TimerKind::HintEnd);
        self.session.hint_timer = Some(self.timers.schedule_once(self.config.hint_duration_ms, timer));
        info!("MatchGame: hint shown for {}ms", self.config.hint_duration_ms);
        true
    }

    /// ゲームを中止する。終わってない状態ならいつでも OK。2 回目以降は何もしない。
    pub fn cancel(&mut self) -> bool {
        if self.session.phase.is_terminal() {
            debug!("MatchGame: cancel ignored in phase {:?}", self.session.phase);
            return false;
        }
        self.stop_all_timers();
        self.session.hint_active = false;
        self.set_phase(GamePhase::Cancelled);
        info!("MatchGame: session {:?} cancelled", self.session.token);
        true
    }

    /// 予約していたタイマーが発火したときに呼んでね。
    ///
    /// 今のセッションのものじゃない (古いゲームの) タイマーは無視するよ。
    pub fn on_timer(&mut self, timer: Timer) -> bool {
        if timer.token != self.session.token {
            debug!(
                "MatchGame: stale {:?} timer from {:?} ignored (current {:?})",
                timer.kind, timer.token, self.session.token
            );
            return false;
        }

        match timer.kind {
            TimerKind::Tick => {
                if !self.session.phase.is_ticking() {
                    return false;
                }
                self.session.elapsed_seconds += 1;
                self.events.push_back(GameEvent::ElapsedChanged {
                    seconds: self.session.elapsed_seconds,
                });
                true
            }
            TimerKind::MismatchRevert => {
                self.session.revert_timer = None;
                if self.session.phase != GamePhase::Locked {
                    return false;
                }
                let selected: Vec<usize> = self.session.selection.drain(..).collect();
                for id in selected {
                    self.set_card_state(id, CardState::Hidden);
                }
                self.set_phase(GamePhase::Running);
                true
            }
            TimerKind::HintEnd => {
                self.session.hint_timer = None;
                if !self.session.hint_active {
                    return false;
                }
                let shown: Vec<usize> = self
                    .session
                    .deck
                    .iter()
                    .filter(|c| c.is_revealed())
                    .map(|c| c.id)
                    .collect();
                for id in shown {
                    self.set_card_state(id, CardState::Hidden);
                }
                // 選択中だったカードも裏に戻ったので、選択もリセット
                self.session.selection.clear();
                self.session.hint_active = false;
                self.events.push_back(GameEvent::HintEnded);
                true
            }
        }
    }

    // --- 読み取り ---

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn moves(&self) -> u32 {
        self.session.moves
    }

    pub fn matches(&self) -> u32 {
        self.session.matches
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.session.elapsed_seconds
    }

    pub fn total_pairs(&self) -> u32 {
        self.session.total_pairs()
    }

    pub fn hint_active(&self) -> bool {
        self.session.hint_active
    }

    pub fn token(&self) -> SessionToken {
        self.session.token
    }

    pub fn cards(&self) -> &[Card] {
        &self.session.deck
    }

    pub fn card(&self, card_id: usize) -> Option<&Card> {
        self.session.deck.get(card_id)
    }

    pub fn selection(&self) -> &[usize] {
        &self.session.selection
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// 溜まっているイベントを全部取り出す (取り出したぶんはキューから消える)。
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            cards: self.session.deck.clone(),
            moves: self.session.moves,
            matches: self.session.matches,
            total_pairs: self.session.total_pairs(),
            elapsed_seconds: self.session.elapsed_seconds,
            elapsed_label: format_elapsed(self.session.elapsed_seconds),
            phase: self.session.phase,
            hint_active: self.session.hint_active,
        }
    }

    // --- 内部処理 ---

    /// 2 枚そろったのでペア判定！
    fn judge_selection(&mut self) {
        self.set_phase(GamePhase::Locked);
        self.session.moves += 1;
        self.events.push_back(GameEvent::MovesChanged { moves: self.session.moves });

        let (first, second) = (self.session.selection[0], self.session.selection[1]);
        let is_pair = self.session.deck[first].same_symbol(&self.session.deck[second]);

        if is_pair {
            self.set_card_state(first, CardState::Matched);
            self.set_card_state(second, CardState::Matched);
            self.session.selection.clear();
            self.session.matches += 1;
            self.events.push_back(GameEvent::MatchesChanged { matches: self.session.matches });
            debug!("MatchGame: pair {} / {} matched", first, second);

            if self.session.matches == self.session.total_pairs() {
                self.finish_won();
            } else {
                self.set_phase(GamePhase::Running);
            }
        } else {
            debug!("MatchGame: {} / {} mismatch, reverting in {}ms", first, second, self.config.revert_delay_ms);
            let timer = self.timer(TimerKind::MismatchRevert);
            self.session.revert_timer = Some(self.timers.schedule_once(self.config.revert_delay_ms, timer));
        }
    }

    fn finish_won(&mut self) {
        self.stop_ticking();
        self.set_phase(GamePhase::Won);
        info!(
            "MatchGame: won in {} moves, {}",
            self.session.moves,
            format_elapsed(self.session.elapsed_seconds)
        );
        self.events.push_back(GameEvent::Won {
            moves: self.session.moves,
            seconds: self.session.elapsed_seconds,
        });
    }

    fn install_session(&mut self, deck: Vec<Card>) {
        self.next_token += 1;
        let token = SessionToken(self.next_token);
        let card_count = deck.len();
        self.session = GameSession::new(token, deck);

        info!("MatchGame: new session {:?} with {} cards", token, card_count);
        self.events.push_back(GameEvent::SessionStarted { token, card_count });
        self.events.push_back(GameEvent::MovesChanged { moves: 0 });
        self.events.push_back(GameEvent::MatchesChanged { matches: 0 });
        self.events.push_back(GameEvent::ElapsedChanged { seconds: 0 });
        self.events.push_back(GameEvent::PhaseChanged { phase: GamePhase::NotStarted });
    }

    fn timer(&self, kind: TimerKind) -> Timer {
        Timer { token: self.session.token, kind }
    }

    fn start_ticking(&mut self) {
        if self.session.tick_timer.is_some() {
            return;
        }
        let timer = self.timer(TimerKind::Tick);
        self.session.tick_timer = Some(self.timers.schedule_repeating(self.config.tick_interval_ms, timer));
    }

    /// 何回呼んでも大丈夫 (止めるのは最初の 1 回だけ)。
    fn stop_ticking(&mut self) {
        if let Some(id) = self.session.tick_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn stop_all_timers(&mut self) {
        self.stop_ticking();
        if let Some(id) = self.session.revert_timer.take() {
            self.timers.cancel(id);
        }
        if let Some(id) = self.session.hint_timer.take() {
            self.timers.cancel(id);
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.session.phase != phase {
            self.session.phase = phase;
            self.events.push_back(GameEvent::PhaseChanged { phase });
        }
    }

    fn set_card_state(&mut self, card_id: usize, state: CardState) {
        if let Some(card) = self.session.deck.get_mut(card_id) {
            // マッチ済みのカードは二度と動かさない
            if card.state != state && card.state != CardState::Matched {
                card.state = state;
                self.events.push_back(GameEvent::CardChanged { id: card_id, state });
            }
        }
    }
}

impl MatchGame<ManualTimers> {
    /// 仮想時計を `ms` 進めて、発火したタイマーを順番に `on_timer` へ流すよ。
    /// 受け付けられたタイマーの数を返す。
    pub fn advance(&mut self, ms: u64) -> usize {
        let fired = self.timers.advance(ms);
        fired.into_iter().filter(|&timer| self.on_timer(timer)).count()
    }
}
