// src/app/renderer.rs
//! GameApp の描画ロジック。MatchGame から出てきたイベントを DOM に反映するだけの係だよ！🎨
//!
//! ゲームの状態を変えるのは MatchGame だけ。ここは読むだけなので、
//! 描画に失敗してもゲームの状態が中途半端になることはない。

use std::cell::RefCell;
use std::rc::Weak;

use log::{debug, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use crate::app::browser_event_manager;
use crate::app::game_app::AppState;
use crate::components::{format_elapsed, Card, CardState, GamePhase, GameSnapshot};
use crate::config::dom;
use crate::error::AppError;
use crate::logic::events::GameEvent;

/// ページ上の要素たちへの参照をまとめて持つ構造体。
pub struct BoardView {
    document: Document,
    state: Weak<RefCell<AppState>>,
    board: Element,
    moves: Option<Element>,
    matches: Option<Element>,
    time: Option<Element>,
    win_message: Option<Element>,
    overlay: Option<Element>,
    final_time: Option<Element>,
    final_moves: Option<Element>,
    cards: Vec<Element>,
    // カード要素のクリックリスナー。盤面を作り直すまで生かしておく
    card_closures: Vec<Closure<dyn FnMut(Event)>>,
}

impl BoardView {
    /// 要素を ID で探して BoardView を作る。盤面 (#game-board) だけは必須、他はあれば使う。
    pub(crate) fn mount(document: Document, state: Weak<RefCell<AppState>>) -> Result<Self, AppError> {
        let board = document
            .get_element_by_id(dom::BOARD_ID)
            .ok_or_else(|| AppError::MissingElement(dom::BOARD_ID.to_string()))?;
        let find = |id: &str| {
            let element = document.get_element_by_id(id);
            if element.is_none() {
                debug!("App::Renderer: optional element #{} not found", id);
            }
            element
        };

        Ok(Self {
            moves: find(dom::MOVES_ID),
            matches: find(dom::MATCHES_ID),
            time: find(dom::TIME_ID),
            win_message: find(dom::WIN_MESSAGE_ID),
            overlay: find(dom::OVERLAY_ID),
            final_time: find(dom::FINAL_TIME_ID),
            final_moves: find(dom::FINAL_MOVES_ID),
            document,
            state,
            board,
            cards: Vec::new(),
            card_closures: Vec::new(),
        })
    }

    /// スナップショットから画面全体を描き直す (mount 直後用)。
    pub(crate) fn render_snapshot(&mut self, snapshot: &GameSnapshot) -> Result<(), AppError> {
        if snapshot.phase == GamePhase::Cancelled {
            return self.show_cancelled();
        }
        self.rebuild_board(&snapshot.cards)?;
        set_text(&self.moves, &snapshot.moves.to_string());
        set_text(&self.matches, &snapshot.matches.to_string());
        set_text(&self.time, &snapshot.elapsed_label);
        self.apply_phase(snapshot.phase)?;
        if snapshot.hint_active {
            self.board.class_list().add_1(dom::HINT_BOARD_CLASS)?;
        }
        if snapshot.phase == GamePhase::Won {
            self.show_win(snapshot.moves, snapshot.elapsed_seconds)?;
        }
        Ok(())
    }

    /// イベントを順番に DOM へ反映するよ。
    pub(crate) fn render(&mut self, events: &[GameEvent], cards: &[Card]) -> Result<(), AppError> {
        for event in events {
            match event {
                GameEvent::SessionStarted { token, card_count } => {
                    info!("App::Renderer: building board for {:?} ({} cards)", token, card_count);
                    self.hide_win()?;
                    self.rebuild_board(cards)?;
                }
                GameEvent::CardChanged { id, state } => self.apply_card_state(*id, *state)?,
                GameEvent::MovesChanged { moves } => set_text(&self.moves, &moves.to_string()),
                GameEvent::MatchesChanged { matches } => set_text(&self.matches, &matches.to_string()),
                GameEvent::ElapsedChanged { seconds } => set_text(&self.time, &format_elapsed(*seconds)),
                GameEvent::PhaseChanged { phase } => self.apply_phase(*phase)?,
                GameEvent::HintStarted => self.board.class_list().add_1(dom::HINT_BOARD_CLASS)?,
                GameEvent::HintEnded => self.board.class_list().remove_1(dom::HINT_BOARD_CLASS)?,
                GameEvent::Won { moves, seconds } => self.show_win(*moves, *seconds)?,
            }
        }
        Ok(())
    }

    /// 盤面のカード要素を全部作り直す。古いリスナーもここで捨てる。
    fn rebuild_board(&mut self, cards: &[Card]) -> Result<(), AppError> {
        self.board.set_inner_html("");
        self.board.class_list().remove_3(dom::LOCKED_BOARD_CLASS, dom::HINT_BOARD_CLASS, dom::CANCELLED_BOARD_CLASS)?;
        self.cards.clear();
        self.card_closures.clear();

        for card in cards {
            let element = self.create_card_element(card)?;
            let closure = browser_event_manager::attach_card_listener(&element, self.state.clone(), card.id)?;
            self.board.append_child(&element)?;
            self.cards.push(element);
            self.card_closures.push(closure);
            self.apply_card_state(card.id, card.state)?;
        }
        Ok(())
    }

    /// ```html
    /// <div class="card" data-index="3">
    ///   <div class="card-inner">
    ///     <div class="card-front">🍎</div>
    ///     <div class="card-back">?</div>
    ///   </div>
    /// </div>
    /// ```
    fn create_card_element(&self, card: &Card) -> Result<Element, AppError> {
        let element = self.document.create_element("div")?;
        element.set_class_name(dom::CARD_CLASS);
        element.set_attribute("data-index", &card.id.to_string())?;

        let inner = self.document.create_element("div")?;
        inner.set_class_name(dom::CARD_INNER_CLASS);

        // 絵柄は文字列としてそのまま入れる (innerHTML には入れない)
        let front = self.document.create_element("div")?;
        front.set_class_name(dom::CARD_FRONT_CLASS);
        front.set_text_content(Some(&card.symbol));

        let back = self.document.create_element("div")?;
        back.set_class_name(dom::CARD_BACK_CLASS);
        back.set_text_content(Some(dom::CARD_BACK_TEXT));

        inner.append_child(&front)?;
        inner.append_child(&back)?;
        element.append_child(&inner)?;
        Ok(element)
    }

    fn apply_card_state(&self, card_id: usize, state: CardState) -> Result<(), AppError> {
        // キャンセル後など、要素がもう無いカードは気にしない
        let Some(element) = self.cards.get(card_id) else {
            return Ok(());
        };
        let classes = element.class_list();
        match state {
            CardState::Hidden => classes.remove_2(dom::FLIPPED_CLASS, dom::MATCHED_CLASS)?,
            CardState::Revealed => classes.add_1(dom::FLIPPED_CLASS)?,
            CardState::Matched => classes.add_2(dom::FLIPPED_CLASS, dom::MATCHED_CLASS)?,
        }
        Ok(())
    }

    fn apply_phase(&mut self, phase: GamePhase) -> Result<(), AppError> {
        let classes = self.board.class_list();
        match phase {
            GamePhase::Locked => classes.add_1(dom::LOCKED_BOARD_CLASS)?,
            GamePhase::Cancelled => self.show_cancelled()?,
            GamePhase::NotStarted | GamePhase::Running | GamePhase::Won => {
                classes.remove_1(dom::LOCKED_BOARD_CLASS)?
            }
        }
        Ok(())
    }

    fn show_win(&self, moves: u32, seconds: u32) -> Result<(), AppError> {
        set_text(&self.final_time, &format_elapsed(seconds));
        set_text(&self.final_moves, &moves.to_string());
        set_display(&self.win_message, "block")?;
        set_display(&self.overlay, "block")?;
        Ok(())
    }

    fn hide_win(&self) -> Result<(), AppError> {
        set_display(&self.win_message, "none")?;
        set_display(&self.overlay, "none")?;
        Ok(())
    }

    /// 盤面をキャンセルのお知らせに差し替えて、カウンターも 0 に戻す。
    fn show_cancelled(&mut self) -> Result<(), AppError> {
        self.hide_win()?;
        self.board.set_inner_html("");
        self.board.class_list().remove_2(dom::LOCKED_BOARD_CLASS, dom::HINT_BOARD_CLASS)?;
        self.board.class_list().add_1(dom::CANCELLED_BOARD_CLASS)?;
        self.cards.clear();
        self.card_closures.clear();

        let notice = self.document.create_element("div")?;
        notice.set_class_name(dom::CANCEL_NOTICE_CLASS);
        for line in dom::CANCEL_NOTICE_LINES {
            let paragraph = self.document.create_element("p")?;
            paragraph.set_text_content(Some(line));
            notice.append_child(&paragraph)?;
        }
        self.board.append_child(&notice)?;

        set_text(&self.moves, "0");
        set_text(&self.matches, "0");
        set_text(&self.time, &format_elapsed(0));
        info!("App::Renderer: board replaced with cancellation notice");
        Ok(())
    }
}

fn set_text(element: &Option<Element>, text: &str) {
    if let Some(element) = element {
        element.set_text_content(Some(text));
    }
}

fn set_display(element: &Option<Element>, value: &str) -> Result<(), AppError> {
    if let Some(element) = element.as_ref().and_then(|e| e.dyn_ref::<HtmlElement>()) {
        element.style().set_property("display", value)?;
    }
    Ok(())
}
