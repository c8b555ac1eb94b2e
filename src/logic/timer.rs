// src/logic/timer.rs
//! タイマー (「○ms 後に呼んで」「○ms ごとに呼んで」) の抽象化だよ！⏱️
//!
//! MatchGame はブラウザの `setTimeout` を直接知らない。代わりに `Timers` トレイト越しに
//! 予約して、時間が来たら呼び出し側が `MatchGame::on_timer(timer)` を呼び返す約束。
//! 予約には必ず `SessionToken` が入っているので、古いゲームのタイマーが
//! 新しいゲームを壊すことはない (MatchGame 側でトークンを見て捨てる)。

use serde::{Deserialize, Serialize};

/// ゲーム 1 回ぶんを識別する番号。新しいゲームを始めるたびに増える。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionToken(pub u64);

/// タイマー予約の ID。キャンセルするときに使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// 何のためのタイマーか。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// 経過時間を 1 秒進める (繰り返し)
    Tick,
    /// ハズレた 2 枚を裏に戻す (1 回だけ)
    MismatchRevert,
    /// ヒント表示を終わらせる (1 回だけ)
    HintEnd,
}

/// 発火したときに MatchGame に返ってくる中身。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timer {
    pub token: SessionToken,
    pub kind: TimerKind,
}

/// タイマーを提供する側 (ブラウザ / テスト用の仮想時計) が実装するトレイト。
pub trait Timers {
    /// `delay_ms` 後に 1 回だけ `timer` を発火させる。
    fn schedule_once(&mut self, delay_ms: u32, timer: Timer) -> TimerId;
    /// `interval_ms` ごとに `timer` を発火させ続ける (キャンセルされるまで)。
    fn schedule_repeating(&mut self, interval_ms: u32, timer: Timer) -> TimerId;
    /// 予約を取り消す。もう発火済み・取り消し済みの ID でも安全に呼べること。
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone)]
struct Scheduled {
    id: TimerId,
    due_ms: u64,
    interval_ms: Option<u64>,
    timer: Timer,
}

/// 手動で時間を進める仮想時計だよ。テストやヘッドレスで動かすとき用！
///
/// `advance(ms)` で時間を進めると、期限が来た予約を発火順に返してくれる。
/// 返ってきた `Timer` を `MatchGame::on_timer` に渡すのは呼び出し側の仕事。
#[derive(Debug, Default, Clone)]
pub struct ManualTimers {
    now_ms: u64,
    next_id: u64,
    scheduled: Vec<Scheduled>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 今の仮想時刻 (ms)。
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// まだ生きてる予約の数。
    pub fn pending(&self) -> usize {
        self.scheduled.len()
    }

    /// 指定した種類の予約が生きてるか。
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.scheduled.iter().any(|s| s.timer.kind == kind)
    }

    /// 時間を `ms` 進めて、その間に発火したタイマーを時刻順に返すよ。
    /// 繰り返しタイマーは進めた時間のぶんだけ何回でも出てくる。
    pub fn advance(&mut self, ms: u64) -> Vec<Timer> {
        let target = self.now_ms + ms;
        let mut fired = Vec::new();

        // 期限が一番早いものから 1 つずつ処理する (同時刻なら予約順)
        while let Some(index) = self
            .scheduled
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= target)
            .min_by_key(|(_, s)| (s.due_ms, s.id))
            .map(|(i, _)| i)
        {
            let entry = self.scheduled[index].clone();
            self.now_ms = entry.due_ms;
            fired.push(entry.timer);
            match entry.interval_ms {
                Some(interval) => self.scheduled[index].due_ms += interval,
                None => {
                    self.scheduled.remove(index);
                }
            }
        }

        self.now_ms = target;
        fired
    }

    fn push(&mut self, delay_ms: u32, interval_ms: Option<u64>, timer: Timer) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.scheduled.push(Scheduled {
            id,
            due_ms: self.now_ms + u64::from(delay_ms),
            interval_ms,
            timer,
        });
        id
    }
}

impl Timers for ManualTimers {
    fn schedule_once(&mut self, delay_ms: u32, timer: Timer) -> TimerId {
        self.push(delay_ms, None, timer)
    }

    fn schedule_repeating(&mut self, interval_ms: u32, timer: Timer) -> TimerId {
        // 間隔 0 だと advance が終わらなくなるので最低 1ms
        let interval = u64::from(interval_ms.max(1));
        self.push(interval_ms.max(1), Some(interval), timer)
    }

    fn cancel(&mut self, id: TimerId) {
        self.scheduled.retain(|s| s.id != id);
    }
}
