//! Cancellable timers for Glyphfall room actors.
//!
//! A room runs several clocks at once: the matchmaking countdown, the
//! pre-game countdown, the round clock, the enemy spawner and the
//! post-round grace delay. Each one is a [`Ticker`]: either repeating
//! ([`Ticker::every`]) or one-shot ([`Ticker::once`]), created disarmed and
//! armed with [`Ticker::start`].
//!
//! # Integration
//!
//! Tickers sit inside a room actor's `tokio::select!` loop next to the
//! command channel:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* may start or cancel tickers */ }
//!         _ = matchmaking.wait_for_tick() => { /* one second passed */ }
//!         _ = grace.wait_for_tick() => { /* fired once, now disarmed */ }
//!     }
//! }
//! ```
//!
//! A disarmed ticker pends forever, so its branch simply never wins. Because
//! the actor owns its tickers and only touches them between `select!`
//! iterations, a ticker canceled by a command can never fire afterwards.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How a repeating ticker reschedules after it fired late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Schedule the next tick one period from now.
    /// Late ticks push every later tick back.
    #[default]
    Skip,
    /// Schedule the next tick one period after the missed deadline.
    /// Keeps the original cadence, so a late tick is followed by a short gap.
    Drop,
}

// ---------------------------------------------------------------------------
// Tick info
// ---------------------------------------------------------------------------

/// Information about one fired tick, returned by [`Ticker::wait_for_tick`].
#[derive(Debug, Clone, Copy)]
pub struct TickInfo {
    /// Ticks fired since the last [`Ticker::start`] (starts at 1).
    pub tick: u64,
    /// How far past its deadline the tick woke up.
    pub late_by: Duration,
    /// `true` if the tick was more than 10% of a period late.
    pub overrun: bool,
}

// ---------------------------------------------------------------------------
// Ticker
// ---------------------------------------------------------------------------

/// A repeating or one-shot timer that can be armed and canceled.
#[derive(Debug)]
pub struct Ticker {
    name: &'static str,
    period: Duration,
    repeat: bool,
    policy: TickPolicy,
    /// `None` while disarmed.
    next_tick: Option<Instant>,
    tick_count: u64,
}

impl Ticker {
    /// A disarmed ticker that fires every `period` once started.
    ///
    /// A zero period is raised to one millisecond.
    pub fn every(period: Duration) -> Self {
        Self::new(period, true)
    }

    /// A disarmed ticker that fires once, `delay` after it is started.
    pub fn once(delay: Duration) -> Self {
        Self::new(delay, false)
    }

    fn new(period: Duration, repeat: bool) -> Self {
        Self {
            name: "ticker",
            period: period.max(Duration::from_millis(1)),
            repeat,
            policy: TickPolicy::default(),
            next_tick: None,
            tick_count: 0,
        }
    }

    /// Sets the name used in log lines.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Sets the overrun policy. Only meaningful for repeating tickers.
    pub fn with_policy(mut self, policy: TickPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Arms the ticker. The first tick fires one period from now.
    ///
    /// Starting an armed ticker restarts it from now.
    pub fn start(&mut self) {
        self.next_tick = Some(Instant::now() + self.period);
        self.tick_count = 0;
        debug!(
            timer = self.name,
            period_ms = self.period.as_millis() as u64,
            repeat = self.repeat,
            "timer started"
        );
    }

    /// Disarms the ticker. Safe to call on a disarmed ticker.
    pub fn cancel(&mut self) {
        if self.next_tick.take().is_some() {
            debug!(timer = self.name, ticks = self.tick_count, "timer canceled");
        }
    }

    /// Whether the ticker will fire again.
    pub fn is_armed(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Wait until the next tick is due.
    ///
    /// Pends forever while disarmed. Cancel-safe: dropping the future before
    /// it resolves leaves the ticker untouched. A one-shot ticker disarms
    /// itself when it fires.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let Some(next) = self.next_tick else {
            return std::future::pending().await;
        };

        time::sleep_until(next).await;

        let now = Instant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > self.period / 10;
        if overrun {
            warn!(
                timer = self.name,
                tick = self.tick_count,
                late_ms = late_by.as_secs_f64() * 1000.0,
                policy = ?self.policy,
                "timer fired late"
            );
        }

        self.next_tick = if self.repeat {
            Some(match self.policy {
                TickPolicy::Skip => now + self.period,
                TickPolicy::Drop => next + self.period,
            })
        } else {
            None
        };

        trace!(timer = self.name, tick = self.tick_count, "timer fired");

        TickInfo {
            tick: self.tick_count,
            late_by,
            overrun,
        }
    }

    /// Ticks fired since the last start.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The period (or delay, for one-shot tickers).
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the ticker repeats.
    pub fn is_repeating(&self) -> bool {
        self.repeat
    }

    /// The overrun policy.
    pub fn policy(&self) -> TickPolicy {
        self.policy
    }
}
