//! Room configuration and lifecycle phases.

use std::time::Duration;

use glyphfall_protocol::{Role, RoomStatus};
use glyphfall_tick::TickPolicy;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Timing and capacity settings shared by every room in the pool.
///
/// Every field has a default, so a JSON file only needs the fields it wants
/// to change: `{"round_secs": 90}` is a complete config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Seats per room. Capped at the number of roles.
    pub max_players: usize,

    /// Matchmaking countdown length, in ticks.
    pub matchmaking_secs: u32,

    /// First number of the pre-game sequence (`3, 2, 1, GO!`).
    pub countdown_from: u32,

    /// Round length, in ticks.
    pub round_secs: u32,

    /// Length of one matchmaking, countdown or round tick.
    pub tick_ms: u64,

    /// Time between two enemy spawns during a round.
    pub spawn_interval_ms: u64,

    /// How long a finished room stays closed before it resets.
    pub finale_grace_secs: u64,

    /// Publish the lobby every this many matchmaking ticks.
    pub lobby_heartbeat_every: u32,

    /// Overrun policy for the room's repeating timers.
    #[serde(skip, default = "default_tick_policy")]
    pub tick_policy: TickPolicy,
}

fn default_tick_policy() -> TickPolicy {
    TickPolicy::Drop
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_players: Role::ALL.len(),
            matchmaking_secs: 30,
            countdown_from: 3,
            round_secs: 60,
            tick_ms: 1000,
            spawn_interval_ms: 900,
            finale_grace_secs: 10,
            lobby_heartbeat_every: 5,
            tick_policy: default_tick_policy(),
        }
    }
}

impl RoomConfig {
    /// Clamp out-of-range values so the config is safe to run with.
    ///
    /// - `max_players` is kept within `1..=4`.
    /// - Tick counts, intervals and the heartbeat are at least 1.
    pub fn validated(mut self) -> Self {
        let max_seats = Role::ALL.len();
        if self.max_players == 0 || self.max_players > max_seats {
            tracing::warn!(
                max_players = self.max_players,
                max = max_seats,
                "max_players out of range, clamping"
            );
            self.max_players = self.max_players.clamp(1, max_seats);
        }
        self.matchmaking_secs = self.matchmaking_secs.max(1);
        self.countdown_from = self.countdown_from.max(1);
        self.round_secs = self.round_secs.max(1);
        self.tick_ms = self.tick_ms.max(1);
        self.spawn_interval_ms = self.spawn_interval_ms.max(1);
        self.lobby_heartbeat_every = self.lobby_heartbeat_every.max(1);
        self
    }

    /// Period of the matchmaking, countdown and round timers.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Period of the enemy spawner.
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    /// Delay between game over and reset.
    pub fn finale_grace(&self) -> Duration {
        Duration::from_secs(self.finale_grace_secs)
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a room.
///
/// Phases advance in a fixed order, and any phase can fall back to `Idle`
/// when the room resets:
///
/// ```text
/// Idle → Matchmaking → Countdown → Round → Finale
///  ↑________________________________________|  (reset)
/// ```
///
/// - **Idle**: nobody seated.
/// - **Matchmaking**: 1 or more players, waiting for the room to fill or the
///   countdown to run out. The only phase besides Idle that accepts joins.
/// - **Countdown**: `3, 2, 1, GO!` is playing.
/// - **Round**: enemies spawn, scores count.
/// - **Finale**: game over was sent; the room stays closed until the grace
///   delay passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Matchmaking,
    Countdown,
    Round,
    Finale,
}

impl Phase {
    /// What the lobby and room members see.
    pub fn status(self) -> RoomStatus {
        match self {
            Self::Idle => RoomStatus::Open,
            Self::Matchmaking => RoomStatus::Waiting,
            Self::Countdown | Self::Round | Self::Finale => RoomStatus::Playing,
        }
    }

    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::Idle | Self::Matchmaking)
    }

    /// Returns `true` if score reports count in this phase.
    pub fn accepts_scores(self) -> bool {
        matches!(self, Self::Round)
    }

    /// The phase that follows this one, or `None` after the finale.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Matchmaking),
            Self::Matchmaking => Some(Self::Countdown),
            Self::Countdown => Some(Self::Round),
            Self::Round => Some(Self::Finale),
            Self::Finale => None,
        }
    }

    /// Returns `true` if moving to `target` is valid. Resetting to `Idle`
    /// is always valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        target == Self::Idle || self.next() == Some(target)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Matchmaking => write!(f, "Matchmaking"),
            Self::Countdown => write!(f, "Countdown"),
            Self::Round => write!(f, "Round"),
            Self::Finale => write!(f, "Finale"),
        }
    }
}
