//! Core protocol types for Glyphfall's wire format.
//!
//! Everything here is serialized to JSON and read by browser clients, so the
//! serde attributes pin the exact field names the client code expects
//! (`timeLeft`, `char`, `enemyId`, …).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identity of one connected client.
///
/// One per connection, handed out by the session layer when the socket is
/// accepted. Serialized as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Number of a room in the pool (1-based).
///
/// Any `u32` deserializes; whether it names an existing room is decided by
/// the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Room status and roles
// ---------------------------------------------------------------------------

/// The externally visible status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Nobody seated.
    Open,
    /// 1–3 players seated, matchmaking countdown running.
    Waiting,
    /// Pre-game countdown, round, or post-round announcement. Not joinable.
    Playing,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Waiting => write!(f, "waiting"),
            Self::Playing => write!(f, "playing"),
        }
    }
}

/// One of the four elemental seats in a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Fire,
    Earth,
    Air,
    Water,
}

impl Role {
    /// All roles in seat order.
    pub const ALL: [Role; 4] = [Role::Fire, Role::Earth, Role::Air, Role::Water];

    /// Display color the client paints this role with.
    pub fn color(self) -> &'static str {
        match self {
            Self::Fire => "#ff4444",
            Self::Earth => "#66ff66",
            Self::Air => "#ccffff",
            Self::Water => "#44aaff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ---------------------------------------------------------------------------
// Players, enemies, projections
// ---------------------------------------------------------------------------

/// A seated player as the clients see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Serialized as `name`; the role doubles as the player's display name.
    #[serde(rename = "name")]
    pub role: Role,
    pub color: String,
    pub score: u32,
}

impl Player {
    /// A freshly seated player with score 0.
    pub fn new(id: PlayerId, role: Role) -> Self {
        Self {
            id,
            role,
            color: role.color().to_string(),
            score: 0,
        }
    }
}

/// A moving target. The server only decides where it starts and how fast it
/// moves; clients integrate the motion themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: String,
    #[serde(rename = "char")]
    pub glyph: char,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

/// Lobby view of one room: no identities, no scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyEntry {
    pub id: RoomId,
    pub count: usize,
    pub status: RoomStatus,
    pub time_left: u32,
}

/// Member view of one room, sent only to the players seated in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub players: Vec<Player>,
    pub status: RoomStatus,
    pub timer: u32,
}

/// One step of the pre-game countdown: `3`, `2`, `1`, then `"GO!"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartSignal {
    Count(u32),
    Go,
}

impl StartSignal {
    /// The literal clients receive for [`StartSignal::Go`].
    pub const GO_MARKER: &'static str = "GO!";
}

impl Serialize for StartSignal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_u32(*n),
            Self::Go => serializer.serialize_str(Self::GO_MARKER),
        }
    }
}

impl<'de> Deserialize<'de> for StartSignal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u32),
            Marker(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Self::Count(n)),
            Raw::Marker(m) if m == Self::GO_MARKER => Ok(Self::Go),
            Raw::Marker(other) => Err(serde::de::Error::custom(format!(
                "unknown start marker {other:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events a client sends.
///
/// Adjacently tagged: `{"event": "join-room", "data": 3}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinRoom(RoomId),
    LeaveRoom(RoomId),
    #[serde(rename_all = "camelCase")]
    PlayerScore { room_id: RoomId, points: u32 },
    #[serde(rename_all = "camelCase")]
    EnemyKilled { room_id: RoomId, enemy_id: String },
}

/// Events the server sends, either to one client, to a room, or to
/// everyone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// First frame on every connection: the client's own id.
    Connected { id: PlayerId },
    UpdateLobby(Vec<LobbyEntry>),
    RoomState(RoomSnapshot),
    /// Matchmaking seconds left.
    TimerUpdate(u32),
    StartSequence(StartSignal),
    GameStart(Vec<Player>),
    /// Round seconds left.
    GametimeUpdate(u32),
    SpawnEnemy(Enemy),
    ScoreUpdate(Vec<Player>),
    #[serde(rename_all = "camelCase")]
    EnemyDestroyed { enemy_id: String, killer_id: PlayerId },
    GameOver(Vec<Player>),
}

impl ServerEvent {
    /// The wire name of this event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::UpdateLobby(_) => "update-lobby",
            Self::RoomState(_) => "room-state",
            Self::TimerUpdate(_) => "timer-update",
            Self::StartSequence(_) => "start-sequence",
            Self::GameStart(_) => "game-start",
            Self::GametimeUpdate(_) => "gametime-update",
            Self::SpawnEnemy(_) => "spawn-enemy",
            Self::ScoreUpdate(_) => "score-update",
            Self::EnemyDestroyed { .. } => "enemy-destroyed",
            Self::GameOver(_) => "game-over",
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The browser client parses these frames by hand, so the tests pin the
    //! exact JSON shapes rather than just round-tripping.

    use super::*;
    use serde_json::json;

    fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    #[test]
    fn test_ids_serialize_as_plain_numbers() {
        assert_eq!(serde_json::to_string(&PlayerId(42)).unwrap(), "42");
        assert_eq!(serde_json::to_string(&RoomId(3)).unwrap(), "3");
        assert_eq!(PlayerId(7).to_string(), "P-7");
        assert_eq!(RoomId(3).to_string(), "R-3");
    }

    #[test]
    fn test_room_status_is_lowercase() {
        assert_eq!(to_json(&RoomStatus::Waiting), json!("waiting"));
        assert_eq!(RoomStatus::Playing.to_string(), "playing");
    }

    #[test]
    fn test_role_order_and_colors() {
        assert_eq!(Role::ALL.first(), Some(&Role::Fire));
        assert_eq!(Role::ALL.last(), Some(&Role::Water));
        assert_eq!(Role::Earth.color(), "#66ff66");
        assert_eq!(Role::Air.to_string(), "Air");
    }

    #[test]
    fn test_player_json_uses_role_as_name() {
        let player = Player::new(PlayerId(9), Role::Fire);
        assert_eq!(
            to_json(&player),
            json!({"id": 9, "name": "Fire", "color": "#ff4444", "score": 0})
        );
    }

    #[test]
    fn test_enemy_json_uses_char_field() {
        let enemy = Enemy {
            id: "abc123xyz".into(),
            glyph: 'ཀ',
            x: -0.1,
            y: 0.5,
            vx: 0.003,
            vy: 0.0,
        };
        let value = to_json(&enemy);
        assert_eq!(value["char"], "ཀ");
        assert_eq!(value["id"], "abc123xyz");
        assert_eq!(value["x"], -0.1);
    }

    #[test]
    fn test_lobby_entry_json_format() {
        let entry = LobbyEntry {
            id: RoomId(1),
            count: 2,
            status: RoomStatus::Waiting,
            time_left: 25,
        };
        assert_eq!(
            to_json(&entry),
            json!({"id": 1, "count": 2, "status": "waiting", "timeLeft": 25})
        );
    }

    #[test]
    fn test_start_signal_count_and_go() {
        assert_eq!(to_json(&StartSignal::Count(3)), json!(3));
        assert_eq!(to_json(&StartSignal::Go), json!("GO!"));

        let go: StartSignal = serde_json::from_str(r#""GO!""#).unwrap();
        assert_eq!(go, StartSignal::Go);
        let two: StartSignal = serde_json::from_str("2").unwrap();
        assert_eq!(two, StartSignal::Count(2));
        assert!(serde_json::from_str::<StartSignal>(r#""GO""#).is_err());
    }

    #[test]
    fn test_client_event_join_room_format() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"join-room","data":4}"#).unwrap();
        assert_eq!(event, ClientEvent::JoinRoom(RoomId(4)));
    }

    #[test]
    fn test_client_event_player_score_format() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"player-score","data":{"roomId":2,"points":15}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::PlayerScore {
                room_id: RoomId(2),
                points: 15
            }
        );
    }

    #[test]
    fn test_client_event_enemy_killed_format() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"enemy-killed","data":{"roomId":2,"enemyId":"q1w2e3r4t"}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::EnemyKilled {
                room_id: RoomId(2),
                enemy_id: "q1w2e3r4t".into()
            }
        );
    }

    #[test]
    fn test_client_event_negative_points_rejected() {
        let result: Result<ClientEvent, _> = serde_json::from_str(
            r#"{"event":"player-score","data":{"roomId":2,"points":-5}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_client_event_unknown_event_rejected() {
        let result: Result<ClientEvent, _> =
            serde_json::from_str(r#"{"event":"fly-to-moon","data":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_server_event_names_match_wire_tags() {
        let events = vec![
            ServerEvent::Connected { id: PlayerId(1) },
            ServerEvent::UpdateLobby(vec![]),
            ServerEvent::TimerUpdate(29),
            ServerEvent::StartSequence(StartSignal::Count(3)),
            ServerEvent::GameStart(vec![]),
            ServerEvent::GametimeUpdate(59),
            ServerEvent::ScoreUpdate(vec![]),
            ServerEvent::EnemyDestroyed {
                enemy_id: "e".into(),
                killer_id: PlayerId(1),
            },
            ServerEvent::GameOver(vec![]),
        ];
        for event in events {
            assert_eq!(to_json(&event)["event"], event.name());
        }
    }

    #[test]
    fn test_server_event_enemy_destroyed_format() {
        let event = ServerEvent::EnemyDestroyed {
            enemy_id: "k2j4h1x0a".into(),
            killer_id: PlayerId(7),
        };
        assert_eq!(
            to_json(&event),
            json!({"event": "enemy-destroyed", "data": {"enemyId": "k2j4h1x0a", "killerId": 7}})
        );
    }

    #[test]
    fn test_server_event_room_state_format() {
        let event = ServerEvent::RoomState(RoomSnapshot {
            id: RoomId(3),
            players: vec![Player::new(PlayerId(1), Role::Fire)],
            status: RoomStatus::Waiting,
            timer: 30,
        });
        let value = to_json(&event);
        assert_eq!(value["event"], "room-state");
        assert_eq!(value["data"]["status"], "waiting");
        assert_eq!(value["data"]["timer"], 30);
        assert_eq!(value["data"]["players"][0]["name"], "Fire");
    }
}
