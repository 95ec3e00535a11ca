//! Enemy spawn generator.
//!
//! Each spawn picks one of the four viewport edges, places the enemy just
//! outside it and sends it inward with a small sideways drift. The server
//! only decides the starting point and velocity; every client replays the
//! same straight-line motion.

use std::ops::Range;

use glyphfall_protocol::Enemy;
use rand::Rng;

/// Consonants enemies are labeled with.
pub const GLYPHS: &str = "ཀཁགངཅཆཇཉཏཐདནཔཕབམཙཚཛཝཞཟའཡརལཤསཧཨ";

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// The edge an enemy enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// Produces enemies. Stateless apart from its tuning.
#[derive(Debug, Clone)]
pub struct Spawner {
    glyphs: Vec<char>,
    /// Inward speed, in viewport widths per frame.
    speed: Range<f64>,
    /// Distance outside the viewport enemies start at.
    margin: f64,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            glyphs: GLYPHS.chars().collect(),
            speed: 0.002..0.005,
            margin: 0.1,
        }
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates one enemy.
    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Enemy {
        let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
        self.spawn_from(edge, rng)
    }

    /// Generates one enemy entering from `edge`.
    pub fn spawn_from<R: Rng + ?Sized>(&self, edge: Edge, rng: &mut R) -> Enemy {
        let speed = rng.random_range(self.speed.clone());
        let along: f64 = rng.random();
        let drift = (rng.random::<f64>() - 0.5) * speed;
        let (near, far) = (-self.margin, 1.0 + self.margin);

        let (x, y, vx, vy) = match edge {
            Edge::Top => (along, near, drift, speed),
            Edge::Right => (far, along, -speed, drift),
            Edge::Bottom => (along, far, drift, -speed),
            Edge::Left => (near, along, speed, drift),
        };

        Enemy {
            id: random_id(rng),
            glyph: self.glyphs[rng.random_range(0..self.glyphs.len())],
            x,
            y,
            vx,
            vy,
        }
    }
}

fn random_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect()
}
