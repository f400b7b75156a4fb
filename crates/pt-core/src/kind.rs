//! Particle kinds and their per-kind parameter table.
//!
//! Only cells make decisions through a behavior tree.  The other kinds are
//! passive: they are food, or the short-lived remains of something that was
//! eaten or killed, and they move through a small type-transition table
//! ([`Lifetime`]) instead of a tree.

use std::fmt;

/// What a particle currently is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParticleKind {
    /// A living agent driven by a behavior tree.
    Cell,
    /// Edible plant matter.
    Food,
    /// Food that has been eaten and is waiting to regrow.
    DeadFood,
    /// Remains of a cell killed in a fight.  Edible until it decays.
    Corpse,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 4] = [
        ParticleKind::Cell,
        ParticleKind::Food,
        ParticleKind::DeadFood,
        ParticleKind::Corpse,
    ];

    /// `true` for kinds a cell can eat.
    #[inline]
    pub fn is_edible(self) -> bool {
        matches!(self, ParticleKind::Food | ParticleKind::Corpse)
    }

    /// `true` for kinds that run a behavior tree.
    #[inline]
    pub fn decides(self) -> bool {
        matches!(self, ParticleKind::Cell)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ParticleKind::Cell => "cell",
            ParticleKind::Food => "food",
            ParticleKind::DeadFood => "dead_food",
            ParticleKind::Corpse => "corpse",
        }
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Color ─────────────────────────────────────────────────────────────────────

/// Linear RGBA colour, consumed by renderers through output snapshots.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BLUE: Color = Color([0.2, 0.4, 1.0, 1.0]);
    pub const GREEN: Color = Color([0.3, 0.9, 0.2, 1.0]);
    pub const BROWN: Color = Color([0.45, 0.3, 0.15, 1.0]);
    pub const RED: Color = Color([0.8, 0.1, 0.1, 1.0]);

    /// Convert hue (degrees), saturation and value (both `0..=1`) to RGBA.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Color {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = value * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = value - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Color([r + m, g + m, b + m, 1.0])
    }
}

// ── Lifetime transitions ──────────────────────────────────────────────────────

/// What happens to a passive particle once its lifetime elapses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fate {
    /// Re-initialise the particle in place as another kind.
    Become(ParticleKind),
    /// Kill the particle and return its slot to the pool.
    Remove,
}

/// Entry of the type-transition table.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lifetime {
    /// Seconds spent in the current kind before `then` applies.
    pub after_secs: f32,
    pub then: Fate,
}

// ── KindProfile ───────────────────────────────────────────────────────────────

/// Initial values a particle receives when it is (re)initialised as a kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KindProfile {
    pub size: f32,
    pub energy: f32,
    pub max_energy: f32,
    /// Top speed in world units per second.  Zero for immobile kinds.
    pub speed: f32,
    pub sight_range: f32,
    /// Seconds between two behavior-tree decisions.
    pub decision_interval: f32,
    /// Energy a cell gains by eating one of these.
    pub food_value: f32,
    /// Energy lost per simulated second.
    pub metabolism: f32,
    pub color: Color,
    pub lifetime: Option<Lifetime>,
}

/// The per-kind parameter table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KindProfiles {
    pub cell: KindProfile,
    pub food: KindProfile,
    pub dead_food: KindProfile,
    pub corpse: KindProfile,
}

impl KindProfiles {
    pub fn get(&self, kind: ParticleKind) -> &KindProfile {
        match kind {
            ParticleKind::Cell => &self.cell,
            ParticleKind::Food => &self.food,
            ParticleKind::DeadFood => &self.dead_food,
            ParticleKind::Corpse => &self.corpse,
        }
    }

    pub fn get_mut(&mut self, kind: ParticleKind) -> &mut KindProfile {
        match kind {
            ParticleKind::Cell => &mut self.cell,
            ParticleKind::Food => &mut self.food,
            ParticleKind::DeadFood => &mut self.dead_food,
            ParticleKind::Corpse => &mut self.corpse,
        }
    }
}

impl Default for KindProfiles {
    fn default() -> Self {
        let passive = KindProfile {
            size: 4.0,
            energy: 0.0,
            max_energy: 0.0,
            speed: 0.0,
            sight_range: 0.0,
            decision_interval: 1.0,
            food_value: 0.0,
            metabolism: 0.0,
            color: Color::GREEN,
            lifetime: None,
        };
        Self {
            cell: KindProfile {
                size: 10.0,
                energy: 60.0,
                max_energy: 100.0,
                speed: 40.0,
                sight_range: 120.0,
                decision_interval: 0.2,
                food_value: 0.0,
                metabolism: 2.0,
                color: Color::BLUE,
                lifetime: None,
            },
            food: KindProfile { food_value: 20.0, ..passive.clone() },
            dead_food: KindProfile {
                size: 2.0,
                color: Color::BROWN,
                lifetime: Some(Lifetime {
                    after_secs: 20.0,
                    then: Fate::Become(ParticleKind::Food),
                }),
                ..passive.clone()
            },
            corpse: KindProfile {
                size: 6.0,
                food_value: 40.0,
                color: Color::RED,
                lifetime: Some(Lifetime { after_secs: 30.0, then: Fate::Remove }),
                ..passive
            },
        }
    }
}
