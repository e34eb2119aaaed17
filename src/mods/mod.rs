//! Mod layer
//!
//! A mod is a small toggleable unit driven by per-frame hooks from the host:
//! - `on_tick` advances its private state (always before `on_draw` in a frame)
//! - `on_draw` issues calls against a `Canvas` and never mutates state
//!
//! Config, arena size and ball position are read through closures injected at
//! construction, so every mod can be driven by fakes in tests.

pub mod bum_shuffle;
pub mod kite;
pub mod pollok;
pub mod spawn;
pub mod trail;
pub mod wonderland;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::settings::ModifierSettings;

pub use bum_shuffle::BumShuffleMod;
pub use kite::KiteMod;
pub use pollok::PollokMod;
pub use spawn::{SpawnMod, SpawnObjectState};
pub use trail::{ColoredTrailPoint, TrailPoint, TrailState, add_trail_point, clamp_trail_length};
pub use wonderland::{Snowflake, WonderlandMod};

/// Config getter injected into a mod
pub type ConfigSource<C> = Box<dyn Fn() -> C>;
/// Arena dimensions getter
pub type ArenaSource = Box<dyn Fn() -> Arena>;
/// Ball getter; `None` while no ball is in play
pub type BallSource = Box<dyn Fn() -> Option<BallSnapshot>>;

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Ball position and size as seen by mods for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSnapshot {
    pub pos: Vec2,
    pub radius: f32,
}

/// A circle in arena space (spawned objects, avoid zones)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// True when the two circles touch or overlap
    pub fn overlaps(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }
}

impl From<BallSnapshot> for Circle {
    fn from(ball: BallSnapshot) -> Self {
        Circle::new(ball.pos, ball.radius)
    }
}

/// Paddle side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Stable identifiers for every mod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModKind {
    Kite,
    BumShuffle,
    Pollok,
    PaddlePotion,
    TeaParty,
    DrinkMe,
    Wonderland,
}

impl ModKind {
    pub const ALL: [ModKind; 7] = [
        ModKind::Kite,
        ModKind::BumShuffle,
        ModKind::Pollok,
        ModKind::PaddlePotion,
        ModKind::TeaParty,
        ModKind::DrinkMe,
        ModKind::Wonderland,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ModKind::Kite => "kite",
            ModKind::BumShuffle => "bum-shuffle",
            ModKind::Pollok => "pollok",
            ModKind::PaddlePotion => "paddle-potion",
            ModKind::TeaParty => "tea-party",
            ModKind::DrinkMe => "drink-me",
            ModKind::Wonderland => "wonderland",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// Lifecycle surface every mod exposes to the host's mod manager
pub trait Mod {
    /// Stable identifier, unique within the host registry
    fn key(&self) -> &str;

    /// Read live from the config source on every call
    fn is_enabled(&self) -> bool;

    fn on_enabled(&mut self) {}

    /// Clears all owned state
    fn on_disabled(&mut self);

    /// Clears all owned state; the mod may stay enabled afterwards
    fn on_reset(&mut self);

    /// Advance by `dt` seconds
    fn on_tick(&mut self, dt: f32);

    fn on_draw(&self, _canvas: &mut dyn Canvas) {}

    /// Ball was re-served
    fn on_ball_reset(&mut self) {}
}

/// Stroke end style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// 2D drawing context supplied by the host
///
/// State setters (colors, alpha, width, cap) persist until `restore` pops
/// the matching `save`.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);
    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_line_width(&mut self, width: f32);
    fn set_line_cap(&mut self, cap: LineCap);
    fn fill_circle(&mut self, center: Vec2, radius: f32);
    fn stroke_circle(&mut self, center: Vec2, radius: f32);
    /// Stroke an open path through `points`
    fn stroke_polyline(&mut self, points: &[Vec2]);
}

/// Run `draw` between `save` and `restore` so no state leaks to the next mod
pub fn draw_scoped<C: Canvas + ?Sized>(canvas: &mut C, draw: impl FnOnce(&mut C)) {
    canvas.save();
    draw(canvas);
    canvas.restore();
}

/// Every mod, wired to shared host-owned sources
pub struct ModSet {
    pub kite: KiteMod,
    pub bum_shuffle: BumShuffleMod,
    pub pollok: PollokMod,
    pub paddle_potion: SpawnMod,
    pub tea_party: SpawnMod,
    pub drink_me: SpawnMod,
    pub wonderland: WonderlandMod,
}

impl ModSet {
    /// Build all mods reading from the given shared settings, arena and ball cells
    pub fn new(
        settings: Rc<RefCell<ModifierSettings>>,
        arena: Rc<Cell<Arena>>,
        ball: Rc<Cell<Option<BallSnapshot>>>,
        seed: u64,
    ) -> Self {
        let ball_source = || {
            let ball = Rc::clone(&ball);
            move || ball.get()
        };
        let arena_source = || {
            let arena = Rc::clone(&arena);
            move || arena.get()
        };
        macro_rules! config {
            ($field:ident) => {{
                let settings = Rc::clone(&settings);
                move || settings.borrow().$field.clone()
            }};
        }

        Self {
            kite: KiteMod::new(config!(kite), ball_source()),
            bum_shuffle: BumShuffleMod::new(config!(bum_shuffle), ball_source()),
            pollok: PollokMod::new(config!(pollok), ball_source()),
            paddle_potion: SpawnMod::new(
                ModKind::PaddlePotion,
                config!(paddle_potion),
                arena_source(),
                seed,
            ),
            tea_party: SpawnMod::new(
                ModKind::TeaParty,
                config!(tea_party),
                arena_source(),
                seed.wrapping_add(1),
            ),
            drink_me: SpawnMod::new(
                ModKind::DrinkMe,
                config!(drink_me),
                arena_source(),
                seed.wrapping_add(2),
            ),
            wonderland: WonderlandMod::new(config!(wonderland), arena_source(), seed.wrapping_add(3)),
        }
    }

    /// All mods in draw order (background snow first, trails last)
    pub fn all_mut(&mut self) -> [&mut dyn Mod; 7] {
        [
            &mut self.wonderland,
            &mut self.paddle_potion,
            &mut self.tea_party,
            &mut self.drink_me,
            &mut self.bum_shuffle,
            &mut self.pollok,
            &mut self.kite,
        ]
    }

    pub fn all(&self) -> [&dyn Mod; 7] {
        [
            &self.wonderland,
            &self.paddle_potion,
            &self.tea_party,
            &self.drink_me,
            &self.bum_shuffle,
            &self.pollok,
            &self.kite,
        ]
    }
}
