//! Wonderland: ambient snowfall over the arena
//!
//! The pool is filled across the whole arena at once (no empty-screen pop-in)
//! and after that each flake recycles on its own: once it drops past the
//! bottom edge it reappears a little above the top with fresh random traits.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Arena, ArenaSource, Canvas, ConfigSource, Mod, ModKind, draw_scoped};
use crate::consts::{
    SNOW_DRIFT_FACTOR, SNOW_MAX_COUNT, SNOW_RADIUS_EASE, SNOW_RESPAWN_SPREAD, SNOW_WRAP_MARGIN,
};
use crate::random_range;
use crate::settings::WonderlandConfig;

/// A single snowflake
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snowflake {
    pub pos: Vec2,
    pub radius: f32,
    /// Scales the base size (0.6..1.4)
    pub size_multiplier: f32,
    /// Scales the base fall speed (0.6..1.4)
    pub speed_multiplier: f32,
    /// Sideways drift direction and strength (-1..1)
    pub drift_multiplier: f32,
}

impl Snowflake {
    fn random_traits<R: Rng + ?Sized>(rng: &mut R, base_size: f32, pos: Vec2) -> Self {
        let size_multiplier = random_range(rng, 0.6, 1.4);
        Self {
            pos,
            radius: base_size * size_multiplier,
            size_multiplier,
            speed_multiplier: random_range(rng, 0.6, 1.4),
            drift_multiplier: random_range(rng, -1.0, 1.0),
        }
    }

    /// Anywhere in the arena; used for the initial fill
    fn spawn_anywhere<R: Rng + ?Sized>(rng: &mut R, base_size: f32, arena: Arena) -> Self {
        let pos = Vec2::new(
            random_range(rng, 0.0, arena.width),
            random_range(rng, 0.0, arena.height),
        );
        Self::random_traits(rng, base_size, pos)
    }

    /// Re-enter above the top edge with new traits
    fn respawn_above<R: Rng + ?Sized>(&mut self, rng: &mut R, base_size: f32, arena: Arena) {
        let x = random_range(rng, 0.0, arena.width);
        *self = Self::random_traits(rng, base_size, Vec2::new(x, 0.0));
        let lift: f32 = rng.random::<f32>() * arena.height * SNOW_RESPAWN_SPREAD;
        self.pos.y = -self.radius - lift;
    }
}

/// Snow pool plus the one-shot repopulation flag
#[derive(Debug, Clone)]
pub struct ParticleState {
    pub particles: Vec<Snowflake>,
    pub needs_respawn: bool,
}

impl Default for ParticleState {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            needs_respawn: true,
        }
    }
}

impl ParticleState {
    /// Drop every flake and refill on the next enabled update
    pub fn reset(&mut self) {
        self.particles = Vec::new();
        self.needs_respawn = true;
    }
}

fn repopulate<R: Rng + ?Sized>(
    state: &mut ParticleState,
    count: usize,
    base_size: f32,
    arena: Arena,
    rng: &mut R,
) {
    state.particles = (0..count)
        .map(|_| Snowflake::spawn_anywhere(rng, base_size, arena))
        .collect();
    state.needs_respawn = false;
    log::info!("Wonderland: spawned {} snowflakes", count);
}

/// Advance the snowfall by `dt` seconds
pub fn update<R: Rng + ?Sized>(
    state: &mut ParticleState,
    config: &WonderlandConfig,
    arena: Arena,
    dt: f32,
    rng: &mut R,
) {
    if !config.enabled {
        if !state.particles.is_empty() {
            state.particles.clear();
        }
        state.needs_respawn = true;
        return;
    }

    let count = config.resolved_count();
    let base_size = config.resolved_size();
    let base_speed = config.resolved_speed();

    if state.needs_respawn || state.particles.len() != count {
        if config.count_exceeds_ceiling() {
            log::warn!(
                "Wonderland: snowflakeCount {:?} capped at {}",
                config.snowflake_count,
                SNOW_MAX_COUNT
            );
        }
        repopulate(state, count, base_size, arena, rng);
    }
    if state.particles.is_empty() {
        return;
    }

    // Lower bound keeps a negative dt from pushing radii away from the target
    let ease = (dt * SNOW_RADIUS_EASE).clamp(0.0, 1.0);
    let wrap_span = arena.width + SNOW_WRAP_MARGIN * 2.0;

    for flake in &mut state.particles {
        let target = base_size * flake.size_multiplier;
        flake.radius += (target - flake.radius) * ease;

        flake.pos.y += base_speed * flake.speed_multiplier * dt;
        flake.pos.x += base_speed * SNOW_DRIFT_FACTOR * flake.drift_multiplier * dt;

        if flake.pos.x < -SNOW_WRAP_MARGIN {
            flake.pos.x += wrap_span;
        } else if flake.pos.x > arena.width + SNOW_WRAP_MARGIN {
            flake.pos.x -= wrap_span;
        }

        if flake.pos.y - flake.radius > arena.height {
            flake.respawn_above(rng, base_size, arena);
        }
    }
}

pub struct WonderlandMod {
    config: ConfigSource<WonderlandConfig>,
    arena: ArenaSource,
    rng: Pcg32,
    state: ParticleState,
}

impl WonderlandMod {
    pub fn new(
        config: impl Fn() -> WonderlandConfig + 'static,
        arena: impl Fn() -> Arena + 'static,
        seed: u64,
    ) -> Self {
        Self {
            config: Box::new(config),
            arena: Box::new(arena),
            rng: Pcg32::seed_from_u64(seed),
            state: ParticleState::default(),
        }
    }

    pub fn particles(&self) -> &[Snowflake] {
        &self.state.particles
    }

    pub fn needs_respawn(&self) -> bool {
        self.state.needs_respawn
    }

    pub fn reset_state(&mut self) {
        self.state.reset();
    }
}

impl Mod for WonderlandMod {
    fn key(&self) -> &str {
        ModKind::Wonderland.key()
    }

    fn is_enabled(&self) -> bool {
        (self.config)().enabled
    }

    fn on_enabled(&mut self) {
        self.state.needs_respawn = true;
        log::info!("Wonderland enabled");
    }

    fn on_disabled(&mut self) {
        self.reset_state();
        log::info!("Wonderland disabled");
    }

    fn on_reset(&mut self) {
        self.reset_state();
    }

    fn on_tick(&mut self, dt: f32) {
        let config = (self.config)();
        let arena = (self.arena)();
        update(&mut self.state, &config, arena, dt, &mut self.rng);
    }

    fn on_draw(&self, canvas: &mut dyn Canvas) {
        let config = (self.config)();
        if !config.enabled || self.state.particles.is_empty() {
            return;
        }
        let opacity = config.resolved_opacity();
        if opacity <= 0.0 {
            return;
        }

        draw_scoped(canvas, |c| {
            c.set_fill_color(config.snow_color);
            c.set_global_alpha(opacity);
            for flake in &self.state.particles {
                c.fill_circle(flake.pos, flake.radius);
            }
        });
    }
}
