//! Pong Mods - toggleable behavior units for an arcade Pong arena
//!
//! Core modules:
//! - `mods`: Lifecycle contract plus the trail, spawn-object and snow simulations
//! - `renderer`: Canvas abstraction backends (vertex tessellation, command recording)
//! - `settings`: Per-mod modifier configuration
//! - `color`: RGBA color type used by configs and canvases

pub mod color;
pub mod mods;
pub mod renderer;
pub mod settings;

pub use color::Color;
pub use mods::{Arena, BallSnapshot, Canvas, Circle, Mod, ModKind, Side};
pub use settings::{ModifierSettings, QualityPreset};

/// Mod tuning constants
pub mod consts {
    /// Hard ceiling on Kite trail history
    pub const KITE_MAX_TRAIL: usize = 240;
    /// Hard ceiling on Bum-Shuffle trail history
    pub const BUM_SHUFFLE_MAX_TRAIL: usize = 4000;
    /// Hard ceiling on Pollok trail history
    pub const POLLOK_MAX_TRAIL: usize = 6000;

    /// Squared minimum spacing between recorded points (0 = record every tick)
    pub const KITE_MIN_DISTANCE_SQ: f32 = 0.0;
    pub const BUM_SHUFFLE_MIN_DISTANCE_SQ: f32 = 4.0;
    pub const POLLOK_MIN_DISTANCE_SQ: f32 = 9.0;

    /// Peak alpha of the newest Kite dot
    pub const KITE_MAX_ALPHA: f32 = 0.8;
    /// Stroke width relative to the latest trail radius
    pub const BUM_SHUFFLE_WIDTH_SCALE: f32 = 1.35;
    pub const POLLOK_WIDTH_SCALE: f32 = 1.45;

    /// Spawn object radius bounds and default
    pub const SPAWN_DEFAULT_RADIUS: f32 = 20.0;
    pub const SPAWN_MIN_RADIUS: f32 = 6.0;
    pub const SPAWN_MAX_RADIUS: f32 = 160.0;
    /// Spawn object count bounds and default
    pub const SPAWN_DEFAULT_COUNT: usize = 3;
    pub const SPAWN_MAX_COUNT: usize = 50;
    /// Extra clearance kept from arena edges and from the avoided point
    pub const SPAWN_PADDING: f32 = 12.0;
    /// Placement attempts before the last candidate is accepted as-is
    pub const SPAWN_MAX_ATTEMPTS: u32 = 12;

    /// Snowflake defaults
    pub const SNOW_DEFAULT_COUNT: usize = 180;
    /// Hard ceiling on the snowflake pool, whatever the config asks for
    pub const SNOW_MAX_COUNT: usize = 2000;
    pub const SNOW_DEFAULT_SIZE: f32 = 3.0;
    pub const SNOW_DEFAULT_SPEED: f32 = 60.0;
    pub const SNOW_DEFAULT_OPACITY: f32 = 0.85;
    /// Radius easing rate (per second) toward the target size
    pub const SNOW_RADIUS_EASE: f32 = 6.0;
    /// Horizontal drift as a fraction of fall speed
    pub const SNOW_DRIFT_FACTOR: f32 = 0.15;
    /// Distance past either side edge before a flake wraps around
    pub const SNOW_WRAP_MARGIN: f32 = 20.0;
    /// Respawned flakes start up to this fraction of the arena height above the top
    pub const SNOW_RESPAWN_SPREAD: f32 = 0.3;
}

/// Clamp `value` into `[min, max]`
///
/// Unlike `f32::clamp` this never panics when `min > max`; the upper bound wins.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Uniform sample from `[min, max]` (bounds may be given in either order)
#[inline]
pub fn random_range<R: rand::Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    // Degenerate or non-finite spans would make the sampler panic
    if !(lo < hi) || !(hi - lo).is_finite() {
        return lo;
    }
    rng.random_range(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        // Inverted bounds do not panic
        assert_eq!(clamp(0.5, 2.0, 1.0), 1.0);
    }

    #[test]
    fn test_random_range_stays_inside() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_range(&mut rng, -1.0, 1.0);
            assert!((-1.0..=1.0).contains(&v));
        }
        assert_eq!(random_range(&mut rng, 3.0, 3.0), 3.0);
        let v = random_range(&mut rng, 4.0, 2.0);
        assert!((2.0..=4.0).contains(&v));
    }
}
