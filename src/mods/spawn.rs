//! Spawn-object mods (Paddle-Potion, Tea-Party, Drink-Me)
//!
//! One algorithm, three independent instances: each keeps a fixed number of
//! circular objects scattered over the arena, placed away from the ball when
//! they (re)spawn. Radius changes apply in place; only count changes add or
//! remove objects.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Arena, ArenaSource, Canvas, Circle, ConfigSource, Mod, ModKind, draw_scoped};
use crate::consts::{SPAWN_MAX_ATTEMPTS, SPAWN_PADDING};
use crate::random_range;
use crate::settings::SpawnConfig;

/// Live objects, in spawn order
#[derive(Debug, Clone, Default)]
pub struct SpawnObjectState {
    pub objects: Vec<Circle>,
}

/// Outcome of a placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub object: Circle,
    /// Candidates drawn, including the accepted one
    pub attempts: u32,
    /// False when every attempt violated the avoid zone and the last was kept anyway
    pub clear_of_avoid: bool,
}

/// Sample one coordinate in `[margin, extent - margin]`, or the middle if that range is empty
fn sample_axis<R: Rng + ?Sized>(rng: &mut R, extent: f32, margin: f32) -> f32 {
    let lo = margin;
    let hi = extent - margin;
    if hi < lo {
        extent / 2.0
    } else {
        random_range(rng, lo, hi)
    }
}

/// Search for a spot for an object of `radius`, staying clear of `avoid` if given
///
/// Draws at most `SPAWN_MAX_ATTEMPTS` candidates; if none keeps the required
/// clearance the final candidate is used regardless.
pub fn place_object<R: Rng + ?Sized>(
    rng: &mut R,
    radius: f32,
    arena: Arena,
    avoid: Option<Circle>,
) -> Placement {
    let margin = (radius + SPAWN_PADDING).max(radius);
    let mut candidate = arena.center();

    for attempt in 1..=SPAWN_MAX_ATTEMPTS {
        candidate = Vec2::new(
            sample_axis(rng, arena.width, margin),
            sample_axis(rng, arena.height, margin),
        );
        let clear = match avoid {
            None => true,
            Some(zone) => {
                let min_distance = radius + zone.radius + SPAWN_PADDING;
                candidate.distance_squared(zone.center) >= min_distance * min_distance
            }
        };
        if clear {
            return Placement {
                object: Circle::new(candidate, radius),
                attempts: attempt,
                clear_of_avoid: true,
            };
        }
    }

    Placement {
        object: Circle::new(candidate, radius),
        attempts: SPAWN_MAX_ATTEMPTS,
        clear_of_avoid: false,
    }
}

pub fn create_object<R: Rng + ?Sized>(
    rng: &mut R,
    radius: f32,
    arena: Arena,
    avoid: Option<Circle>,
) -> Circle {
    place_object(rng, radius, arena, avoid).object
}

/// Bring the object set in line with `config`
///
/// Disabled clears everything. Otherwise extra objects are dropped from the
/// tail, survivors take the current radius without moving, and missing ones
/// are spawned.
pub fn maintain<R: Rng + ?Sized>(
    state: &mut SpawnObjectState,
    config: &SpawnConfig,
    arena: Arena,
    rng: &mut R,
) {
    if !config.enabled {
        state.objects.clear();
        return;
    }

    let radius = config.resolved_radius();
    let count = config.resolved_count();

    state.objects.truncate(count);
    for object in &mut state.objects {
        object.radius = radius;
    }
    while state.objects.len() < count {
        let object = create_object(rng, radius, arena, None);
        state.objects.push(object);
    }
}

/// Move the object at `index` to a fresh spot away from `avoid`
///
/// Out-of-range indices are ignored. Returns whether an object was moved.
pub fn respawn_object<R: Rng + ?Sized>(
    state: &mut SpawnObjectState,
    index: usize,
    config: &SpawnConfig,
    arena: Arena,
    avoid: Option<Circle>,
    rng: &mut R,
) -> bool {
    let Some(slot) = state.objects.get_mut(index) else {
        return false;
    };
    *slot = create_object(rng, config.resolved_radius(), arena, avoid);
    true
}

/// Live objects, or none while the mod is disabled
pub fn get_objects<'a>(state: &'a SpawnObjectState, config: &SpawnConfig) -> &'a [Circle] {
    if config.enabled { &state.objects } else { &[] }
}

/// A spawn-object mod instance; Paddle-Potion, Tea-Party and Drink-Me each own one
pub struct SpawnMod {
    kind: ModKind,
    config: ConfigSource<SpawnConfig>,
    arena: ArenaSource,
    rng: Pcg32,
    state: SpawnObjectState,
}

impl SpawnMod {
    pub fn new(
        kind: ModKind,
        config: impl Fn() -> SpawnConfig + 'static,
        arena: impl Fn() -> Arena + 'static,
        seed: u64,
    ) -> Self {
        Self {
            kind,
            config: Box::new(config),
            arena: Box::new(arena),
            rng: Pcg32::seed_from_u64(seed),
            state: SpawnObjectState::default(),
        }
    }

    pub fn paddle_potion(
        config: impl Fn() -> SpawnConfig + 'static,
        arena: impl Fn() -> Arena + 'static,
        seed: u64,
    ) -> Self {
        Self::new(ModKind::PaddlePotion, config, arena, seed)
    }

    pub fn tea_party(
        config: impl Fn() -> SpawnConfig + 'static,
        arena: impl Fn() -> Arena + 'static,
        seed: u64,
    ) -> Self {
        Self::new(ModKind::TeaParty, config, arena, seed)
    }

    pub fn drink_me(
        config: impl Fn() -> SpawnConfig + 'static,
        arena: impl Fn() -> Arena + 'static,
        seed: u64,
    ) -> Self {
        Self::new(ModKind::DrinkMe, config, arena, seed)
    }

    pub fn kind(&self) -> ModKind {
        self.kind
    }

    /// Live objects (empty while disabled); copy them if they must outlive this frame
    pub fn objects(&self) -> &[Circle] {
        get_objects(&self.state, &(self.config)())
    }

    /// Relocate object `index` away from `avoid` (e.g. the ball that just hit it)
    pub fn respawn_object(&mut self, index: usize, avoid: Option<Circle>) -> bool {
        let config = (self.config)();
        let arena = (self.arena)();
        let moved = respawn_object(&mut self.state, index, &config, arena, avoid, &mut self.rng);
        if moved {
            log::debug!("{}: respawned object {}", self.kind.key(), index);
        }
        moved
    }

    /// Index of the first live object overlapping `probe`
    pub fn hit_test(&self, probe: Circle) -> Option<usize> {
        self.objects().iter().position(|object| object.overlaps(&probe))
    }

    fn clear(&mut self) {
        self.state.objects.clear();
    }
}

impl Mod for SpawnMod {
    fn key(&self) -> &str {
        self.kind.key()
    }

    fn is_enabled(&self) -> bool {
        (self.config)().enabled
    }

    fn on_enabled(&mut self) {
        log::info!("{} enabled", self.kind.key());
    }

    fn on_disabled(&mut self) {
        self.clear();
        log::info!("{} disabled", self.kind.key());
    }

    fn on_reset(&mut self) {
        self.clear();
    }

    fn on_tick(&mut self, _dt: f32) {
        let config = (self.config)();
        let arena = (self.arena)();
        maintain(&mut self.state, &config, arena, &mut self.rng);
    }

    fn on_draw(&self, canvas: &mut dyn Canvas) {
        let config = (self.config)();
        let objects = get_objects(&self.state, &config);
        if objects.is_empty() {
            return;
        }

        draw_scoped(canvas, |c| {
            c.set_fill_color(config.color.scale_alpha(0.35));
            c.set_stroke_color(config.color);
            c.set_line_width(2.0);
            for object in objects {
                c.fill_circle(object.center, object.radius);
                c.stroke_circle(object.center, object.radius);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{SPAWN_DEFAULT_COUNT, SPAWN_MAX_COUNT};
    use crate::renderer::{CommandRecorder, DrawCommand};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const ARENA: Arena = Arena::new(400.0, 300.0);

    fn enabled(count: f32, radius: f32) -> SpawnConfig {
        SpawnConfig {
            enabled: true,
            object_radius: Some(radius),
            spawn_count: Some(count),
            ..Default::default()
        }
    }

    fn in_bounds(object: &Circle, arena: Arena) -> bool {
        (0.0..=arena.width).contains(&object.center.x)
            && (0.0..=arena.height).contains(&object.center.y)
    }

    #[test]
    fn test_maintain_reaches_target_count() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = SpawnObjectState::default();
        maintain(&mut state, &enabled(5.0, 20.0), ARENA, &mut rng);
        assert_eq!(state.objects.len(), 5);
        maintain(&mut state, &enabled(2.0, 20.0), ARENA, &mut rng);
        assert_eq!(state.objects.len(), 2);
    }

    #[test]
    fn test_maintain_is_idempotent() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut state = SpawnObjectState::default();
        let config = enabled(6.0, 20.0);
        maintain(&mut state, &config, ARENA, &mut rng);
        let before = state.objects.clone();
        for _ in 0..10 {
            maintain(&mut state, &config, ARENA, &mut rng);
        }
        assert_eq!(state.objects, before);
    }

    #[test]
    fn test_truncate_keeps_oldest() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = SpawnObjectState::default();
        maintain(&mut state, &enabled(4.0, 20.0), ARENA, &mut rng);
        let first_two = state.objects[..2].to_vec();
        maintain(&mut state, &enabled(2.0, 20.0), ARENA, &mut rng);
        assert_eq!(state.objects, first_two);
    }

    #[test]
    fn test_radius_change_keeps_positions() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut state = SpawnObjectState::default();
        maintain(&mut state, &enabled(3.0, 20.0), ARENA, &mut rng);
        let centers: Vec<Vec2> = state.objects.iter().map(|o| o.center).collect();
        maintain(&mut state, &enabled(3.0, 40.0), ARENA, &mut rng);
        for (object, center) in state.objects.iter().zip(centers) {
            assert_eq!(object.center, center);
            assert_eq!(object.radius, 40.0);
        }
    }

    #[test]
    fn test_defaults_and_disable() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = SpawnObjectState::default();
        let mut config = SpawnConfig {
            enabled: true,
            ..Default::default()
        };
        maintain(&mut state, &config, ARENA, &mut rng);
        assert_eq!(state.objects.len(), SPAWN_DEFAULT_COUNT);
        assert!(state.objects.iter().all(|o| o.radius == 20.0));

        config.enabled = false;
        assert!(get_objects(&state, &config).is_empty());
        maintain(&mut state, &config, ARENA, &mut rng);
        assert!(state.objects.is_empty());
    }

    #[test]
    fn test_avoid_clearance() {
        let mut rng = Pcg32::seed_from_u64(6);
        let avoid = Circle::new(Vec2::new(200.0, 150.0), 20.0);
        for _ in 0..200 {
            let placement = place_object(&mut rng, 20.0, ARENA, Some(avoid));
            let distance = placement.object.center.distance(avoid.center);
            assert!(distance >= 52.0 - 1e-3 || placement.attempts == SPAWN_MAX_ATTEMPTS);
            assert!(in_bounds(&placement.object, ARENA));
        }
    }

    #[test]
    fn test_avoid_covering_arena_still_places() {
        let mut rng = Pcg32::seed_from_u64(7);
        let avoid = Circle::new(Vec2::new(200.0, 150.0), 10_000.0);
        let placement = place_object(&mut rng, 20.0, ARENA, Some(avoid));
        assert!(!placement.clear_of_avoid);
        assert_eq!(placement.attempts, SPAWN_MAX_ATTEMPTS);
        assert!(in_bounds(&placement.object, ARENA));
        let margin = 32.0;
        assert!(placement.object.center.x >= margin && placement.object.center.x <= 400.0 - margin);
    }

    #[test]
    fn test_tiny_arena_falls_back_to_center() {
        let mut rng = Pcg32::seed_from_u64(8);
        let arena = Arena::new(50.0, 500.0);
        let object = create_object(&mut rng, 40.0, arena, None);
        assert_eq!(object.center.x, 25.0);
        assert!(object.center.y >= 52.0 && object.center.y <= 448.0);
    }

    #[test]
    fn test_respawn_out_of_range_is_noop() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut state = SpawnObjectState::default();
        let config = enabled(2.0, 20.0);
        maintain(&mut state, &config, ARENA, &mut rng);
        let before = state.objects.clone();
        assert!(!respawn_object(&mut state, 5, &config, ARENA, None, &mut rng));
        assert_eq!(state.objects, before);
        assert!(respawn_object(&mut state, 1, &config, ARENA, None, &mut rng));
        assert_eq!(state.objects[0], before[0]);
        assert_eq!(state.objects.len(), 2);
    }

    #[test]
    fn test_aliases_have_independent_state() {
        let settings = Rc::new(RefCell::new((enabled(4.0, 20.0), enabled(1.0, 30.0))));
        let a = Rc::clone(&settings);
        let b = Rc::clone(&settings);
        let mut tea = SpawnMod::tea_party(move || a.borrow().0.clone(), || ARENA, 10);
        let mut drink = SpawnMod::drink_me(move || b.borrow().1.clone(), || ARENA, 10);
        tea.on_tick(0.016);
        drink.on_tick(0.016);
        assert_eq!(tea.objects().len(), 4);
        assert_eq!(drink.objects().len(), 1);
        assert_eq!(drink.objects()[0].radius, 30.0);
        assert_eq!(tea.key(), "tea-party");
        assert_eq!(drink.key(), "drink-me");

        tea.on_reset();
        assert!(tea.objects().is_empty());
        assert_eq!(drink.objects().len(), 1);
    }

    #[test]
    fn test_hit_test_and_respawn_away_from_ball() {
        let mut potion = SpawnMod::paddle_potion(|| enabled(1.0, 20.0), || ARENA, 11);
        potion.on_tick(0.016);
        let target = potion.objects()[0];
        let ball = Circle::new(target.center, 8.0);
        assert_eq!(potion.hit_test(ball), Some(0));

        assert!(potion.respawn_object(0, Some(ball)));
        let moved = potion.objects()[0];
        assert_ne!(moved.center, target.center);
        assert!(!potion.respawn_object(3, Some(ball)));
    }

    #[test]
    fn test_draw_brackets_state() {
        let mut potion = SpawnMod::paddle_potion(|| enabled(2.0, 20.0), || ARENA, 12);
        potion.on_tick(0.016);
        let mut canvas = CommandRecorder::new();
        potion.on_draw(&mut canvas);
        let fills = canvas
            .commands()
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::FillCircle { .. }))
            .count();
        assert_eq!(fills, 2);
        assert_eq!(canvas.depth(), 0);
    }

    proptest! {
        #[test]
        fn prop_count_matches_config(k in 0usize..=SPAWN_MAX_COUNT, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut state = SpawnObjectState::default();
            maintain(&mut state, &enabled(k as f32, 20.0), ARENA, &mut rng);
            prop_assert_eq!(state.objects.len(), k);
        }

        #[test]
        fn prop_placement_in_bounds(
            radius in 6.0f32..160.0,
            width in 1.0f32..1200.0,
            height in 1.0f32..900.0,
            ax in -100.0f32..1300.0,
            ay in -100.0f32..1000.0,
            ar in 0.0f32..400.0,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let arena = Arena::new(width, height);
            let avoid = Circle::new(Vec2::new(ax, ay), ar);
            let placement = place_object(&mut rng, radius, arena, Some(avoid));
            prop_assert!(in_bounds(&placement.object, arena));
            prop_assert!(placement.attempts >= 1 && placement.attempts <= SPAWN_MAX_ATTEMPTS);
        }
    }
}
