//! Kite: a fading chain of dots streaming behind the ball

use super::trail::{BallTrail, TrailPoint, TrailState, clamp_trail_length};
use super::{BallSnapshot, Canvas, ConfigSource, Mod, ModKind, draw_scoped};
use crate::consts::{KITE_MAX_ALPHA, KITE_MAX_TRAIL, KITE_MIN_DISTANCE_SQ};
use crate::settings::KiteConfig;

pub struct KiteMod {
    config: ConfigSource<KiteConfig>,
    trail: BallTrail<TrailPoint>,
}

impl KiteMod {
    pub fn new(
        config: impl Fn() -> KiteConfig + 'static,
        ball: impl Fn() -> Option<BallSnapshot> + 'static,
    ) -> Self {
        Self {
            config: Box::new(config),
            trail: BallTrail::new(ball),
        }
    }

    /// Effective trail length for a config (never above the hard ceiling)
    pub fn max_length(config: &KiteConfig) -> usize {
        clamp_trail_length(config.tail_length, 1, KITE_MAX_TRAIL)
    }

    pub fn trail(&self) -> &TrailState<TrailPoint> {
        self.trail.history()
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

/// Alpha for dot `index` of `len`: ramps toward `KITE_MAX_ALPHA` at the newest dot
pub fn dot_alpha(index: usize, len: usize) -> f32 {
    if len == 0 {
        return 0.0;
    }
    ((index + 1) as f32 / len as f32 * KITE_MAX_ALPHA).min(1.0)
}

impl Mod for KiteMod {
    fn key(&self) -> &str {
        ModKind::Kite.key()
    }

    fn is_enabled(&self) -> bool {
        (self.config)().enabled
    }

    fn on_enabled(&mut self) {
        log::info!("Kite enabled");
    }

    fn on_disabled(&mut self) {
        self.clear_trail();
        log::info!("Kite disabled");
    }

    fn on_reset(&mut self) {
        self.clear_trail();
    }

    fn on_tick(&mut self, _dt: f32) {
        let config = (self.config)();
        self.trail.tick(
            config.enabled,
            Self::max_length(&config),
            KITE_MIN_DISTANCE_SQ,
            TrailPoint::from,
        );
    }

    fn on_draw(&self, canvas: &mut dyn Canvas) {
        let config = (self.config)();
        let trail = self.trail();
        if !config.enabled || trail.is_empty() {
            return;
        }

        let len = trail.len();
        draw_scoped(canvas, |c| {
            c.set_fill_color(config.color);
            for (i, point) in trail.iter().enumerate() {
                c.set_global_alpha(dot_alpha(i, len));
                c.fill_circle(point.pos, point.radius);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandRecorder, DrawCommand};
    use glam::Vec2;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct Harness {
        config: Rc<RefCell<KiteConfig>>,
        ball: Rc<Cell<Option<BallSnapshot>>>,
        kite: KiteMod,
    }

    fn harness(tail_length: f32) -> Harness {
        let config = Rc::new(RefCell::new(KiteConfig {
            enabled: true,
            tail_length,
            ..Default::default()
        }));
        let ball = Rc::new(Cell::new(Some(BallSnapshot {
            pos: Vec2::ZERO,
            radius: 8.0,
        })));
        let kite = {
            let config = Rc::clone(&config);
            let ball = Rc::clone(&ball);
            KiteMod::new(move || config.borrow().clone(), move || ball.get())
        };
        Harness { config, ball, kite }
    }

    #[test]
    fn test_tail_length_clamped_to_ceiling() {
        let mut h = harness(500.0);
        assert_eq!(KiteMod::max_length(&h.config.borrow()), KITE_MAX_TRAIL);
        for i in 0..600 {
            h.ball.set(Some(BallSnapshot {
                pos: Vec2::new(i as f32, 0.0),
                radius: 8.0,
            }));
            h.kite.on_tick(1.0 / 60.0);
        }
        assert_eq!(h.kite.trail().len(), KITE_MAX_TRAIL);
    }

    #[test]
    fn test_records_every_tick_without_thinning() {
        let mut h = harness(50.0);
        // Stationary ball still records: Kite has no spacing threshold
        for _ in 0..80 {
            h.kite.on_tick(1.0 / 60.0);
        }
        assert_eq!(h.kite.trail().len(), 50);
    }

    #[test]
    fn test_disable_clears_on_next_tick() {
        let mut h = harness(50.0);
        for _ in 0..10 {
            h.kite.on_tick(1.0 / 60.0);
        }
        h.config.borrow_mut().enabled = false;
        assert!(!h.kite.is_enabled());
        h.kite.on_tick(1.0 / 60.0);
        assert!(h.kite.trail().is_empty());
    }

    #[test]
    fn test_shrinking_config_trims_head() {
        let mut h = harness(50.0);
        for _ in 0..50 {
            h.kite.on_tick(1.0 / 60.0);
        }
        h.config.borrow_mut().tail_length = 10.0;
        h.ball.set(None);
        h.kite.on_tick(1.0 / 60.0);
        assert_eq!(h.kite.trail().len(), 10);
    }

    #[test]
    fn test_draw_alpha_ramp() {
        let mut h = harness(4.0);
        for _ in 0..4 {
            h.kite.on_tick(1.0 / 60.0);
        }
        let mut canvas = CommandRecorder::new();
        h.kite.on_draw(&mut canvas);

        let alphas: Vec<f32> = canvas
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillCircle { alpha, .. } => Some(*alpha),
                _ => None,
            })
            .collect();
        let expected = [0.2, 0.4, 0.6, 0.8];
        assert_eq!(alphas.len(), expected.len());
        for (got, want) in alphas.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "{} != {}", got, want);
        }
        assert_eq!(canvas.depth(), 0);
    }

    #[test]
    fn test_dot_alpha_capped() {
        assert_eq!(dot_alpha(0, 0), 0.0);
        assert_eq!(dot_alpha(9, 10), 0.8);
        assert!(dot_alpha(0, 10) > 0.0);
    }

    #[test]
    fn test_draw_noop_when_disabled() {
        let mut h = harness(4.0);
        h.kite.on_tick(1.0 / 60.0);
        h.config.borrow_mut().enabled = false;
        let mut canvas = CommandRecorder::new();
        h.kite.on_draw(&mut canvas);
        assert!(canvas.commands().is_empty());
    }
}
