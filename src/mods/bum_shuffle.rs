//! Bum-Shuffle: the ball drags one long continuous smear across the arena

use super::trail::{BallTrail, TrailPoint, TrailState, clamp_trail_length};
use super::{BallSnapshot, Canvas, ConfigSource, LineCap, Mod, ModKind, draw_scoped};
use crate::consts::{BUM_SHUFFLE_MAX_TRAIL, BUM_SHUFFLE_MIN_DISTANCE_SQ, BUM_SHUFFLE_WIDTH_SCALE};
use crate::settings::BumShuffleConfig;

pub struct BumShuffleMod {
    config: ConfigSource<BumShuffleConfig>,
    trail: BallTrail<TrailPoint>,
}

impl BumShuffleMod {
    pub fn new(
        config: impl Fn() -> BumShuffleConfig + 'static,
        ball: impl Fn() -> Option<BallSnapshot> + 'static,
    ) -> Self {
        Self {
            config: Box::new(config),
            trail: BallTrail::new(ball),
        }
    }

    pub fn max_length(config: &BumShuffleConfig) -> usize {
        clamp_trail_length(config.trail_length, 1, BUM_SHUFFLE_MAX_TRAIL)
    }

    pub fn trail(&self) -> &TrailState<TrailPoint> {
        self.trail.history()
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Stroke width follows the newest point's radius
    pub fn stroke_width(&self) -> f32 {
        self.trail()
            .newest()
            .map(|p| (p.radius * BUM_SHUFFLE_WIDTH_SCALE).max(1.0))
            .unwrap_or(1.0)
    }
}

impl Mod for BumShuffleMod {
    fn key(&self) -> &str {
        ModKind::BumShuffle.key()
    }

    fn is_enabled(&self) -> bool {
        (self.config)().enabled
    }

    fn on_enabled(&mut self) {
        log::info!("Bum-Shuffle enabled");
    }

    fn on_disabled(&mut self) {
        self.clear_trail();
        log::info!("Bum-Shuffle disabled");
    }

    fn on_reset(&mut self) {
        self.clear_trail();
    }

    fn on_tick(&mut self, _dt: f32) {
        let config = (self.config)();
        self.trail.tick(
            config.enabled,
            Self::max_length(&config),
            BUM_SHUFFLE_MIN_DISTANCE_SQ,
            TrailPoint::from,
        );
    }

    fn on_draw(&self, canvas: &mut dyn Canvas) {
        let config = (self.config)();
        if !config.enabled || self.trail().is_empty() {
            return;
        }

        let points = self.trail().positions();
        let width = self.stroke_width();
        draw_scoped(canvas, |c| {
            c.set_stroke_color(config.color);
            c.set_line_width(width);
            c.set_line_cap(LineCap::Round);
            c.stroke_polyline(&points);
        });
    }
}
