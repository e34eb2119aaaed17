//! Pollok: a paint-drip trail colored by whichever paddle returned the ball
//!
//! Each recorded point keeps the color that was current when it was laid
//! down, so the trail shows color changes segment by segment as the rally
//! goes back and forth.

use super::trail::{BallTrail, ColoredTrailPoint, TrailState, clamp_trail_length};
use super::{BallSnapshot, Canvas, ConfigSource, LineCap, Mod, ModKind, Side, draw_scoped};
use crate::color::Color;
use crate::consts::{POLLOK_MAX_TRAIL, POLLOK_MIN_DISTANCE_SQ, POLLOK_WIDTH_SCALE};
use crate::settings::PollokConfig;

/// Trail color for the current returner
pub fn pollok_color(config: &PollokConfig, last_returner: Option<Side>) -> Color {
    match last_returner {
        Some(Side::Left) => config.left_color,
        Some(Side::Right) => config.right_color,
        None => config.neutral_color,
    }
}

pub struct PollokMod {
    config: ConfigSource<PollokConfig>,
    trail: BallTrail<ColoredTrailPoint>,
    last_returner: Option<Side>,
}

impl PollokMod {
    pub fn new(
        config: impl Fn() -> PollokConfig + 'static,
        ball: impl Fn() -> Option<BallSnapshot> + 'static,
    ) -> Self {
        Self {
            config: Box::new(config),
            trail: BallTrail::new(ball),
            last_returner: None,
        }
    }

    pub fn max_length(config: &PollokConfig) -> usize {
        clamp_trail_length(config.trail_length, 1, POLLOK_MAX_TRAIL)
    }

    pub fn trail(&self) -> &TrailState<ColoredTrailPoint> {
        self.trail.history()
    }

    pub fn last_returner(&self) -> Option<Side> {
        self.last_returner
    }

    /// Record which paddle just returned the ball; only future points change color
    pub fn register_return(&mut self, side: Side) {
        self.last_returner = Some(side);
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
        self.last_returner = None;
    }
}

impl Mod for PollokMod {
    fn key(&self) -> &str {
        ModKind::Pollok.key()
    }

    fn is_enabled(&self) -> bool {
        (self.config)().enabled
    }

    fn on_enabled(&mut self) {
        log::info!("Pollok enabled");
    }

    fn on_disabled(&mut self) {
        self.clear_trail();
        log::info!("Pollok disabled");
    }

    fn on_reset(&mut self) {
        self.clear_trail();
    }

    fn on_ball_reset(&mut self) {
        self.last_returner = None;
    }

    fn on_tick(&mut self, _dt: f32) {
        let config = (self.config)();
        if !config.enabled {
            self.clear_trail();
            return;
        }

        let color = pollok_color(&config, self.last_returner);
        self.trail.tick(
            true,
            Self::max_length(&config),
            POLLOK_MIN_DISTANCE_SQ,
            |ball| ColoredTrailPoint {
                pos: ball.pos,
                radius: ball.radius,
                color,
            },
        );
    }

    fn on_draw(&self, canvas: &mut dyn Canvas) {
        let config = (self.config)();
        if !config.enabled || self.trail().len() < 2 {
            return;
        }

        draw_scoped(canvas, |c| {
            c.set_line_cap(LineCap::Round);
            let mut points = self.trail().iter();
            let Some(mut prev) = points.next() else {
                return;
            };
            for point in points {
                if prev.pos != point.pos {
                    c.set_stroke_color(point.color);
                    c.set_line_width((prev.radius + point.radius) / 2.0 * POLLOK_WIDTH_SCALE);
                    c.stroke_polyline(&[prev.pos, point.pos]);
                }
                prev = point;
            }
        });
    }
}
