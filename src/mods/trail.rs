//! Shared trail primitives
//!
//! Trails are bounded FIFO histories of ball positions. New points are
//! appended at the tail, old ones evicted from the head, and points closer
//! than a minimum spacing to the previous one are skipped (compared squared).

use std::collections::VecDeque;

use glam::Vec2;

use super::{BallSnapshot, BallSource};
use crate::color::Color;

/// A recorded ball position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub radius: f32,
}

impl From<BallSnapshot> for TrailPoint {
    fn from(ball: BallSnapshot) -> Self {
        Self {
            pos: ball.pos,
            radius: ball.radius,
        }
    }
}

/// A recorded ball position tagged with the color it should be drawn in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredTrailPoint {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// Anything with a position that can live in a trail
pub trait TrailSample {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;
}

impl TrailSample for TrailPoint {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

impl TrailSample for ColoredTrailPoint {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Coerce a requested trail length into `[min, max]`
///
/// Non-finite requests fall back to `min`; fractional ones are floored.
pub fn clamp_trail_length(raw: f32, min: usize, max: usize) -> usize {
    if !raw.is_finite() {
        return min.min(max);
    }
    let floored = raw.floor().max(0.0) as usize;
    floored.max(min).min(max)
}

/// Append `point` unless it lies within `sqrt(min_distance_sq)` of the newest one
///
/// The first point is always recorded. Afterwards the head is trimmed so at
/// most `max_length` points remain. Returns whether the point was appended.
pub fn add_trail_point<P: TrailSample>(
    trail: &mut VecDeque<P>,
    point: P,
    max_length: usize,
    min_distance_sq: f32,
) -> bool {
    if let Some(last) = trail.back() {
        if last.pos().distance_squared(point.pos()) <= min_distance_sq && min_distance_sq > 0.0 {
            return false;
        }
    }

    trail.push_back(point);
    while trail.len() > max_length {
        trail.pop_front();
    }
    true
}

/// Ordered trail history, oldest first
#[derive(Debug, Clone)]
pub struct TrailState<P> {
    points: VecDeque<P>,
}

impl<P: TrailSample> Default for TrailState<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: TrailSample> TrailState<P> {
    pub fn new() -> Self {
        Self {
            points: VecDeque::new(),
        }
    }

    /// Record a point; see [`add_trail_point`]
    pub fn record(&mut self, point: P, max_length: usize, min_distance_sq: f32) -> bool {
        add_trail_point(&mut self.points, point, max_length, min_distance_sq)
    }

    /// Evict from the head until at most `max_length` points remain
    pub fn trim_to(&mut self, max_length: usize) {
        while self.points.len() > max_length {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        // Release large buffers (Pollok can hold thousands of points)
        if self.points.capacity() > 1024 {
            self.points = VecDeque::new();
        } else {
            self.points.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &P> + DoubleEndedIterator {
        self.points.iter()
    }

    pub fn newest(&self) -> Option<&P> {
        self.points.back()
    }

    pub fn oldest(&self) -> Option<&P> {
        self.points.front()
    }

    pub fn get(&self, index: usize) -> Option<&P> {
        self.points.get(index)
    }

    /// Positions oldest to newest, for polyline strokes
    pub fn positions(&self) -> Vec<Vec2> {
        self.points.iter().map(TrailSample::pos).collect()
    }
}

/// A trail fed from the injected ball source, one sample per tick
pub struct BallTrail<P> {
    ball: BallSource,
    history: TrailState<P>,
}

impl<P: TrailSample> BallTrail<P> {
    pub fn new(ball: impl Fn() -> Option<BallSnapshot> + 'static) -> Self {
        Self {
            ball: Box::new(ball),
            history: TrailState::new(),
        }
    }

    pub fn history(&self) -> &TrailState<P> {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Clear while disabled; otherwise trim to `max_length` and sample the ball if present
    pub fn tick(
        &mut self,
        enabled: bool,
        max_length: usize,
        min_distance_sq: f32,
        sample: impl FnOnce(BallSnapshot) -> P,
    ) {
        if !enabled {
            self.history.clear();
            return;
        }
        self.history.trim_to(max_length);
        if let Some(ball) = (self.ball)() {
            self.history.record(sample(ball), max_length, min_distance_sq);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(x: f32, y: f32) -> TrailPoint {
        TrailPoint {
            pos: Vec2::new(x, y),
            radius: 8.0,
        }
    }

    #[test]
    fn test_clamp_trail_length() {
        assert_eq!(clamp_trail_length(500.0, 1, 240), 240);
        assert_eq!(clamp_trail_length(12.7, 1, 240), 12);
        assert_eq!(clamp_trail_length(-4.0, 1, 240), 1);
        assert_eq!(clamp_trail_length(f32::NAN, 2, 240), 2);
        assert_eq!(clamp_trail_length(f32::INFINITY, 2, 240), 2);
    }

    #[test]
    fn test_first_point_always_recorded() {
        let mut trail = VecDeque::new();
        assert!(add_trail_point(&mut trail, point(0.0, 0.0), 10, 1_000_000.0));
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_thinning_skips_close_points() {
        let mut trail = VecDeque::new();
        add_trail_point(&mut trail, point(0.0, 0.0), 10, 4.0);
        // 1.5 px away: inside the 2 px spacing
        assert!(!add_trail_point(&mut trail, point(1.5, 0.0), 10, 4.0));
        // Exactly 2 px away is not farther than the spacing
        assert!(!add_trail_point(&mut trail, point(2.0, 0.0), 10, 4.0));
        assert!(add_trail_point(&mut trail, point(2.5, 0.0), 10, 4.0));
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn test_zero_spacing_records_repeats() {
        let mut trail = VecDeque::new();
        for _ in 0..5 {
            add_trail_point(&mut trail, point(3.0, 3.0), 10, 0.0);
        }
        assert_eq!(trail.len(), 5);
    }

    #[test]
    fn test_eviction_keeps_newest() {
        let mut state = TrailState::new();
        for i in 0..20 {
            state.record(point(i as f32, 0.0), 5, 0.0);
        }
        assert_eq!(state.len(), 5);
        assert_eq!(state.oldest().unwrap().pos.x, 15.0);
        assert_eq!(state.newest().unwrap().pos.x, 19.0);
    }

    #[test]
    fn test_trim_to_drops_oldest() {
        let mut state = TrailState::new();
        for i in 0..10 {
            state.record(point(i as f32, 0.0), 10, 0.0);
        }
        state.trim_to(3);
        assert_eq!(state.len(), 3);
        assert_eq!(state.oldest().unwrap().pos.x, 7.0);
    }

    #[test]
    fn test_clear_releases_large_buffers() {
        let mut state = TrailState::new();
        for i in 0..3000 {
            state.record(point(i as f32, 0.0), 6000, 0.0);
        }
        state.clear();
        assert!(state.is_empty());
        state.record(point(0.0, 0.0), 10, 0.0);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_ball_trail_tick() {
        use std::cell::Cell;
        use std::rc::Rc;

        let ball = Rc::new(Cell::new(None));
        let source = Rc::clone(&ball);
        let mut trail: BallTrail<TrailPoint> = BallTrail::new(move || source.get());

        // No ball in play: nothing to sample
        trail.tick(true, 4, 0.0, TrailPoint::from);
        assert!(trail.history().is_empty());

        for i in 0..6 {
            ball.set(Some(BallSnapshot {
                pos: Vec2::new(i as f32 * 10.0, 0.0),
                radius: 8.0,
            }));
            trail.tick(true, 4, 0.0, TrailPoint::from);
        }
        assert_eq!(trail.history().len(), 4);
        assert_eq!(trail.history().newest().map(|p| p.pos.x), Some(50.0));

        ball.set(None);
        trail.tick(true, 2, 0.0, TrailPoint::from);
        assert_eq!(trail.history().len(), 2);

        trail.tick(false, 2, 0.0, TrailPoint::from);
        assert!(trail.history().is_empty());
    }

    proptest! {
        #[test]
        fn prop_length_never_exceeds_max(
            max in 1usize..64,
            steps in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 0..200),
            min_dist_sq in prop_oneof![Just(0.0f32), 0.0f32..50.0],
        ) {
            let mut trail = VecDeque::new();
            for (x, y) in steps {
                add_trail_point(&mut trail, point(x, y), max, min_dist_sq);
                prop_assert!(trail.len() <= max);
            }
        }

        #[test]
        fn prop_unthinned_trail_fills_to_max(max in 1usize..64, extra in 1usize..64) {
            let mut trail = VecDeque::new();
            for i in 0..(max + extra) {
                add_trail_point(&mut trail, point(i as f32, 0.0), max, 0.0);
            }
            prop_assert_eq!(trail.len(), max);
        }
    }
}
