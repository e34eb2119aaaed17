//! Pong Mods headless demo
//!
//! Plays a scripted rally in a rectangular arena, driving every mod through
//! its lifecycle and tessellating each frame into a `VertexCanvas`.
//!
//! Usage: `pong-mods [settings.json] [--frames N]`

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use glam::Vec2;

use pong_mods::mods::ModSet;
use pong_mods::renderer::{Vertex, VertexCanvas};
use pong_mods::{Arena, BallSnapshot, Circle, Mod, ModifierSettings, Side};

const FRAME_DT: f32 = 1.0 / 60.0;
/// Re-serve the ball after this many frames
const SERVE_INTERVAL: u32 = 420;
const BALL_RADIUS: f32 = 8.0;
const BALL_SPEED: f32 = 320.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless Pong mods demo", long_about = None)]
struct Args {
    /// Modifier settings JSON; a built-in demo setup is used when omitted
    settings: Option<PathBuf>,
    /// Number of 60 Hz frames to simulate
    #[arg(long, default_value_t = 600)]
    frames: u32,
}

/// Minimal stand-in for the host's ball physics
struct Rally {
    pos: Vec2,
    vel: Vec2,
}

impl Rally {
    fn serve(arena: Arena, serve_index: u32) -> Self {
        let dir = if serve_index % 2 == 0 { 1.0 } else { -1.0 };
        Self {
            pos: arena.center(),
            vel: Vec2::new(dir, 0.45).normalize() * BALL_SPEED,
        }
    }

    /// Move the ball; returns the side that returned it this step, if any
    fn step(&mut self, arena: Arena, dt: f32) -> Option<Side> {
        self.pos += self.vel * dt;
        if self.pos.y < BALL_RADIUS || self.pos.y > arena.height - BALL_RADIUS {
            self.vel.y = -self.vel.y;
            self.pos.y = self.pos.y.clamp(BALL_RADIUS, arena.height - BALL_RADIUS);
        }
        if self.pos.x < BALL_RADIUS {
            self.vel.x = self.vel.x.abs();
            self.pos.x = BALL_RADIUS;
            return Some(Side::Left);
        }
        if self.pos.x > arena.width - BALL_RADIUS {
            self.vel.x = -self.vel.x.abs();
            self.pos.x = arena.width - BALL_RADIUS;
            return Some(Side::Right);
        }
        None
    }

    fn snapshot(&self) -> BallSnapshot {
        BallSnapshot {
            pos: self.pos,
            radius: BALL_RADIUS,
        }
    }
}

fn demo_settings() -> ModifierSettings {
    let mut settings = ModifierSettings::default();
    settings.kite.enabled = true;
    settings.pollok.enabled = true;
    settings.paddle_potion.enabled = true;
    settings.tea_party.enabled = true;
    settings.tea_party.spawn_count = Some(2.0);
    settings.tea_party.object_radius = Some(28.0);
    settings.wonderland.enabled = true;
    settings
}

fn main() {
    env_logger::init();
    log::info!("Pong Mods (native) starting...");

    let args = Args::parse();
    let settings = match &args.settings {
        Some(path) => ModifierSettings::load(path),
        None => demo_settings(),
    };
    let frames = args.frames;

    let arena = Arena::new(960.0, 540.0);
    let settings = Rc::new(RefCell::new(settings.with_quality_applied()));
    let arena_cell = Rc::new(Cell::new(arena));
    let ball_cell = Rc::new(Cell::new(None));
    let mut mods = ModSet::new(
        Rc::clone(&settings),
        Rc::clone(&arena_cell),
        Rc::clone(&ball_cell),
        0x5eed,
    );

    let mut was_enabled = [false; 7];
    let mut serve_index = 0;
    let mut rally = Rally::serve(arena, serve_index);
    let mut canvas = VertexCanvas::new();

    for frame in 0..frames {
        if frame > 0 && frame % SERVE_INTERVAL == 0 {
            serve_index += 1;
            rally = Rally::serve(arena, serve_index);
            for m in mods.all_mut() {
                m.on_ball_reset();
            }
        }

        if let Some(side) = rally.step(arena, FRAME_DT) {
            mods.pollok.register_return(side);
        }
        ball_cell.set(Some(rally.snapshot()));

        // Edge-triggered lifecycle hooks, as a mod manager would issue them
        for (m, was) in mods.all_mut().into_iter().zip(was_enabled.iter_mut()) {
            let now = m.is_enabled();
            match (*was, now) {
                (false, true) => m.on_enabled(),
                (true, false) => m.on_disabled(),
                _ => {}
            }
            *was = now;
            m.on_tick(FRAME_DT);
        }

        // Ball touching a potion/teacup relocates it away from the ball
        let ball = Circle::from(rally.snapshot());
        for spawn in [&mut mods.paddle_potion, &mut mods.tea_party, &mut mods.drink_me] {
            if let Some(index) = spawn.hit_test(ball) {
                spawn.respawn_object(index, Some(ball));
            }
        }

        canvas.clear();
        for m in mods.all() {
            m.on_draw(&mut canvas);
        }

        if frame % 60 == 0 {
            log::info!(
                "frame {:>4}: {} vertices ({} bytes), kite={} pollok={} snow={}",
                frame,
                canvas.vertex_count(),
                Vertex::as_bytes(canvas.vertices()).len(),
                mods.kite.trail().len(),
                mods.pollok.trail().len(),
                mods.wonderland.particles().len(),
            );
        }
    }

    for m in mods.all_mut() {
        m.on_reset();
    }
    log::info!("Pong Mods finished after {} frames", frames);
}
