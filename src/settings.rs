//! Modifier configuration for every mod family
//!
//! Each family gets its own config struct; the host re-reads them every frame
//! and mods never cache them. Numeric knobs are coerced here once (non-finite
//! values fall back to defaults) so the simulations only see usable numbers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::consts::*;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum snowflakes for this preset
    pub fn max_snowflakes(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 240,
            QualityPreset::High => 600,
        }
    }

    /// Trail length multiplier (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

/// Kite: fading dot-chain behind the ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KiteConfig {
    pub enabled: bool,
    /// Requested trail length (clamped to `KITE_MAX_TRAIL`)
    pub tail_length: f32,
    pub color: Color,
}

impl Default for KiteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tail_length: 120.0,
            color: Color::rgb(0.55, 0.85, 1.0),
        }
    }
}

/// Bum-Shuffle: one continuous stroke behind the ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BumShuffleConfig {
    pub enabled: bool,
    pub trail_length: f32,
    pub color: Color,
}

impl Default for BumShuffleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trail_length: 1500.0,
            color: Color::rgb(0.6, 0.4, 0.25),
        }
    }
}

/// Pollok: paint-drip trail colored by whoever returned the ball last
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PollokConfig {
    pub enabled: bool,
    pub trail_length: f32,
    pub left_color: Color,
    pub right_color: Color,
    pub neutral_color: Color,
}

impl Default for PollokConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trail_length: 3000.0,
            left_color: Color::rgb(0.95, 0.3, 0.35),
            right_color: Color::rgb(0.3, 0.55, 0.95),
            neutral_color: Color::rgb(0.9, 0.9, 0.9),
        }
    }
}

/// Spawn-object family (paddle potion, tea party, drink me)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnConfig {
    pub enabled: bool,
    /// Shared modifier radius, used when `object_radius` is unset
    pub radius: Option<f32>,
    pub object_radius: Option<f32>,
    pub spawn_count: Option<f32>,
    pub color: Color,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: None,
            object_radius: None,
            spawn_count: None,
            color: Color::rgb(0.7, 0.35, 0.9),
        }
    }
}

impl SpawnConfig {
    /// `object_radius`, else `radius`, else the default; clamped to the spawn bounds
    pub fn resolved_radius(&self) -> f32 {
        let raw = finite(self.object_radius)
            .or(finite(self.radius))
            .unwrap_or(SPAWN_DEFAULT_RADIUS);
        crate::clamp(raw, SPAWN_MIN_RADIUS, SPAWN_MAX_RADIUS)
    }

    /// Desired object count in `[0, SPAWN_MAX_COUNT]`
    pub fn resolved_count(&self) -> usize {
        finite(self.spawn_count)
            .map(|c| crate::clamp(c.floor(), 0.0, SPAWN_MAX_COUNT as f32) as usize)
            .unwrap_or(SPAWN_DEFAULT_COUNT)
    }
}

/// Wonderland: ambient falling snow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WonderlandConfig {
    pub enabled: bool,
    pub snowflake_count: Option<f32>,
    /// Base snowflake radius in pixels
    pub snowflake_size: Option<f32>,
    /// Base fall speed in pixels per second
    pub snowflake_speed: Option<f32>,
    pub snow_opacity: Option<f32>,
    pub snow_color: Color,
}

impl Default for WonderlandConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            snowflake_count: None,
            snowflake_size: None,
            snowflake_speed: None,
            snow_opacity: None,
            snow_color: Color::WHITE,
        }
    }
}

impl WonderlandConfig {
    pub fn resolved_count(&self) -> usize {
        finite(self.snowflake_count)
            .map(|c| crate::clamp(c.floor(), 0.0, SNOW_MAX_COUNT as f32) as usize)
            .unwrap_or(SNOW_DEFAULT_COUNT)
    }

    /// True when the configured count had to be cut down to `SNOW_MAX_COUNT`
    pub fn count_exceeds_ceiling(&self) -> bool {
        finite(self.snowflake_count).is_some_and(|c| c.floor() > SNOW_MAX_COUNT as f32)
    }

    pub fn resolved_size(&self) -> f32 {
        finite(self.snowflake_size)
            .map(|s| s.max(0.0))
            .unwrap_or(SNOW_DEFAULT_SIZE)
    }

    pub fn resolved_speed(&self) -> f32 {
        finite(self.snowflake_speed).unwrap_or(SNOW_DEFAULT_SPEED)
    }

    pub fn resolved_opacity(&self) -> f32 {
        crate::clamp(
            finite(self.snow_opacity).unwrap_or(SNOW_DEFAULT_OPACITY),
            0.0,
            1.0,
        )
    }
}

fn finite(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite())
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Configuration snapshot for every mod family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModifierSettings {
    pub quality: QualityPreset,
    pub kite: KiteConfig,
    pub bum_shuffle: BumShuffleConfig,
    pub pollok: PollokConfig,
    pub paddle_potion: SpawnConfig,
    pub tea_party: SpawnConfig,
    pub drink_me: SpawnConfig,
    pub wonderland: WonderlandConfig,
}

impl ModifierSettings {
    /// Parse a (possibly partial) JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(|s| s.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded modifier settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid modifier settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace non-finite numbers with their defaults
    pub fn sanitized(mut self) -> Self {
        self.kite.tail_length = finite_or(self.kite.tail_length, KiteConfig::default().tail_length);
        self.bum_shuffle.trail_length = finite_or(
            self.bum_shuffle.trail_length,
            BumShuffleConfig::default().trail_length,
        );
        self.pollok.trail_length =
            finite_or(self.pollok.trail_length, PollokConfig::default().trail_length);

        for spawn in [&mut self.paddle_potion, &mut self.tea_party, &mut self.drink_me] {
            spawn.radius = finite(spawn.radius);
            spawn.object_radius = finite(spawn.object_radius);
            spawn.spawn_count = finite(spawn.spawn_count);
        }

        let snow = &mut self.wonderland;
        snow.snowflake_count = finite(snow.snowflake_count);
        snow.snowflake_size = finite(snow.snowflake_size);
        snow.snowflake_speed = finite(snow.snowflake_speed);
        snow.snow_opacity = finite(snow.snow_opacity);
        self
    }

    /// Scale trail lengths and snowflake count down to the quality preset
    pub fn with_quality_applied(&self) -> Self {
        let mut out = self.clone();
        let quality = self.quality.trail_quality();
        out.kite.tail_length *= quality;
        out.bum_shuffle.trail_length *= quality;
        out.pollok.trail_length *= quality;

        let max_flakes = self.quality.max_snowflakes();
        let count = out.wonderland.resolved_count().min(max_flakes);
        out.wonderland.snowflake_count = Some(count as f32);
        out
    }
}
