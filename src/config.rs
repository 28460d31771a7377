use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Every tunable of the shell. Each section falls back to its defaults, so a
/// `config.json` only needs the values it overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub time: TimeConfig,
    pub ace_of_shadows: AceOfShadowsConfig,
    pub magic_words: MagicWordsConfig,
    pub phoenix_flame: PhoenixFlameConfig,
    pub assets: AssetsConfig,
}

impl GameConfig {
    pub fn from_value(json: Value) -> Result<Self> {
        serde_json::from_value(json).context("config.json does not match GameConfig")
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub fixed_rate_hz: f64,
    /// Upper bound of fixed steps drained in one frame after a stall.
    pub max_catch_up_steps: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        TimeConfig {
            fixed_rate_hz: 50.0,
            max_catch_up_steps: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AceOfShadowsConfig {
    pub card_count: usize,
    pub stack_count: usize,
    pub circle_radius: f64,
    /// seconds
    pub move_duration: f64,
    /// milliseconds between two deals
    pub interval_delay: f64,
    pub position_offset: f64,
    pub rotation_offset: f64,
    pub card_scale: f64,
    pub card_width: f64,
    pub card_height: f64,
}

impl Default for AceOfShadowsConfig {
    fn default() -> Self {
        AceOfShadowsConfig {
            card_count: 144,
            stack_count: 3,
            circle_radius: 250.0,
            move_duration: 2.0,
            interval_delay: 1000.0,
            position_offset: 15.0,
            rotation_offset: 0.3,
            card_scale: 0.65,
            card_width: 100.0,
            card_height: 140.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MagicWordsConfig {
    pub bubble: BubbleConfig,
    pub text: TextConfig,
    pub sequence: SequenceConfig,
    pub history: HistoryConfig,
    pub endpoint: String,
}

impl Default for MagicWordsConfig {
    fn default() -> Self {
        MagicWordsConfig {
            bubble: BubbleConfig::default(),
            text: TextConfig::default(),
            sequence: SequenceConfig::default(),
            history: HistoryConfig::default(),
            endpoint: "https://private-624120-softgamesassignment.apiary-mock.com/v2/magicwords"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    pub width: f64,
    pub avatar_size: f64,
    pub padding: f64,
    /// seconds
    pub pop_in_duration: f64,
    pub pop_in_overshoot: f64,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        BubbleConfig {
            width: 500.0,
            avatar_size: 100.0,
            padding: 20.0,
            pop_in_duration: 0.6,
            pop_in_overshoot: 1.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub font_size: f64,
    pub line_height: f64,
    pub font_family: String,
    pub color: u32,
    /// seconds per token
    pub typewriter_speed: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        TextConfig {
            font_size: 24.0,
            line_height: 40.0,
            font_family: "PoppinsBold".to_string(),
            color: 0xffffff,
            typewriter_speed: 0.03,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// milliseconds each bubble stays the newest
    pub display_time: f64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        SequenceConfig {
            display_time: 3000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub spacing: f64,
    pub fade_factor: f64,
    /// bubbles this many places behind the newest are hidden
    pub max_visible_age: usize,
    pub max_retained: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            spacing: 20.0,
            fade_factor: 0.7,
            max_visible_age: 4,
            max_retained: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhoenixFlameConfig {
    pub max_particles: usize,
    pub global_speed: f64,
    pub particle: ParticleConfig,
    pub sheet_columns: u32,
    pub sheet_rows: u32,
}

impl Default for PhoenixFlameConfig {
    fn default() -> Self {
        PhoenixFlameConfig {
            max_particles: 10,
            global_speed: 60.0,
            particle: ParticleConfig::default(),
            sheet_columns: 3,
            sheet_rows: 3,
        }
    }
}

/// Ranges are in frames (lifetime) and pixels per frame (speed), the
/// system scales them by `global_speed`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub lifetime_min: f64,
    pub lifetime_max: f64,
    pub speed_y_min: f64,
    pub speed_y_max: f64,
    pub scale_min: f64,
    pub scale_max: f64,
    pub spawn_width: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        ParticleConfig {
            lifetime_min: 30.0,
            lifetime_max: 50.0,
            speed_y_min: -5.0,
            speed_y_max: -3.0,
            scale_min: 0.2,
            scale_max: 0.5,
            spawn_width: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub manifest: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        AssetsConfig {
            manifest: "assets/manifest.json".to_string(),
        }
    }
}
