use std::fmt;

use crate::input::Key;
use crate::time::Millis;

/// Simulation and presentation rates.
///
/// Immutable once the loop starts. Budgets are derived on demand.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RateConfig {
    /// Frame-rate cap enforced by the pacer.
    pub target_fps: f64,

    /// Fixed simulation steps per second.
    pub target_ups: f64,

    /// Request presentation-synchronized frames from the window system.
    ///
    /// Applies in addition to the pacer, not instead of it.
    pub vsync: bool,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            target_ups: 30.0,
            vsync: false,
        }
    }
}

impl RateConfig {
    /// Validated constructor.
    pub fn new(target_fps: f64, target_ups: f64, vsync: bool) -> Result<Self, ConfigError> {
        let config = Self {
            target_fps,
            target_ups,
            vsync,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.target_fps = fps;
        self
    }

    pub fn with_ups(mut self, ups: f64) -> Self {
        self.target_ups = ups;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Both rates must be positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate("target_fps", self.target_fps)?;
        check_rate("target_ups", self.target_ups)?;
        Ok(())
    }

    pub fn frame_budget_ms(&self) -> Millis {
        1000.0 / self.target_fps
    }

    pub fn step_budget_ms(&self) -> Millis {
        1000.0 / self.target_ups
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { name, value })
    }
}

/// Initial window parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,

    /// Center on the primary monitor before the window is shown.
    pub centered: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "tempo".to_string(),
            width: 800,
            height: 600,
            resizable: true,
            centered: true,
        }
    }
}

/// Everything the lifecycle needs to bring the loop up.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub rates: RateConfig,

    /// Releasing this key asks the window to close. `None` disables it.
    pub stop_key: Option<Key>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            rates: RateConfig::default(),
            stop_key: Some(Key::Escape),
        }
    }
}

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidRate { name: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRate { name, value } => {
                write!(f, "{name} must be a positive, finite rate (got {value})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sixty_over_thirty() {
        let rates = RateConfig::default();
        assert_eq!(rates.target_fps, 60.0);
        assert_eq!(rates.target_ups, 30.0);
        assert!(!rates.vsync);
        assert!((rates.frame_budget_ms() - 16.6667).abs() < 1e-3);
        assert!((rates.step_budget_ms() - 33.3333).abs() < 1e-3);
    }

    #[test]
    fn rejects_non_positive_rates() {
        assert_eq!(
            RateConfig::new(0.0, 30.0, false),
            Err(ConfigError::InvalidRate { name: "target_fps", value: 0.0 })
        );
        assert!(RateConfig::new(60.0, -1.0, false).is_err());
        assert!(RateConfig::new(f64::INFINITY, 30.0, false).is_err());
        assert!(RateConfig::new(60.0, f64::NAN, false).is_err());
    }

    #[test]
    fn builders_override_fields() {
        let rates = RateConfig::default().with_fps(144.0).with_ups(120.0).with_vsync(true);
        assert_eq!(rates, RateConfig::new(144.0, 120.0, true).unwrap());
    }

    #[test]
    fn error_message_names_the_field() {
        let err = RateConfig::new(60.0, 0.0, false).unwrap_err();
        assert_eq!(err.to_string(), "target_ups must be a positive, finite rate (got 0)");
    }

    #[test]
    fn escape_stops_by_default() {
        assert_eq!(EngineConfig::default().stop_key, Some(Key::Escape));
    }
}
