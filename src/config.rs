//! Configuration for the odometer
//!
//! Loads chassis calibration from a TOML file: wheel diameters, wheel
//! mounting direction, track width, and the dead-reckoning tuning knobs.

use crate::displacement::DisplacementModel;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Re-base encoders once a cumulative count magnitude passes this value.
///
/// Half the i32 range leaves plenty of headroom: at a few thousand ticks
/// per second this still takes days to reach.
pub const DEFAULT_REBASE_THRESHOLD: i32 = i32::MAX / 2;

/// Calibration for one wheel
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WheelConfig {
    /// Wheel diameter in the linear unit all poses will use
    pub diameter: f32,
    /// Whether positive encoder counts mean forward travel.
    ///
    /// Set to `false` for a mirrored encoder whose count decreases when
    /// the robot drives forward.
    #[serde(default = "default_forward")]
    pub forward: bool,
}

/// Chassis calibration and dead-reckoning tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OdometerConfig {
    /// Distance between the two wheel contact points, same unit as the
    /// wheel diameters
    pub track_width: f32,
    /// How per-update wheel travel becomes a position delta
    #[serde(default)]
    pub displacement_model: DisplacementModel,
    /// Cumulative tick magnitude that triggers an encoder re-base
    #[serde(default = "default_rebase_threshold")]
    pub rebase_threshold: i32,
    /// Left wheel calibration
    pub left_wheel: WheelConfig,
    /// Right wheel calibration
    pub right_wheel: WheelConfig,
}

fn default_forward() -> bool {
    true
}

fn default_rebase_threshold() -> i32 {
    DEFAULT_REBASE_THRESHOLD
}

impl OdometerConfig {
    /// Load configuration from TOML file
    ///
    /// # Arguments
    /// - `path`: Path to TOML configuration file
    ///
    /// # Returns
    /// Parsed configuration or error
    ///
    /// # Example
    /// ```no_run
    /// use chakra_odom::config::OdometerConfig;
    ///
    /// let config = OdometerConfig::from_file("odometer.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: OdometerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    ///
    /// # Arguments
    /// - `path`: Path to save TOML configuration file
    ///
    /// # Returns
    /// Success or error
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check the calibration values for physical plausibility.
    pub fn validate(&self) -> Result<()> {
        validate_diameter("left wheel", self.left_wheel.diameter)?;
        validate_diameter("right wheel", self.right_wheel.diameter)?;
        if !self.track_width.is_finite() || self.track_width <= 0.0 {
            return Err(Error::InvalidCalibration(format!(
                "track width must be positive and finite, got {}",
                self.track_width
            )));
        }
        if self.rebase_threshold <= 0 {
            return Err(Error::InvalidCalibration(format!(
                "re-base threshold must be positive, got {}",
                self.rebase_threshold
            )));
        }
        Ok(())
    }
}

fn validate_diameter(side: &str, diameter: f32) -> Result<()> {
    if !diameter.is_finite() || diameter <= 0.0 {
        return Err(Error::InvalidCalibration(format!(
            "{} diameter must be positive and finite, got {}",
            side, diameter
        )));
    }
    Ok(())
}

impl Default for OdometerConfig {
    fn default() -> Self {
        Self {
            track_width: 20.0, // wheel separation, same unit as diameters
            displacement_model: DisplacementModel::default(),
            rebase_threshold: DEFAULT_REBASE_THRESHOLD,
            left_wheel: WheelConfig {
                diameter: 6.0, // bench chassis drive wheels
                forward: true,
            },
            right_wheel: WheelConfig {
                diameter: 6.0,
                forward: true,
            },
        }
    }
}
