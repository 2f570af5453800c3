//! Construction parameters for an ocean simulation.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{OceanError, Result};
use crate::grid::{GridDims, Plane};
use crate::KERNEL_RADIUS;

/// Standard gravity in m/s^2.
pub const GRAVITY: f32 = 9.8;

/// Smallest vertex count per axis that fits a full vertical derivative kernel.
pub const MIN_VERTICES: usize = 2 * KERNEL_RADIUS + 1;

/// Everything an [`Ocean`](crate::Ocean) needs at construction.
///
/// All values are fixed for the lifetime of the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanConfig {
    /// Frame number of the first simulated frame.
    pub start_frame: i64,
    /// Vertices along the width; must be >= 2P+1.
    pub vertices_x: usize,
    /// Vertices along the length; must be >= 2P+1.
    pub vertices_y: usize,
    pub width: f32,
    pub length: f32,
    /// Factor applied to emitted heights.
    pub height_scale: f32,
    /// Seconds per step, e.g. 1/24 at 24 fps.
    pub dt: f32,
    /// Wave damping. Realistic damping is 0.2 <= alpha <= 0.4.
    pub alpha: f32,
    /// Spread of the Gaussian that smooths obstructions.
    pub sigma: f32,
    /// Nonlinearity of wake-generated waves, >= 1.0.
    pub wake_exponent: f32,
}

impl Default for OceanConfig {
    fn default() -> Self {
        Self {
            start_frame: 0,
            vertices_x: 64,
            vertices_y: 64,
            width: 100.0,
            length: 100.0,
            height_scale: 1.0,
            dt: 1.0 / 24.0,
            alpha: 0.3,
            sigma: 1.0,
            wake_exponent: 2.0,
        }
    }
}

impl OceanConfig {
    pub fn dims(&self) -> GridDims {
        GridDims::new(self.vertices_x, self.vertices_y)
    }

    pub fn plane(&self) -> Plane {
        Plane::new(self.dims(), self.width, self.length)
    }

    pub fn cell_count(&self) -> usize {
        self.vertices_x * self.vertices_y
    }

    /// g * dt^2, the gravity term of the discretized update.
    pub fn gravity(&self) -> f32 {
        GRAVITY * self.dt * self.dt
    }

    pub fn spacing_x(&self) -> f32 {
        self.plane().spacing_x()
    }

    pub fn spacing_y(&self) -> f32 {
        self.plane().spacing_y()
    }

    /// Rejects configurations the simulation cannot run with.
    ///
    /// Tuning outside the recommended ranges is accepted with a warning; it yields
    /// implausible or unstable waves, not a failure.
    pub fn validate(&self) -> Result<()> {
        for (axis, got) in [('x', self.vertices_x), ('y', self.vertices_y)] {
            if got < MIN_VERTICES {
                return Err(OceanError::GridTooSmall {
                    axis,
                    got,
                    min: MIN_VERTICES,
                });
            }
        }

        for (name, value) in [
            ("dt", self.dt),
            ("sigma", self.sigma),
            ("width", self.width),
            ("length", self.length),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(OceanError::InvalidParameter { name, value });
            }
        }

        if !(0.2..=0.4).contains(&self.alpha) {
            warn!("alpha = {} is outside the realistic range 0.2..=0.4", self.alpha);
        }
        if self.wake_exponent < 1.0 {
            warn!("wake_exponent = {} is below 1.0", self.wake_exponent);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = OceanConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.cell_count(), 64 * 64);
    }

    #[test]
    fn test_gravity_scales_with_dt_squared() {
        let config = OceanConfig {
            dt: 0.5,
            ..OceanConfig::default()
        };

        assert!((config.gravity() - 2.45).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_small_grid() {
        let config = OceanConfig {
            vertices_y: MIN_VERTICES - 1,
            ..OceanConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(OceanError::GridTooSmall {
                axis: 'y',
                got: 12,
                min: 13,
            })
        );
    }

    #[test]
    fn test_rejects_non_positive_dt() {
        let config = OceanConfig {
            dt: 0.0,
            ..OceanConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(OceanError::InvalidParameter { name: "dt", .. })
        ));
    }

    #[test]
    fn test_out_of_range_tuning_is_accepted() {
        let config = OceanConfig {
            alpha: 0.9,
            wake_exponent: 0.5,
            ..OceanConfig::default()
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: OceanConfig =
            serde_json::from_str(r#"{"vertices_x": 32, "alpha": 0.25}"#).unwrap();

        assert_eq!(config.vertices_x, 32);
        assert_eq!(config.alpha, 0.25);
        assert_eq!(config.vertices_y, 64);
    }
}
