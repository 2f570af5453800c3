//! Interactive ocean surface simulation.
//!
//! A background wave field is combined with local iWave propagation around floating
//! and submerged bodies. Hosts supply rasters (ambient elevation, obstruction, wake
//! sources) each frame and read back a flat height array.
//!
//! ```rust,ignore
//! let mut ocean = Ocean::new(OceanConfig::default(), Box::new(StillWater), bodies)?;
//! loop {
//!     ocean.update_fields();
//!     let frame = ocean.advance();
//!     upload(&frame.heights);
//! }
//! ```

mod collaborators;
mod config;
mod convolution;
mod error;
mod grid;
mod kernel;
mod ocean;

pub use collaborators::{AmbientField, ObstructionSource, Raster, StillWater};
pub use config::{OceanConfig, GRAVITY, MIN_VERTICES};
pub use convolution::{Convolution, DenseConvolution, SeparableConvolution};
pub use error::{OceanError, Result};
pub use grid::{GridDims, Plane};
pub use kernel::{bessel_j0, Kernel1d, Kernel2d};
pub use ocean::{Frame, Ocean};

/// Radius of the iWave vertical derivative kernel.
pub const KERNEL_RADIUS: usize = 6;

/// Radius of the Gaussian that smooths obstructions.
pub const SMOOTHING_RADIUS: usize = 2;
