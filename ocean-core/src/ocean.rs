//! Height field state and the per-frame driver.

use log::{debug, info, log_enabled, Level};

use crate::collaborators::{AmbientField, ObstructionSource, Raster};
use crate::config::OceanConfig;
use crate::convolution::{Convolution, DenseConvolution, SeparableConvolution};
use crate::error::{OceanError, Result};
use crate::grid::{for_each_row, GridDims, Plane};
use crate::kernel::{Kernel1d, Kernel2d};
use crate::{KERNEL_RADIUS, SMOOTHING_RADIUS};

/// An iWave simulation over a fixed grid.
///
/// Per frame the host calls [`update_fields`](Ocean::update_fields) (or
/// [`replace_fields`](Ocean::replace_fields)) and then [`advance`](Ocean::advance).
pub struct Ocean {
    config: OceanConfig,
    plane: Plane,
    frame: i64,
    gravity: f32,

    ambient_field: Box<dyn AmbientField>,
    sources: Vec<Box<dyn ObstructionSource>>,

    smoothing: SeparableConvolution,
    vertical_derivative_conv: DenseConvolution,

    ambient: Vec<f32>,
    obstruction_raw: Vec<f32>,
    obstruction: Vec<f32>,
    source: Vec<f32>,
    height: Vec<f32>,
    previous_height: Vec<f32>,
    vertical_derivative: Vec<f32>,
}

impl Ocean {
    /// Builds a simulation with open, still water: no obstruction, no source, zero
    /// ambient, so the first frame may be advanced without an update.
    pub fn new(
        config: OceanConfig,
        ambient_field: Box<dyn AmbientField>,
        sources: Vec<Box<dyn ObstructionSource>>,
    ) -> Result<Ocean> {
        config.validate()?;

        let dims = config.dims();
        let size = dims.len();

        let smoothing =
            SeparableConvolution::new(Kernel1d::gaussian(SMOOTHING_RADIUS, config.sigma), dims);
        let vertical_derivative_conv =
            DenseConvolution::new(Kernel2d::vertical_derivative(KERNEL_RADIUS), dims);

        info!(
            "ocean: {}x{} vertices over {}x{}, dt={}, alpha={}, sigma={}, wake_exponent={}, \
             kernel radii {}/{}, {} source(s)",
            dims.nx,
            dims.ny,
            config.width,
            config.length,
            config.dt,
            config.alpha,
            config.sigma,
            config.wake_exponent,
            smoothing.radius(),
            vertical_derivative_conv.radius(),
            sources.len()
        );

        Ok(Ocean {
            plane: config.plane(),
            frame: config.start_frame,
            gravity: config.gravity(),
            ambient_field,
            sources,
            smoothing,
            vertical_derivative_conv,
            ambient: vec![0.0; size],
            obstruction_raw: vec![1.0; size],
            obstruction: vec![1.0; size],
            source: vec![0.0; size],
            height: vec![0.0; size],
            previous_height: vec![0.0; size],
            vertical_derivative: vec![0.0; size],
            config,
        })
    }

    // ---- Per-frame input ----

    /// Pulls ambient elevation and every body's footprint for the current frame, then
    /// smooths the obstruction map.
    pub fn update_fields(&mut self) {
        self.obstruction_raw.fill(1.0);
        self.source.fill(0.0);

        self.ambient_field
            .fill(self.frame, &self.plane, &mut self.ambient);

        let mut raster = Raster::new(self.plane, &mut self.obstruction_raw, &mut self.source);
        for source in &mut self.sources {
            source.rasterize(self.frame, &mut raster);
        }

        self.smooth_obstructions();
    }

    /// Replaces the externally owned fields wholesale, for hosts that rasterize
    /// obstructions themselves.
    pub fn replace_fields(
        &mut self,
        ambient: &[f32],
        obstruction_raw: &[f32],
        source: &[f32],
    ) -> Result<()> {
        self.check_field("ambient", ambient.len())?;
        self.check_field("obstruction", obstruction_raw.len())?;
        self.check_field("source", source.len())?;

        self.ambient.copy_from_slice(ambient);
        self.obstruction_raw.copy_from_slice(obstruction_raw);
        self.source.copy_from_slice(source);
        self.smooth_obstructions();
        Ok(())
    }

    /// Fails with [`OceanError::FieldSize`] unless `len` matches the grid.
    pub fn check_field(&self, field: &'static str, len: usize) -> Result<()> {
        let expected = self.plane.dims.len();
        if len != expected {
            return Err(OceanError::FieldSize {
                field,
                got: len,
                expected,
            });
        }
        Ok(())
    }

    // ---- Stepping ----

    /// Advances one `dt` and returns the resulting heights.
    pub fn advance(&mut self) -> Frame {
        self.propagate();
        self.frame += 1;

        let frame = self.snapshot();
        if log_enabled!(Level::Debug) {
            debug!(
                "frame {}: height range [{:.4}, {:.4}]",
                frame.frame,
                frame.min_height(),
                frame.max_height()
            );
        }
        frame
    }

    /// Current heights scaled by `height_scale`.
    pub fn snapshot(&self) -> Frame {
        let scale = self.config.height_scale;
        Frame {
            frame: self.frame,
            plane: self.plane,
            heights: self.height.iter().map(|h| h * scale).collect(),
        }
    }

    // ---- Accessors ----

    pub fn config(&self) -> &OceanConfig {
        &self.config
    }

    pub fn dims(&self) -> GridDims {
        self.plane.dims
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn frame(&self) -> i64 {
        self.frame
    }

    /// Unscaled current heights.
    pub fn height(&self) -> &[f32] {
        &self.height
    }

    pub fn previous_height(&self) -> &[f32] {
        &self.previous_height
    }

    pub fn ambient(&self) -> &[f32] {
        &self.ambient
    }

    pub fn obstruction_raw(&self) -> &[f32] {
        &self.obstruction_raw
    }

    /// Smoothed obstruction coefficients in [0, 1].
    pub fn obstruction(&self) -> &[f32] {
        &self.obstruction
    }

    pub fn source(&self) -> &[f32] {
        &self.source
    }

    // ---- Internal numeric routines ----

    fn smooth_obstructions(&mut self) {
        self.smoothing
            .apply(&self.obstruction_raw, &mut self.obstruction);
        for o in &mut self.obstruction {
            *o = o.clamp(0.0, 1.0);
        }
    }

    /// One damped iWave step.
    ///
    /// Free water follows
    /// h' = ((2 - a) h - h_prev - g vd) / (1 + a), a = alpha dt.
    /// Obstructed cells track the ambient field instead, and sources add wake
    /// forcing shaped by `wake_exponent`. The new heights are written over the
    /// previous buffer, which then becomes current.
    fn propagate(&mut self) {
        self.vertical_derivative_conv
            .apply(&self.height, &mut self.vertical_derivative);

        let adt = self.config.alpha * self.config.dt;
        let inv = 1.0 / (1.0 + adt);
        let keep = (2.0 - adt) * inv;
        let gravity = self.gravity * inv;
        let wake_exponent = self.config.wake_exponent;

        let nx = self.plane.dims.nx;
        let height = &self.height;
        let vd = &self.vertical_derivative;
        let obstruction = &self.obstruction;
        let ambient = &self.ambient;
        let source = &self.source;

        for_each_row(&mut self.previous_height, nx, |y, row| {
            let base = y * nx;
            for (x, prev) in row.iter_mut().enumerate() {
                let i = base + x;
                let free = keep * height[i] - inv * *prev - gravity * vd[i];
                let o = obstruction[i];
                *prev = o * free + (1.0 - o) * ambient[i] + wake(source[i], wake_exponent);
            }
        });

        std::mem::swap(&mut self.height, &mut self.previous_height);
    }
}

/// Sign-preserving power of a source value.
#[inline(always)]
fn wake(source: f32, exponent: f32) -> f32 {
    if source == 0.0 {
        0.0
    } else {
        source.signum() * source.abs().powf(exponent)
    }
}

/// Heights emitted for one frame, scaled by `height_scale`.
///
/// Turning this into a mesh is up to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub frame: i64,
    pub plane: Plane,
    pub heights: Vec<f32>,
}

impl Frame {
    pub fn dims(&self) -> GridDims {
        self.plane.dims
    }

    pub fn height_at(&self, x: usize, y: usize) -> Option<f32> {
        let dims = self.plane.dims;
        if x >= dims.nx || y >= dims.ny {
            return None;
        }
        Some(self.heights[dims.idx(x, y)])
    }

    /// World-space `[x, height, y]` of a vertex.
    pub fn position(&self, x: usize, y: usize) -> Option<[f32; 3]> {
        let h = self.height_at(x, y)?;
        let (px, py) = self.plane.position(x, y);
        Some([px, h, py])
    }

    pub fn min_height(&self) -> f32 {
        self.heights.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max_height(&self) -> f32 {
        self.heights.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn mean_height(&self) -> f32 {
        self.heights.iter().sum::<f32>() / self.heights.len() as f32
    }
}
