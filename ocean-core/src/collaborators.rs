//! The narrow interfaces through which a host feeds per-frame input.
//!
//! The simulation never sees geometry or parameter curves. It asks an [`AmbientField`]
//! for background elevation and each [`ObstructionSource`] for its footprint on the grid.

use crate::grid::Plane;

/// Background wave elevation, e.g. from an FFT spectrum synthesized elsewhere.
pub trait AmbientField: Send {
    /// Writes the ambient elevation for `frame` into `out` (row-major, one value per
    /// vertex of `plane`).
    fn fill(&mut self, frame: i64, plane: &Plane, out: &mut [f32]);
}

/// A body that obstructs the water and may stir it.
pub trait ObstructionSource: Send {
    /// Marks the cells this body covers at `frame`.
    fn rasterize(&mut self, frame: i64, raster: &mut Raster<'_>);
}

/// Flat water everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct StillWater;

impl AmbientField for StillWater {
    fn fill(&mut self, _frame: i64, _plane: &Plane, out: &mut [f32]) {
        out.fill(0.0);
    }
}

/// Write access to the raw obstruction and source fields for one frame.
///
/// Obstruction combines by minimum so overlapping bodies keep the strongest cover;
/// sources add.
pub struct Raster<'a> {
    plane: Plane,
    obstruction: &'a mut [f32],
    source: &'a mut [f32],
}

impl<'a> Raster<'a> {
    pub(crate) fn new(plane: Plane, obstruction: &'a mut [f32], source: &'a mut [f32]) -> Self {
        Self {
            plane,
            obstruction,
            source,
        }
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Records that a body covers `coverage` (0..=1) of vertex `(x, y)`.
    ///
    /// Out-of-grid vertices are ignored.
    pub fn obstruct(&mut self, x: usize, y: usize, coverage: f32) {
        if x >= self.plane.dims.nx || y >= self.plane.dims.ny {
            return;
        }
        let idx = self.plane.dims.idx(x, y);
        let open = 1.0 - coverage.clamp(0.0, 1.0);
        self.obstruction[idx] = self.obstruction[idx].min(open);
    }

    /// Adds wake forcing at vertex `(x, y)`. Out-of-grid vertices are ignored.
    pub fn inject(&mut self, x: usize, y: usize, strength: f32) {
        if x >= self.plane.dims.nx || y >= self.plane.dims.ny {
            return;
        }
        let idx = self.plane.dims.idx(x, y);
        self.source[idx] += strength;
    }

    pub fn obstruction(&self) -> &[f32] {
        self.obstruction
    }

    pub fn source(&self) -> &[f32] {
        self.source
    }
}
