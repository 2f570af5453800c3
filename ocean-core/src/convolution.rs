//! Fixed-radius 2D convolution over row-major grids.
//!
//! Edge policy is clamp-to-edge for every kernel: a footprint that leaves the grid
//! samples the nearest edge vertex. Constant fields therefore stay constant under a
//! normalized kernel, edges included.

use crate::grid::{for_each_row, GridDims};
use crate::kernel::{Kernel1d, Kernel2d};

/// A convolution bound to one grid size.
pub trait Convolution {
    /// Half-width of the kernel footprint.
    fn radius(&self) -> usize;

    /// Writes `src * kernel` into `dst`. Both slices must hold one value per grid cell.
    fn apply(&mut self, src: &[f32], dst: &mut [f32]);
}

/// Row pass then column pass of a 1D kernel.
pub struct SeparableConvolution {
    kernel: Kernel1d,
    dims: GridDims,
    scratch: Vec<f32>,
}

impl SeparableConvolution {
    pub fn new(kernel: Kernel1d, dims: GridDims) -> Self {
        Self {
            kernel,
            dims,
            scratch: vec![0.0; dims.len()],
        }
    }

    pub fn kernel(&self) -> &Kernel1d {
        &self.kernel
    }
}

impl Convolution for SeparableConvolution {
    fn radius(&self) -> usize {
        self.kernel.radius()
    }

    fn apply(&mut self, src: &[f32], dst: &mut [f32]) {
        let Self {
            kernel,
            dims,
            scratch,
        } = self;
        let dims = *dims;
        let kernel = &*kernel;
        let r = kernel.radius() as isize;

        for_each_row(scratch, dims.nx, |y, row| {
            let src_row = &src[y * dims.nx..(y + 1) * dims.nx];
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for i in -r..=r {
                    acc += kernel.weight(i) * src_row[dims.clamp_x(x as isize + i)];
                }
                *out = acc;
            }
        });

        let scratch = &*scratch;
        for_each_row(dst, dims.nx, |y, row| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for j in -r..=r {
                    acc += kernel.weight(j) * scratch[dims.idx(x, dims.clamp_y(y as isize + j))];
                }
                *out = acc;
            }
        });
    }
}

/// Full (2r+1) x (2r+1) footprint per output cell.
pub struct DenseConvolution {
    kernel: Kernel2d,
    dims: GridDims,
}

impl DenseConvolution {
    pub fn new(kernel: Kernel2d, dims: GridDims) -> Self {
        Self { kernel, dims }
    }

    pub fn kernel(&self) -> &Kernel2d {
        &self.kernel
    }
}

impl Convolution for DenseConvolution {
    fn radius(&self) -> usize {
        self.kernel.radius()
    }

    fn apply(&mut self, src: &[f32], dst: &mut [f32]) {
        let dims = self.dims;
        let kernel = &self.kernel;
        let r = kernel.radius() as isize;

        for_each_row(dst, dims.nx, |y, row| {
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for dy in -r..=r {
                    let sy = dims.clamp_y(y as isize + dy);
                    let src_row = &src[sy * dims.nx..(sy + 1) * dims.nx];
                    for dx in -r..=r {
                        acc += kernel.weight(dx, dy) * src_row[dims.clamp_x(x as isize + dx)];
                    }
                }
                *out = acc;
            }
        });
    }
}
