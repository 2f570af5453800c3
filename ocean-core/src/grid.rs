//! Grid geometry shared by every per-cell field.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Grids with at least this many cells are processed row-parallel.
#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
pub(crate) const PARALLEL_THRESHOLD: usize = 256 * 256;

/// Vertex counts of a row-major grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub nx: usize,
    pub ny: usize,
}

impl GridDims {
    pub fn new(nx: usize, ny: usize) -> Self {
        Self { nx, ny }
    }

    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.nx + x
    }

    #[inline(always)]
    pub(crate) fn clamp_x(&self, x: isize) -> usize {
        x.clamp(0, self.nx as isize - 1) as usize
    }

    #[inline(always)]
    pub(crate) fn clamp_y(&self, y: isize) -> usize {
        y.clamp(0, self.ny as isize - 1) as usize
    }
}

/// A grid laid over a physical plane centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub dims: GridDims,
    pub width: f32,
    pub length: f32,
}

impl Plane {
    pub fn new(dims: GridDims, width: f32, length: f32) -> Self {
        Self { dims, width, length }
    }

    /// Distance between neighbouring vertices along x.
    pub fn spacing_x(&self) -> f32 {
        self.width / (self.dims.nx - 1) as f32
    }

    /// Distance between neighbouring vertices along y.
    pub fn spacing_y(&self) -> f32 {
        self.length / (self.dims.ny - 1) as f32
    }

    /// World-space position of vertex `(x, y)` on the plane.
    pub fn position(&self, x: usize, y: usize) -> (f32, f32) {
        (
            x as f32 * self.spacing_x() - 0.5 * self.width,
            y as f32 * self.spacing_y() - 0.5 * self.length,
        )
    }

    /// Nearest vertex to a world-space point, or `None` when the point is off the plane.
    pub fn nearest_cell(&self, px: f32, py: f32) -> Option<(usize, usize)> {
        let fx = ((px + 0.5 * self.width) / self.spacing_x()).round();
        let fy = ((py + 0.5 * self.length) / self.spacing_y()).round();
        if fx < 0.0 || fy < 0.0 {
            return None;
        }
        let (x, y) = (fx as usize, fy as usize);
        (x < self.dims.nx && y < self.dims.ny).then_some((x, y))
    }
}

/// Runs `f(y, row)` over every row of `dst`.
///
/// Rows are independent, so large grids are split across the rayon pool. The result is
/// identical to the sequential path.
pub(crate) fn for_each_row<F>(dst: &mut [f32], nx: usize, f: F)
where
    F: Fn(usize, &mut [f32]) + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if dst.len() >= PARALLEL_THRESHOLD {
            dst.par_chunks_mut(nx)
                .enumerate()
                .for_each(|(y, row)| f(y, row));
            return;
        }
    }

    dst.chunks_mut(nx)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_positions_are_centered() {
        let plane = Plane::new(GridDims::new(11, 21), 10.0, 20.0);

        assert_eq!(plane.position(0, 0), (-5.0, -10.0));
        assert_eq!(plane.position(10, 20), (5.0, 10.0));
        assert_eq!(plane.position(5, 10), (0.0, 0.0));
    }

    #[test]
    fn test_nearest_cell() {
        let plane = Plane::new(GridDims::new(11, 11), 10.0, 10.0);

        assert_eq!(plane.nearest_cell(0.1, -0.2), Some((5, 5)));
        assert_eq!(plane.nearest_cell(-5.0, 5.0), Some((0, 10)));
        assert_eq!(plane.nearest_cell(-6.0, 0.0), None);
        assert_eq!(plane.nearest_cell(0.0, 5.6), None);
    }

    #[test]
    fn test_clamp_to_edge() {
        let dims = GridDims::new(4, 3);

        assert_eq!(dims.clamp_x(-2), 0);
        assert_eq!(dims.clamp_x(7), 3);
        assert_eq!(dims.clamp_y(2), 2);
        assert_eq!(dims.clamp_y(5), 2);
    }

    #[test]
    fn test_for_each_row_visits_all_rows() {
        let dims = GridDims::new(5, 4);
        let mut field = vec![0.0; dims.len()];

        for_each_row(&mut field, dims.nx, |y, row| {
            for (x, v) in row.iter_mut().enumerate() {
                *v = (y * 10 + x) as f32;
            }
        });

        assert_eq!(field[dims.idx(3, 2)], 23.0);
        assert_eq!(field[dims.idx(4, 3)], 34.0);
    }

    #[test]
    fn test_for_each_row_large_grid_matches_sequential() {
        let dims = GridDims::new(300, 260);
        assert!(dims.len() >= PARALLEL_THRESHOLD);
        let mut field = vec![0.0; dims.len()];

        for_each_row(&mut field, dims.nx, |y, row| {
            for (x, v) in row.iter_mut().enumerate() {
                *v = (y * dims.nx + x) as f32 * 0.5;
            }
        });

        for (i, v) in field.iter().enumerate() {
            assert_eq!(*v, i as f32 * 0.5);
        }
    }
}
