//! Convolution kernels: the obstruction smoothing Gaussian and the iWave vertical
//! derivative.

/// Wavenumber step used when integrating the vertical derivative kernel.
const DELTA_Q: f64 = 0.001;
/// Number of wavenumber samples; covers q in (0, 10].
const Q_SAMPLES: usize = 10_000;

/// A normalized 1D kernel, applied along rows and then columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel1d {
    radius: usize,
    weights: Vec<f32>,
}

impl Kernel1d {
    /// Sampled Gaussian exp(-x^2 / 2 sigma^2), normalized to sum to 1.
    pub fn gaussian(radius: usize, sigma: f32) -> Self {
        let r = radius as isize;
        let denom = 2.0 * sigma * sigma;
        let mut weights: Vec<f32> = (-r..=r)
            .map(|i| (-((i * i) as f32) / denom).exp())
            .collect();

        let sum: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= sum;
        }

        Self { radius, weights }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[inline(always)]
    pub fn weight(&self, offset: isize) -> f32 {
        self.weights[(offset + self.radius as isize) as usize]
    }
}

/// A full (2r+1) x (2r+1) kernel, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel2d {
    radius: usize,
    weights: Vec<f32>,
}

impl Kernel2d {
    /// The iWave vertical derivative kernel.
    ///
    /// G(k, l) = sum_n q_n^2 exp(-q_n^2) J0(q_n r) / G0 with r = sqrt(k^2 + l^2) and
    /// G0 = sum_n q_n^2 exp(-q_n^2), so the center weight is 1.
    pub fn vertical_derivative(radius: usize) -> Self {
        let samples: Vec<(f64, f64)> = (1..=Q_SAMPLES)
            .map(|n| {
                let q = n as f64 * DELTA_Q;
                (q, q * q * (-q * q).exp())
            })
            .collect();
        let g0: f64 = samples.iter().map(|&(_, w)| w).sum();

        // The kernel is radial; integrate once per distinct squared radius.
        let r = radius as isize;
        let mut by_r2: Vec<Option<f32>> = vec![None; 2 * radius * radius + 1];
        let side = 2 * radius + 1;
        let mut weights = Vec::with_capacity(side * side);

        for l in -r..=r {
            for k in -r..=r {
                let r2 = (k * k + l * l) as usize;
                let g = *by_r2[r2].get_or_insert_with(|| {
                    let dist = (r2 as f64).sqrt();
                    let sum: f64 = samples
                        .iter()
                        .map(|&(q, w)| w * bessel_j0(q * dist))
                        .sum();
                    (sum / g0) as f32
                });
                weights.push(g);
            }
        }

        Self { radius, weights }
    }

    /// Outer product of a 1D kernel with itself.
    pub fn from_separable(kernel: &Kernel1d) -> Self {
        let w = kernel.weights();
        let weights = w
            .iter()
            .flat_map(|&wy| w.iter().map(move |&wx| wx * wy))
            .collect();

        Self {
            radius: kernel.radius(),
            weights,
        }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    #[inline(always)]
    pub fn weight(&self, dx: isize, dy: isize) -> f32 {
        let r = self.radius as isize;
        let side = 2 * r + 1;
        self.weights[((dy + r) * side + (dx + r)) as usize]
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// Bessel function of the first kind, order zero.
///
/// Rational approximation for |x| < 8, asymptotic expansion beyond.
pub fn bessel_j0(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let num = 57568490574.0
            + y * (-13362590354.0
                + y * (651619640.7 + y * (-11214424.18 + y * (77392.33017 + y * -184.9052456))));
        let den = 57568490411.0
            + y * (1029532985.0 + y * (9494680.718 + y * (59272.64853 + y * (267.8532712 + y))));
        num / den
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 0.785398164;
        let p = 1.0
            + y * (-0.1098628627e-2
                + y * (0.2734510407e-4 + y * (-0.2073370639e-5 + y * 0.2093887211e-6)));
        let q = -0.1562499995e-1
            + y * (0.1430488765e-3
                + y * (-0.6911147651e-5 + y * (0.7621095161e-6 - y * 0.934935152e-7)));
        (0.636619772 / ax).sqrt() * (xx.cos() * p - z * xx.sin() * q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KERNEL_RADIUS;

    #[test]
    fn test_gaussian_is_normalized_and_symmetric() {
        let k = Kernel1d::gaussian(2, 1.0);

        assert_eq!(k.weights().len(), 5);
        assert!((k.weights().iter().sum::<f32>() - 1.0).abs() < 1e-6);
        assert_eq!(k.weight(-2), k.weight(2));
        assert!(k.weight(0) > k.weight(1));
    }

    #[test]
    fn test_separable_outer_product_is_normalized() {
        let k = Kernel2d::from_separable(&Kernel1d::gaussian(2, 1.5));

        assert!((k.sum() - 1.0).abs() < 1e-5);
        assert_eq!(k.weight(-1, 2), k.weight(2, -1));
    }

    #[test]
    fn test_bessel_j0_reference_values() {
        assert!((bessel_j0(0.0) - 1.0).abs() < 1e-7);
        assert!((bessel_j0(1.0) - 0.765_197_686_6).abs() < 1e-7);
        assert!(bessel_j0(2.404_825_557_7).abs() < 1e-7);
        assert!((bessel_j0(10.0) + 0.245_935_764_5).abs() < 1e-7);
    }

    #[test]
    fn test_vertical_derivative_kernel_shape() {
        let k = Kernel2d::vertical_derivative(KERNEL_RADIUS);
        let r = KERNEL_RADIUS as isize;

        assert_eq!(k.weights().len(), (2 * KERNEL_RADIUS + 1).pow(2));
        assert!((k.weight(0, 0) - 1.0).abs() < 1e-5);
        assert!(k.weights().iter().all(|&w| w <= k.weight(0, 0)));
        assert!(k.weight(1, 0) > k.weight(2, 0));

        for dy in -r..=r {
            for dx in -r..=r {
                assert_eq!(k.weight(dx, dy), k.weight(-dx, dy));
                assert_eq!(k.weight(dx, dy), k.weight(dy, dx));
            }
        }
    }
}
