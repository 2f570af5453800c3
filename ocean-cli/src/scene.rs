use ocean_core::{AmbientField, ObstructionSource, Plane, Raster, GRAVITY};
use rand::Rng;
use std::f32::consts::TAU;

/// One deep-water sine component of the swell.
#[derive(Clone, Copy, Debug)]
pub struct SwellWave {
    /// Unit travel direction.
    pub direction: (f32, f32),
    /// Radians per metre.
    pub wavenumber: f32,
    pub amplitude: f32,
    pub phase: f32,
}

impl SwellWave {
    /// Deep-water dispersion, w = sqrt(g k).
    pub fn angular_frequency(&self) -> f32 {
        (GRAVITY * self.wavenumber).sqrt()
    }

    pub fn elevation(&self, px: f32, py: f32, t: f32) -> f32 {
        let along = self.direction.0 * px + self.direction.1 * py;
        let phase = self.wavenumber * along - self.angular_frequency() * t + self.phase;
        self.amplitude * phase.sin()
    }
}

/// Background swell: a handful of directional waves summed per vertex.
pub struct SwellField {
    waves: Vec<SwellWave>,
    dt: f32,
}

impl SwellField {
    pub fn new(waves: Vec<SwellWave>, dt: f32) -> Self {
        Self { waves, dt }
    }

    /// Waves from a common prevailing direction with some spread. Longer waves get
    /// more of the total `amplitude`.
    pub fn random<R: Rng>(
        rng: &mut R,
        count: usize,
        amplitude: f32,
        plane: &Plane,
        dt: f32,
    ) -> Self {
        let heading = rng.gen_range(0.0..TAU);
        let longest = plane.width.max(plane.length) * 0.5;
        let shortest = 8.0 * plane.spacing_x().max(plane.spacing_y());

        let mut waves = Vec::with_capacity(count);
        for _ in 0..count {
            let angle = heading + rng.gen_range(-0.6..0.6);
            let wavelength = rng.gen_range(shortest.min(longest)..=longest);
            waves.push(SwellWave {
                direction: (angle.cos(), angle.sin()),
                wavenumber: TAU / wavelength,
                amplitude: amplitude * wavelength / longest / count.max(1) as f32,
                phase: rng.gen_range(0.0..TAU),
            });
        }

        Self::new(waves, dt)
    }

    pub fn waves(&self) -> &[SwellWave] {
        &self.waves
    }
}

impl AmbientField for SwellField {
    fn fill(&mut self, frame: i64, plane: &Plane, out: &mut [f32]) {
        let t = frame as f32 * self.dt;
        for y in 0..plane.dims.ny {
            for x in 0..plane.dims.nx {
                let (px, py) = plane.position(x, y);
                out[plane.dims.idx(x, y)] =
                    self.waves.iter().map(|w| w.elevation(px, py, t)).sum();
            }
        }
    }
}

/// A round hull moving in a straight line at constant speed.
///
/// Its disk fully obstructs the water. A one-cell rim fades the obstruction out and
/// carries the wake: water rises at the bow and drops at the stern.
#[derive(Clone, Debug)]
pub struct FloatingBody {
    pub start: (f32, f32),
    /// Metres per second.
    pub velocity: (f32, f32),
    pub radius: f32,
    pub start_frame: i64,
    pub dt: f32,
    pub wake_gain: f32,
}

impl FloatingBody {
    pub fn random<R: Rng>(rng: &mut R, plane: &Plane, start_frame: i64, dt: f32) -> Self {
        let spacing = plane.spacing_x().max(plane.spacing_y());
        let heading = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(1.0..4.0);

        FloatingBody {
            start: (
                rng.gen_range(-0.4..0.4) * plane.width,
                rng.gen_range(-0.4..0.4) * plane.length,
            ),
            velocity: (speed * heading.cos(), speed * heading.sin()),
            radius: rng.gen_range(2.0..6.0) * spacing,
            start_frame,
            dt,
            wake_gain: 1.0,
        }
    }

    pub fn center(&self, frame: i64) -> (f32, f32) {
        let t = (frame - self.start_frame) as f32 * self.dt;
        (
            self.start.0 + self.velocity.0 * t,
            self.start.1 + self.velocity.1 * t,
        )
    }

    pub fn speed(&self) -> f32 {
        self.velocity.0.hypot(self.velocity.1)
    }
}

impl ObstructionSource for FloatingBody {
    fn rasterize(&mut self, frame: i64, raster: &mut Raster<'_>) {
        let plane = *raster.plane();
        let (cx, cy) = self.center(frame);
        let (sx, sy) = (plane.spacing_x(), plane.spacing_y());
        let rim = sx.max(sy);
        let reach = self.radius + rim;

        let speed = self.speed();
        let heading = if speed > 0.0 {
            (self.velocity.0 / speed, self.velocity.1 / speed)
        } else {
            (0.0, 0.0)
        };

        let span = |c: f32, half: f32, step: f32, n: usize| {
            let lo = ((c - reach + half) / step).floor().max(0.0) as usize;
            let hi = (((c + reach + half) / step).ceil().max(0.0) as usize).min(n - 1);
            lo..=hi
        };

        for y in span(cy, 0.5 * plane.length, sy, plane.dims.ny) {
            for x in span(cx, 0.5 * plane.width, sx, plane.dims.nx) {
                let (px, py) = plane.position(x, y);
                let (dx, dy) = (px - cx, py - cy);
                let d = dx.hypot(dy);

                if d <= self.radius {
                    raster.obstruct(x, y, 1.0);
                } else if d <= reach {
                    let fade = 1.0 - (d - self.radius) / rim;
                    raster.obstruct(x, y, fade);

                    let facing = (dx * heading.0 + dy * heading.1) / d;
                    raster.inject(x, y, self.wake_gain * speed * self.dt * facing * fade);
                }
            }
        }
    }
}
