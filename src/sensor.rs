//! Photoresistor array simulation over a rasterized track.
//!
//! The simulator owns an immutable copy of the track raster and a fixed
//! sensor geometry. `update` places the array for a robot pose, `read`
//! integrates reflectance under a disc footprint per sensor and adds
//! calibrated Gaussian noise. The disc kernel offsets are precomputed
//! once at construction; `read` only walks the list.

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::{EngineError, Result};
use crate::raster::TrackRaster;
use crate::types::{PixelPoint, Point2D, SensorConfig};

pub struct SensorArray {
    raster: TrackRaster,
    ppm: u32,
    forward_offset: f64,
    photo_sep: f64,
    base_noise: f64,
    radius: i32,
    offsets: Vec<(i32, i32)>,
    positions: Vec<PixelPoint>,
    rng: SmallRng,
}

impl SensorArray {
    /// Build a simulator over `raster` with the given geometry.
    ///
    /// The footprint radius is `trunc(photo_height * tan(photo_fov / 2)
    /// * ppm)` pixels; a radius below one pixel or an empty array is a
    /// construction error.
    pub fn new(raster: TrackRaster, config: &SensorConfig) -> Result<Self> {
        if config.array_size == 0 {
            return Err(EngineError::InvalidParameter(
                "array_size must be at least 1".into(),
            ));
        }
        if !config.base_noise.is_finite() || config.base_noise < 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "base_noise must be finite and non-negative, got {}",
                config.base_noise
            )));
        }
        let radius =
            (config.photo_height * (config.photo_fov / 2.0).tan() * config.track_ppm as f64)
                as i32;
        if radius < 1 {
            return Err(EngineError::InvalidParameter(format!(
                "sensor footprint radius is {radius} px; photo_height, \
                 photo_fov and track_ppm must give at least one pixel"
            )));
        }

        let mut offsets = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy < radius * radius {
                    offsets.push((dx, dy));
                }
            }
        }

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        debug!(
            "sensor array: {} sensors, radius {} px, kernel {} px",
            config.array_size,
            radius,
            offsets.len()
        );

        let mut array = SensorArray {
            raster,
            ppm: config.track_ppm,
            forward_offset: config.forward_offset,
            photo_sep: config.photo_sep,
            base_noise: config.base_noise,
            radius,
            offsets,
            positions: vec![PixelPoint::default(); config.array_size],
            rng,
        };
        array.update(0.0, 0.0, 0.0);
        Ok(array)
    }

    /// Place the array for a robot pose (meters, radians).
    ///
    /// The array center sits `forward_offset` ahead of the robot along
    /// its heading; sensor 0 is offset `(n-1)/2` separations to the
    /// left of that center, with each following sensor one separation
    /// further right along the heading's perpendicular.
    pub fn update(&mut self, x: f64, y: f64, yaw: f64) {
        let (sin, cos) = yaw.sin_cos();
        let half_span = (self.positions.len() - 1) as f64 / 2.0;
        let origin = Point2D::new(
            x + self.forward_offset * cos,
            y + self.forward_offset * sin,
        ) + Point2D::new(-self.photo_sep * sin, self.photo_sep * cos) * half_span;
        let step = Point2D::new(self.photo_sep * sin, -self.photo_sep * cos);

        for i in 0..self.positions.len() {
            self.positions[i] = self.raster.to_pixel(origin + step * i as f64, self.ppm);
        }
    }

    /// Intensities in [0, 1], one per sensor, at the current positions.
    ///
    /// Each value is the mean reflectance under the disc footprint,
    /// normalized by 255, plus one Gaussian noise sample, clamped.
    pub fn read(&mut self) -> Vec<f64> {
        let samples = self.offsets.len() as f64;
        let mut readings = Vec::with_capacity(self.positions.len());
        for i in 0..self.positions.len() {
            let pos = self.positions[i];
            let mut sum = 0.0;
            for &(dx, dy) in &self.offsets {
                sum += f64::from(self.raster.sample(pos.x + dx, pos.y + dy));
            }
            let value = sum / samples / 255.0 + self.noise();
            readings.push(value.clamp(0.0, 1.0));
        }
        readings
    }

    /// Current sensor positions in pixel coordinates.
    pub fn photo_positions(&self) -> &[PixelPoint] {
        &self.positions
    }

    /// Footprint radius in pixels.
    pub fn radius(&self) -> i32 {
        self.radius
    }

    fn noise(&mut self) -> f64 {
        if self.base_noise == 0.0 {
            return 0.0;
        }
        let n: f64 = self.rng.sample(StandardNormal);
        n * self.base_noise
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn uniform_raster(value: u8, width: usize, height: usize) -> TrackRaster {
        TrackRaster::from_flat(vec![value; width * height], width, height).expect("raster")
    }

    fn base_config() -> SensorConfig {
        SensorConfig {
            track_ppm: 1000,
            forward_offset: 0.0,
            photo_height: 0.0055,
            array_size: 3,
            photo_sep: 0.008,
            photo_fov: FRAC_PI_2,
            base_noise: 0.0,
            seed: Some(1),
        }
    }

    #[test]
    fn radius_from_height_and_fov() {
        // 0.0055 m * tan(45 deg) * 1000 ppm truncates to 5 px
        let s = SensorArray::new(uniform_raster(255, 200, 200), &base_config()).expect("sensor");
        assert_eq!(s.radius(), 5);
    }

    #[test]
    fn kernel_is_strict_interior_of_disc() {
        let mut cfg = base_config();
        cfg.photo_height = 0.0025; // radius 2
        let s = SensorArray::new(uniform_raster(255, 200, 200), &cfg).expect("sensor");
        assert_eq!(s.radius(), 2);
        assert_eq!(s.offsets.len(), 9); // dx^2 + dy^2 < 4
    }

    #[test]
    fn white_region_reads_one() {
        let mut s =
            SensorArray::new(uniform_raster(255, 200, 200), &base_config()).expect("sensor");
        s.update(0.0, 0.0, 0.0);
        for v in s.read() {
            assert_relative_eq!(v, 1.0);
        }
    }

    #[test]
    fn black_region_reads_zero() {
        let mut s = SensorArray::new(uniform_raster(0, 200, 200), &base_config()).expect("sensor");
        s.update(0.0, 0.0, 0.0);
        for v in s.read() {
            assert_relative_eq!(v, 0.0);
        }
    }

    #[test]
    fn positions_symmetric_about_forward_axis() {
        let mut s =
            SensorArray::new(uniform_raster(255, 200, 200), &base_config()).expect("sensor");
        s.update(0.0, 0.0, 0.0);
        let pos = s.photo_positions();
        // photo_sep 0.008 m at 1000 ppm = 8 px; center of a 200-wide
        // raster is pixel 100. Sensor 0 is to the robot's left (+y,
        // which is up, i.e. a smaller row index).
        assert_eq!(pos[0], PixelPoint::new(100, 92));
        assert_eq!(pos[1], PixelPoint::new(100, 100));
        assert_eq!(pos[2], PixelPoint::new(100, 108));
    }

    #[test]
    fn forward_offset_shifts_along_heading() {
        let mut cfg = base_config();
        cfg.forward_offset = 0.012;
        let mut s = SensorArray::new(uniform_raster(255, 200, 200), &cfg).expect("sensor");
        s.update(0.0, 0.0, 0.0);
        assert_eq!(s.photo_positions()[1], PixelPoint::new(112, 100));

        // Facing +y: the offset moves the array up the image instead.
        s.update(0.0, 0.0, FRAC_PI_2);
        assert_eq!(s.photo_positions()[1], PixelPoint::new(100, 88));
    }

    #[test]
    fn yaw_rotates_array_axis() {
        let mut s =
            SensorArray::new(uniform_raster(255, 200, 200), &base_config()).expect("sensor");
        // Facing +y the lateral axis lies along world x; sensor 0 goes
        // to the robot's left, which is now -x.
        s.update(0.0, 0.0, FRAC_PI_2);
        let pos = s.photo_positions();
        assert_eq!(pos[0], PixelPoint::new(92, 100));
        assert_eq!(pos[1], PixelPoint::new(100, 100));
        assert_eq!(pos[2], PixelPoint::new(108, 100));
    }

    #[test]
    fn off_image_pose_reads_dark() {
        let mut s =
            SensorArray::new(uniform_raster(255, 200, 200), &base_config()).expect("sensor");
        s.update(10.0, 0.0, 0.0);
        for v in s.read() {
            assert_relative_eq!(v, 0.0);
        }
    }

    #[test]
    fn seeded_noise_is_deterministic() {
        let mut cfg = base_config();
        cfg.base_noise = 0.05;
        let mut a = SensorArray::new(uniform_raster(128, 200, 200), &cfg).expect("sensor");
        let mut b = SensorArray::new(uniform_raster(128, 200, 200), &cfg).expect("sensor");
        for _ in 0..10 {
            assert_eq!(a.read(), b.read());
        }
    }

    #[test]
    fn noisy_readings_stay_clamped() {
        let mut cfg = base_config();
        cfg.base_noise = 0.8;
        let mut s = SensorArray::new(uniform_raster(128, 200, 200), &cfg).expect("sensor");
        s.update(0.0, 0.0, 0.0);
        let mut varied = false;
        let mut last = None;
        for _ in 0..50 {
            for v in s.read() {
                assert!((0.0..=1.0).contains(&v));
                if let Some(prev) = last {
                    varied |= v != prev;
                }
                last = Some(v);
            }
        }
        assert!(varied, "noise should perturb successive readings");
    }

    #[test]
    fn construction_rejects_bad_parameters() {
        let mut cfg = base_config();
        cfg.array_size = 0;
        assert!(SensorArray::new(uniform_raster(255, 10, 10), &cfg).is_err());

        let mut cfg = base_config();
        cfg.photo_height = 1e-6; // radius truncates to 0
        assert!(SensorArray::new(uniform_raster(255, 10, 10), &cfg).is_err());

        let mut cfg = base_config();
        cfg.base_noise = -0.1;
        assert!(SensorArray::new(uniform_raster(255, 10, 10), &cfg).is_err());
    }

    #[test]
    fn generated_line_reads_dark_under_central_sensor() {
        // Rasterize a straight generated track as a dark band on a
        // white image, then place the robot on the line: the central
        // sensor must read track-dark while the outer sensors, one
        // separation to each side, stay on the white background.
        use crate::primitives::straight_points;

        let (width, height) = (400usize, 400usize);
        let ppm = 1000u32;
        let mut rows = vec![vec![255u8; width]; height];
        let points =
            straight_points(Point2D::new(-0.15, 0.0), 0.0, 0.3, 0.001).expect("points");
        let stamp = 4i32;
        for p in points {
            let px = width as i32 / 2 + (p.x * ppm as f64).round() as i32;
            let py = height as i32 / 2 - (p.y * ppm as f64).round() as i32;
            for dy in -stamp..=stamp {
                for dx in -stamp..=stamp {
                    if dx * dx + dy * dy <= stamp * stamp {
                        let (x, y) = (px + dx, py + dy);
                        if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
                            rows[y as usize][x as usize] = 0;
                        }
                    }
                }
            }
        }

        let raster = TrackRaster::from_rows(rows).expect("raster");
        let mut cfg = base_config();
        cfg.photo_sep = 0.01; // 10 px: outer footprints clear the band
        let mut s = SensorArray::new(raster, &cfg).expect("sensor");
        s.update(0.0, 0.0, 0.0);
        let readings = s.read();
        assert!(readings[1] < 0.1, "central sensor on the line: {readings:?}");
        assert!(readings[0] > 0.9, "left sensor off the line: {readings:?}");
        assert!(readings[2] > 0.9, "right sensor off the line: {readings:?}");
    }
}
