//! Core value types shared across the engine.
//!
//! Coordinate convention: x right, y up, angles in radians. Physical
//! distances are in meters and scale to raster indices by a
//! pixels-per-meter factor; pixel rows grow downward.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A 2D point or displacement in physical units (meters).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }
}

impl Add for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Point2D;

    fn mul(self, c: f64) -> Point2D {
        Point2D::new(self.x * c, self.y * c)
    }
}

/// A position in raster pixel coordinates (column, row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        PixelPoint { x, y }
    }
}

fn default_base_noise() -> f64 {
    0.0
}

/// Construction parameters for the sensor array simulator.
///
/// Distances are meters, `photo_fov` is radians. `base_noise` is the
/// standard deviation of the Gaussian noise added to each reading;
/// `seed` fixes the noise stream for reproducible runs (None draws the
/// seed from OS entropy).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    pub track_ppm: u32,
    pub forward_offset: f64,
    pub photo_height: f64,
    pub array_size: usize,
    pub photo_sep: f64,
    pub photo_fov: f64,
    #[serde(default = "default_base_noise")]
    pub base_noise: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SensorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
