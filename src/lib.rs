//! Track geometry and IR sensor simulation engine — Rust implementation.
//!
//! Backs the line-follower training environment with three pieces:
//! path primitive generation (straight runs and circular arcs), a
//! contiguous-tail self-intersection detector used while building
//! tracks, and a photoresistor-array simulator that samples a
//! rasterized track image. The Python-facing names mirror the original
//! `trackutils` and `irsensor` extension modules so the environment
//! imports this crate unchanged.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

pub mod collision;
pub mod error;
pub mod primitives;
pub mod raster;
pub mod sensor;
pub mod types;

use error::EngineError;
use raster::TrackRaster;
use sensor::SensorArray;
use types::{Point2D, SensorConfig};

impl From<EngineError> for PyErr {
    fn from(e: EngineError) -> PyErr {
        PyValueError::new_err(e.to_string())
    }
}

fn to_points(pairs: &[(f64, f64)]) -> Vec<Point2D> {
    pairs.iter().map(|&(x, y)| Point2D::new(x, y)).collect()
}

fn to_pairs(points: Vec<Point2D>) -> Vec<(f64, f64)> {
    points.into_iter().map(|p| (p.x, p.y)).collect()
}

/// End point of a straight run.
#[pyfunction]
fn rect_p(x0: f64, y0: f64, c_ang: f64, ds: f64) -> (f64, f64) {
    let p = primitives::straight_end(Point2D::new(x0, y0), c_ang, ds);
    (p.x, p.y)
}

/// Point sequence of a straight run sampled every `pd` meters.
#[pyfunction]
fn get_rect(x0: f64, y0: f64, c_ang: f64, ds: f64, pd: f64) -> PyResult<Vec<(f64, f64)>> {
    let points = primitives::straight_points(Point2D::new(x0, y0), c_ang, ds, pd)?;
    Ok(to_pairs(points))
}

/// End point of a circular arc of signed displacement `da` and radius `r`.
#[pyfunction]
fn curve_p(x0: f64, y0: f64, c_ang: f64, da: f64, r: f64) -> PyResult<(f64, f64)> {
    let p = primitives::arc_end(Point2D::new(x0, y0), c_ang, da, r)?;
    Ok((p.x, p.y))
}

/// Point sequence of a circular arc of length `ds` sampled every `pd` meters.
#[pyfunction]
fn get_curve(
    x0: f64,
    y0: f64,
    c_ang: f64,
    da: f64,
    ds: f64,
    pd: f64,
) -> PyResult<Vec<(f64, f64)>> {
    let points = primitives::arc_points(Point2D::new(x0, y0), c_ang, da, ds, pd)?;
    Ok(to_pairs(points))
}

/// Self-intersection test, Chebyshev proximity.
#[pyfunction]
fn collision_dect(seg: Vec<(f64, f64)>, track: Vec<(f64, f64)>, th: f64) -> bool {
    collision::collision_chebyshev(&to_points(&seg), &to_points(&track), th)
}

/// Self-intersection test, Euclidean proximity with a bounding-box prune.
#[pyfunction]
fn collision_dect2(seg: Vec<(f64, f64)>, track: Vec<(f64, f64)>, th: f64) -> bool {
    collision::collision_euclidean(&to_points(&seg), &to_points(&track), th)
}

/// Simulated photoresistor array over a rasterized track image.
#[pyclass]
struct IrSensor {
    inner: SensorArray,
}

#[pymethods]
impl IrSensor {
    /// `img` is the track reflectance image as rows of bytes
    /// (0 = dark, 255 = bright), `ds` the forward offset from the robot
    /// reference point to the array center in meters, `photo_fov` the
    /// sensor field of view in radians. `seed` fixes the noise stream.
    #[new]
    #[pyo3(signature = (img, track_ppm, ds, photo_height, array_size, photo_sep, photo_fov, base_noise=0.0, seed=None))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        img: Vec<Vec<u8>>,
        track_ppm: u32,
        ds: f64,
        photo_height: f64,
        array_size: usize,
        photo_sep: f64,
        photo_fov: f64,
        base_noise: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let raster = TrackRaster::from_rows(img)?;
        let config = SensorConfig {
            track_ppm,
            forward_offset: ds,
            photo_height,
            array_size,
            photo_sep,
            photo_fov,
            base_noise,
            seed,
        };
        Ok(IrSensor {
            inner: SensorArray::new(raster, &config)?,
        })
    }

    /// Build from a JSON configuration string (same schema as
    /// `SensorConfig`) instead of positional parameters.
    #[staticmethod]
    fn from_config(img: Vec<Vec<u8>>, config_json: &str) -> PyResult<Self> {
        let raster = TrackRaster::from_rows(img)?;
        let config = SensorConfig::from_json(config_json)
            .map_err(|e| PyValueError::new_err(format!("Invalid sensor config JSON: {e}")))?;
        Ok(IrSensor {
            inner: SensorArray::new(raster, &config)?,
        })
    }

    /// Place the array for robot pose (x, y) meters, yaw radians.
    fn update(&mut self, x: f64, y: f64, yaw: f64) {
        self.inner.update(x, y, yaw);
    }

    /// Read all sensors: intensities in [0, 1], noise included.
    fn read(&mut self) -> Vec<f64> {
        self.inner.read()
    }

    /// Current sensor positions in image pixel coordinates.
    fn get_photo_pos(&self) -> Vec<(i32, i32)> {
        self.inner
            .photo_positions()
            .iter()
            .map(|p| (p.x, p.y))
            .collect()
    }

    /// Footprint radius of one sensor in pixels.
    fn get_sen_radius(&self) -> i32 {
        self.inner.radius()
    }
}

/// Track engine module, importable from Python.
#[pymodule]
fn track_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(rect_p, m)?)?;
    m.add_function(wrap_pyfunction!(get_rect, m)?)?;
    m.add_function(wrap_pyfunction!(curve_p, m)?)?;
    m.add_function(wrap_pyfunction!(get_curve, m)?)?;
    m.add_function(wrap_pyfunction!(collision_dect, m)?)?;
    m.add_function(wrap_pyfunction!(collision_dect2, m)?)?;
    m.add_class::<IrSensor>()?;
    Ok(())
}
