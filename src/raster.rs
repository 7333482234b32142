//! Rasterized track image used for sensor sampling.
//!
//! The raster is a row-major byte grid, immutable after construction.
//! World coordinates map to pixels with the origin at the image center
//! and the y axis flipped (rows grow downward):
//!
//! ```text
//! px = width / 2  + round(x * ppm)
//! py = height / 2 - round(y * ppm)
//! ```
//!
//! Sampling outside the grid yields 0. With the reflectance convention
//! (0 = dark, 255 = bright) that makes everything beyond the image edge
//! read as track-dark; downstream training behavior depends on this
//! polarity, so it is part of the contract.

use crate::error::{EngineError, Result};
use crate::types::{PixelPoint, Point2D};

#[derive(Debug, Clone)]
pub struct TrackRaster {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl TrackRaster {
    /// Build a raster from rows of reflectance bytes.
    ///
    /// The input must be a proper 2D grid: at least one row, at least
    /// one column, and every row the same length.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        let height = rows.len();
        if height == 0 {
            return Err(EngineError::RasterDimension("image has no rows".into()));
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(EngineError::RasterDimension("image has no columns".into()));
        }
        let mut data = Vec::with_capacity(width * height);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(EngineError::RasterDimension(format!(
                    "row {i} has {} columns, expected {width}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(TrackRaster { data, width, height })
    }

    /// Build a raster from a flat row-major buffer.
    pub fn from_flat(data: Vec<u8>, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(EngineError::RasterDimension(format!(
                "buffer of {} bytes does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(TrackRaster { data, width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reflectance at pixel (x, y); 0 for any out-of-bounds coordinate.
    pub fn sample(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return 0;
        }
        self.data[x as usize + self.width * y as usize]
    }

    /// Map a world-space point (meters) to pixel coordinates.
    pub fn to_pixel(&self, p: Point2D, ppm: u32) -> PixelPoint {
        let ppm = ppm as f64;
        PixelPoint::new(
            self.width as i32 / 2 + (p.x * ppm).round() as i32,
            self.height as i32 / 2 - (p.y * ppm).round() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: usize, height: usize) -> TrackRaster {
        let rows = (0..height)
            .map(|y| (0..width).map(|x| (((x + y) % 2) * 255) as u8).collect())
            .collect();
        TrackRaster::from_rows(rows).expect("raster")
    }

    #[test]
    fn rejects_malformed_grids() {
        assert!(TrackRaster::from_rows(vec![]).is_err());
        assert!(TrackRaster::from_rows(vec![vec![]]).is_err());
        assert!(TrackRaster::from_rows(vec![vec![0, 1], vec![0]]).is_err());
        assert!(TrackRaster::from_flat(vec![0; 5], 2, 3).is_err());
    }

    #[test]
    fn sample_in_bounds() {
        let r = checker(4, 3);
        assert_eq!(r.sample(0, 0), 0);
        assert_eq!(r.sample(1, 0), 255);
        assert_eq!(r.sample(0, 1), 255);
        assert_eq!(r.sample(3, 2), 255);
    }

    #[test]
    fn sample_out_of_bounds_is_dark() {
        let r = TrackRaster::from_flat(vec![255; 12], 4, 3).expect("raster");
        assert_eq!(r.sample(-1, 0), 0);
        assert_eq!(r.sample(0, -1), 0);
        assert_eq!(r.sample(4, 0), 0);
        assert_eq!(r.sample(0, 3), 0);
    }

    #[test]
    fn world_origin_maps_to_center() {
        let r = checker(100, 60);
        let p = r.to_pixel(Point2D::new(0.0, 0.0), 500);
        assert_eq!(p, PixelPoint::new(50, 30));
    }

    #[test]
    fn y_axis_is_flipped() {
        let r = checker(100, 60);
        let up = r.to_pixel(Point2D::new(0.0, 0.02), 500);
        assert_eq!(up, PixelPoint::new(50, 20));
        let right = r.to_pixel(Point2D::new(0.02, 0.0), 500);
        assert_eq!(right, PixelPoint::new(60, 30));
    }

    #[test]
    fn odd_dimensions_use_integer_center() {
        let r = checker(101, 61);
        let p = r.to_pixel(Point2D::new(0.0, 0.0), 500);
        assert_eq!(p, PixelPoint::new(50, 30));
    }
}
