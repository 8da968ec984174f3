use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Pixel bounding box as produced by the upstream tracker.
///
/// Stored in TLBR format: top-left x, top-left y, bottom-right x,
/// bottom-right y. Serialized as a plain `[x1, y1, x2, y2]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[i32; 4]", into = "[i32; 4]")]
pub struct BBox {
    /// Top-left x coordinate
    pub x1: i32,
    /// Top-left y coordinate
    pub y1: i32,
    /// Bottom-right x coordinate
    pub x2: i32,
    /// Bottom-right y coordinate
    pub y2: i32,
}

impl BBox {
    /// Create a box from TLBR coordinates, rejecting inverted corners.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, String> {
        if x1 > x2 || y1 > y2 {
            return Err(format!(
                "inverted bbox [{x1}, {y1}, {x2}, {y2}]: expected x1 <= x2 and y1 <= y2"
            ));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [i32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Widened to `i64` so any pair of `i32` corners fits.
    #[inline]
    pub fn width(&self) -> i64 {
        i64::from(self.x2) - i64::from(self.x1)
    }

    #[inline]
    pub fn height(&self) -> i64 {
        i64::from(self.y2) - i64::from(self.y1)
    }

    /// Exact center of the box, used for merge distance checks.
    #[inline]
    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (f64::from(self.x1) + f64::from(self.x2)) / 2.0,
            (f64::from(self.y1) + f64::from(self.y2)) / 2.0,
        )
    }

    /// Center snapped to the pixel grid (floor division), used for path drawing.
    #[inline]
    pub fn pixel_center(&self) -> Point2<i32> {
        Point2::new(floor_mean(self.x1, self.x2), floor_mean(self.y1, self.y2))
    }

    /// Euclidean distance between this box's center and another's.
    pub fn center_distance(&self, other: &BBox) -> f64 {
        nalgebra::distance(&self.center(), &other.center())
    }
}

/// Floor of the mean of two coordinates; always lies between them.
fn floor_mean(a: i32, b: i32) -> i32 {
    (i64::from(a) + i64::from(b)).div_euclid(2) as i32
}

impl TryFrom<[i32; 4]> for BBox {
    type Error = String;

    fn try_from([x1, y1, x2, y2]: [i32; 4]) -> Result<Self, Self::Error> {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<BBox> for [i32; 4] {
    fn from(bbox: BBox) -> Self {
        bbox.to_tlbr()
    }
}
