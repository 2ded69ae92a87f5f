use geo::Point;

/// Bounding box structure in WGS84 degrees (EPSG:4326)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64, // min longitude
    pub min_y: f64, // min latitude
    pub max_x: f64, // max longitude
    pub max_y: f64, // max latitude
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Square box of `half_width` degrees on each side of `center`.
    ///
    /// The half-width is applied in raw degrees on both axes, so the box
    /// narrows in metres as latitude grows.
    pub fn around(center: Point<f64>, half_width: f64) -> Self {
        BoundingBox::new(
            center.x() - half_width,
            center.y() - half_width,
            center.x() + half_width,
            center.y() + half_width,
        )
    }

    /// Overpass QL bbox filter: `south,west,north,east`
    pub fn to_overpass(&self) -> String {
        format!("{},{},{},{}", self.min_y, self.min_x, self.max_y, self.max_x)
    }
}
