/// Axis-aligned latitude/longitude rectangle in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Corners may be given in either order.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> GeoBounds {
        GeoBounds {
            south: south.min(north),
            west: west.min(east),
            north: south.max(north),
            east: west.max(east),
        }
    }

    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        self.south <= lat && lat <= self.north && self.west <= lon && lon <= self.east
    }

    /// True when the overlap has positive area. Rectangles that only share
    /// an edge or a corner do not intersect.
    pub fn intersects(&self, other: &GeoBounds) -> bool {
        self.south < other.north
            && other.south < self.north
            && self.west < other.east
            && other.west < self.east
    }

    /// `(lat, lon)` of the middle of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_corners() {
        let b = GeoBounds::new(35.0, 136.0, 34.0, 135.0);
        assert_eq!(b, GeoBounds::new(34.0, 135.0, 35.0, 136.0));
        assert_eq!(b.south, 34.0);
        assert_eq!(b.east, 136.0);
    }

    #[test]
    fn test_intersects() {
        let a = GeoBounds::new(34.0, 135.0, 35.0, 136.0);
        assert!(a.intersects(&GeoBounds::new(34.5, 135.5, 36.0, 137.0)));
        assert!(a.intersects(&GeoBounds::new(34.2, 135.2, 34.4, 135.4)));
        assert!(!a.intersects(&GeoBounds::new(36.0, 135.0, 37.0, 136.0)));
    }

    #[test]
    fn test_shared_edge_is_not_intersection() {
        let a = GeoBounds::new(34.0, 135.0, 35.0, 136.0);
        let east_neighbour = GeoBounds::new(34.0, 136.0, 35.0, 137.0);
        let corner = GeoBounds::new(35.0, 136.0, 36.0, 137.0);
        assert!(!a.intersects(&east_neighbour));
        assert!(!east_neighbour.intersects(&a));
        assert!(!a.intersects(&corner));
    }

    #[test]
    fn test_contains_and_center() {
        let a = GeoBounds::new(34.0, 135.0, 35.0, 136.0);
        assert_eq!(a.center(), (34.5, 135.5));
        assert!(a.contains_point(34.0, 135.0));
        assert!(!a.contains_point(33.99, 135.5));
    }
}
