use std::fmt;

const R: f64 = 6_371_000.0;
const NINETY: f64 = 90.0;
const ONE_EIGHTY: f64 = NINETY * 2.0;

/// Geographic coordinate. `x=lng` and `y=lat` in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { x: lng, y: lat }
    }

    pub fn from_lat_lng(lat: f64, lng: f64) -> Self {
        Self { x: lng, y: lat }
    }

    /// Haversine distance in meters.
    pub fn dist(self, rhs: &Self) -> f64 {
        let (lat1, lat2) = (self.y.to_radians(), rhs.y.to_radians());
        let dlat = (rhs.y - self.y).to_radians();
        let dlng = (rhs.x - self.x).to_radians();
        let s1 = (dlat / 2.0).sin();
        let s2 = (dlng / 2.0).sin();
        let h = s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2;
        2.0 * R * h.sqrt().asin()
    }

    pub fn lat(&self) -> f64 {
        self.y
    }

    pub fn lng(&self) -> f64 {
        self.x
    }

    pub(crate) fn is_valid(self) -> bool {
        self.y.is_finite()
            && self.x.is_finite()
            && (-NINETY..=NINETY).contains(&self.y)
            && (-ONE_EIGHTY..=ONE_EIGHTY).contains(&self.x)
    }

    /// Bit-pattern key for coordinate identity lookups.
    pub(crate) fn bits(self) -> (u64, u64) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(f, "{},{}", b1.format(self.y), b2.format(self.x))
    }
}
