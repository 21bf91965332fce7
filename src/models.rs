use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Mean earth radius used for displacement between fixes.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();
        let a = (dlat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().min(1.0).asin();
        EARTH_RADIUS_M * c
    }
}

/// Last known position of the device. Replaced wholesale on every update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: OffsetDateTime,
}

impl UserPosition {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "T", alias = "Tourism", alias = "tourism")]
    Tourism,
    #[serde(rename = "M", alias = "Museums", alias = "museums")]
    Museums,
    #[serde(rename = "A", alias = "Art", alias = "art")]
    Art,
    #[serde(rename = "F", alias = "Food", alias = "food")]
    Food,
    #[serde(rename = "S", alias = "Special", alias = "special")]
    Special,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Tourism,
        Category::Museums,
        Category::Art,
        Category::Food,
        Category::Special,
    ];

    /// One-letter code stored by the backend.
    pub fn code(self) -> &'static str {
        match self {
            Category::Tourism => "T",
            Category::Museums => "M",
            Category::Art => "A",
            Category::Food => "F",
            Category::Special => "S",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "T" | "Tourism" | "tourism" => Ok(Category::Tourism),
            "M" | "Museums" | "museums" => Ok(Category::Museums),
            "A" | "Art" | "art" => Ok(Category::Art),
            "F" | "Food" | "food" => Ok(Category::Food),
            "S" | "Special" | "special" => Ok(Category::Special),
            _ => Err(anyhow::anyhow!("Invalid category value: {}", value)),
        }
    }
}

/// A category-tagged location as served by `GET /locations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: i64,
    pub category: Category,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl PointOfInterest {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Body of `POST /locations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPointOfInterest {
    pub category: Category,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub title: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Visible extent of the map: a center plus non-negative spans in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRegion {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub latitude_span: f64,
    pub longitude_span: f64,
}

impl ViewportRegion {
    /// Negative spans are clamped to zero.
    pub fn new(center_latitude: f64, center_longitude: f64, latitude_span: f64, longitude_span: f64) -> Self {
        Self {
            center_latitude,
            center_longitude,
            latitude_span: latitude_span.max(0.0),
            longitude_span: longitude_span.max(0.0),
        }
    }

    /// Square region with the same span on both axes.
    pub fn centered(center: Coordinate, span: f64) -> Self {
        Self::new(center.latitude, center.longitude, span, span)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.center_latitude, self.center_longitude)
    }
}
