//! Zoom-dependent declutter of map markers.
//!
//! Cities are always drawn. Points of interest only appear once the visible
//! latitude span is at or below [`DECLUTTER_LATITUDE_SPAN`], at which point
//! city labels fade. Nothing is culled by screen bounds.

use crate::models::{City, PointOfInterest, ViewportRegion};

pub const DECLUTTER_LATITUDE_SPAN: f64 = 0.3;
pub const CITY_LABEL_OPACITY: f64 = 1.0;
pub const FADED_CITY_LABEL_OPACITY: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct CityLabel {
    pub city: City,
    pub label_opacity: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleMarkers {
    pub cities: Vec<CityLabel>,
    pub pois: Vec<PointOfInterest>,
}

pub fn is_zoomed_in(region: &ViewportRegion) -> bool {
    region.latitude_span <= DECLUTTER_LATITUDE_SPAN
}

pub fn compute_visible(region: &ViewportRegion, pois: &[PointOfInterest], cities: &[City]) -> VisibleMarkers {
    let zoomed_in = is_zoomed_in(region);
    let label_opacity = if zoomed_in {
        FADED_CITY_LABEL_OPACITY
    } else {
        CITY_LABEL_OPACITY
    };

    VisibleMarkers {
        cities: cities
            .iter()
            .map(|city| CityLabel {
                city: city.clone(),
                label_opacity,
            })
            .collect(),
        pois: if zoomed_in { pois.to_vec() } else { Vec::new() },
    }
}
