//! Marker views handed to the map widget.

use crate::models::Coordinate;
use crate::style::{CategoryStyles, Color};
use crate::visibility::VisibleMarkers;

/// Used when a category has no style entry.
const FALLBACK_COLOR: Color = Color { r: 0x9E, g: 0x9E, b: 0x9E };

#[derive(Debug, Clone, PartialEq)]
pub struct Callout {
    pub title: String,
    pub subtitle: String,
    /// Subtitle tint; `None` renders the default grey.
    pub subtitle_color: Option<Color>,
}

/// Colored dot for a point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiMarker {
    pub key: String,
    pub coordinate: Coordinate,
    pub color: Color,
    pub callout: Callout,
}

/// Text label for a city.
#[derive(Debug, Clone, PartialEq)]
pub struct CityMarker {
    pub key: String,
    pub coordinate: Coordinate,
    pub label: String,
    pub label_opacity: f64,
    pub callout: Callout,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    pub cities: Vec<CityMarker>,
    pub pois: Vec<PoiMarker>,
}

impl RenderFrame {
    pub fn build(visible: &VisibleMarkers, styles: &CategoryStyles) -> Self {
        let cities = visible
            .cities
            .iter()
            .map(|label| CityMarker {
                key: format!("city-{}", label.city.id),
                coordinate: label.city.coordinate(),
                label: label.city.title.clone(),
                label_opacity: label.label_opacity,
                callout: Callout {
                    title: label.city.title.clone(),
                    subtitle: label.city.country.clone(),
                    subtitle_color: None,
                },
            })
            .collect();

        let pois = visible
            .pois
            .iter()
            .map(|poi| {
                let style = styles.get(poi.category);
                let color = style.map(|s| s.color).unwrap_or(FALLBACK_COLOR);
                PoiMarker {
                    key: format!("location-{}", poi.id),
                    coordinate: poi.coordinate(),
                    color,
                    callout: Callout {
                        title: poi.title.clone(),
                        subtitle: style.map(|s| s.title.clone()).unwrap_or_default(),
                        subtitle_color: style.map(|s| s.color),
                    },
                }
            })
            .collect();

        Self { cities, pois }
    }
}
