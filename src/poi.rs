//! Host POI value types.
//!
//! The host platform owns POI identity and persistence; these structs are
//! transient mirrors the engine holds between repository calls. Nothing in
//! here survives a host-side mutation without re-derivation.

pub type PoiId = u64;
pub type PoiTypeId = u64;

/// A point in host coordinates, `[x, y, z]`.
pub type Point3 = [f64; 3];

/// A host POI type. In this engine's usage a type encodes one alert state
/// of one sensor class ("Temperature Alert"), and its group names the
/// sensor class itself ("Temperature").
#[derive(Debug, Clone, PartialEq)]
pub struct PoiType {
    pub id: PoiTypeId,
    pub title: String,
    pub group: String,
}

/// A host POI mirrored into the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Poi {
    pub id: PoiId,
    pub title: String,
    pub poi_type: PoiType,
    /// Free-text field holding the serialized sensor binding.
    pub custom_data: String,
    /// Position in global coordinates.
    pub position: Point3,
}

impl Poi {
    /// The POI's group name — the sensor-class key.
    pub fn group(&self) -> &str {
        &self.poi_type.group
    }
}

/// Spatial query against the host repository. With no centre the filter
/// matches every POI (wide mode).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoiFilter {
    pub center: Option<Point3>,
    pub radius: Option<f64>,
}

impl PoiFilter {
    pub fn within(center: Point3, radius: f64) -> Self {
        Self {
            center: Some(center),
            radius: Some(radius),
        }
    }

    /// Whether `position` passes the filter.
    pub fn matches(&self, position: Point3) -> bool {
        match (self.center, self.radius) {
            (Some(c), Some(r)) => {
                let dx = position[0] - c[0];
                let dy = position[1] - c[1];
                let dz = position[2] - c[2];
                (dx * dx + dy * dy + dz * dz).sqrt() <= r
            }
            _ => true,
        }
    }
}

/// Rewrite a POI title to carry the latest reading.
///
/// Titles follow the pattern `"{value} {unit}-{suffix}"`. If the current
/// title already matches `<anything>-<suffix>` only the suffix is kept,
/// otherwise the whole title becomes the suffix.
pub fn format_value_title(current: &str, value: f64, unit: &str) -> String {
    let suffix = match current.split_once('-') {
        Some((_, rest)) if !rest.is_empty() => rest,
        _ => current,
    };
    format!("{value} {unit}-{suffix}")
}
