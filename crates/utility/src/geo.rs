pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Rough length of one degree of latitude. Slightly below the true value
/// (~111.19 km), so boxes built from it err on the large side.
pub const KM_PER_DEGREE_LATITUDE: f64 = 111.0;

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Whether the pair is a finite point on the globe.
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude)
        && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude)
}

/// Great-circle distance in kilometers.
pub fn haversine_km(latitude_1: f64, longitude_1: f64, latitude_2: f64, longitude_2: f64) -> f64 {
    let lat1_rad = latitude_1.to_radians();
    let lat2_rad = latitude_2.to_radians();
    let dlat = (latitude_2 - latitude_1).to_radians();
    let dlon = (longitude_2 - longitude_1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // round-off can push `a` just outside [0, 1] for antipodal points
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Axis-aligned box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lng..=self.max_lng).contains(&longitude)
    }

    pub fn spans_all_longitudes(&self) -> bool {
        self.min_lng <= -MAX_LONGITUDE && self.max_lng >= MAX_LONGITUDE
    }
}

/// Box around a center that contains every point within `radius_km`.
///
/// Only meant as a cheap pre-filter: corners of the box lie outside the
/// radius. Boxes reaching a pole or crossing the antimeridian fall back to the
/// full longitude range instead of wrapping.
pub fn bounding_box(latitude: f64, longitude: f64, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / KM_PER_DEGREE_LATITUDE;
    let min_lat = latitude - lat_delta;
    let max_lat = latitude + lat_delta;

    let full_longitudes = BoundingBox {
        min_lat: min_lat.max(-MAX_LATITUDE),
        max_lat: max_lat.min(MAX_LATITUDE),
        min_lng: -MAX_LONGITUDE,
        max_lng: MAX_LONGITUDE,
    };

    if min_lat <= -MAX_LATITUDE || max_lat >= MAX_LATITUDE {
        return full_longitudes;
    }

    // meridians converge towards the poles, so the circle is widest along
    // its poleward edge rather than at the center
    let poleward_lat = min_lat.abs().max(max_lat.abs());
    let lng_delta = radius_km / (KM_PER_DEGREE_LATITUDE * poleward_lat.to_radians().cos());
    let min_lng = longitude - lng_delta;
    let max_lng = longitude + lng_delta;
    if !lng_delta.is_finite() || min_lng < -MAX_LONGITUDE || max_lng > MAX_LONGITUDE {
        return full_longitudes;
    }

    BoundingBox {
        min_lat,
        max_lat,
        min_lng,
        max_lng,
    }
}
