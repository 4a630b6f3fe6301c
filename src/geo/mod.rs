use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::courier::{CourierLocationEntry, GeoPoint};

const EARTH_RADIUS_KM: f64 = 6_371.0;

// Location fixes closer than this in both space and time are dropped.
const MIN_MOVE_METERS: f64 = 20.0;
const MIN_INTERVAL_MS: i64 = 3_000;

pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    EARTH_RADIUS_KM * central_angle
}

/// Last known location per courier, overwritten in place. Radius queries are
/// answered nearest-first; no history is kept.
#[derive(Default)]
pub struct GeoIndex {
    entries: DashMap<Uuid, CourierLocationEntry>,
}

impl GeoIndex {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Stores the latest fix for a courier. Returns false when the update is
    /// insignificant (moved less than 20 m within 3 s of the previous fix)
    /// and was skipped.
    pub fn upsert(&self, courier_id: Uuid, location: GeoPoint) -> bool {
        let now = Utc::now();

        if let Some(prev) = self.entries.get(&courier_id) {
            let moved_meters = haversine_km(&prev.location, &location) * 1_000.0;
            let elapsed_ms = (now - prev.updated_at).num_milliseconds();
            if moved_meters < MIN_MOVE_METERS && elapsed_ms < MIN_INTERVAL_MS {
                return false;
            }
        }

        self.entries.insert(
            courier_id,
            CourierLocationEntry {
                courier_id,
                location,
                updated_at: now,
            },
        );
        true
    }

    pub fn latest(&self, courier_id: Uuid) -> Option<CourierLocationEntry> {
        self.entries.get(&courier_id).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, courier_id: Uuid) {
        self.entries.remove(&courier_id);
    }

    /// All couriers within `radius_km` of `center`, nearest first.
    pub fn radius_query(&self, center: &GeoPoint, radius_km: f64) -> Vec<(Uuid, f64)> {
        let mut hits: Vec<(Uuid, f64)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let distance_km = haversine_km(&entry.location, center);
                (distance_km <= radius_km).then_some((entry.courier_id, distance_km))
            })
            .collect();

        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        hits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
