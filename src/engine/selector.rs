use uuid::Uuid;

use crate::engine::gate::AssignmentGate;
use crate::geo::GeoIndex;
use crate::models::courier::GeoPoint;
use crate::notify::tokens::TokenStore;

/// Ranked candidates for one dispatch attempt: radius query (nearest first),
/// minus couriers that are offline or already delivering, capped.
pub fn select_candidates(
    geo: &GeoIndex,
    tokens: &TokenStore,
    gate: &AssignmentGate,
    pickup: &GeoPoint,
    radius_km: f64,
    cap: usize,
) -> Vec<Uuid> {
    geo.radius_query(pickup, radius_km)
        .into_iter()
        .map(|(courier_id, _)| courier_id)
        .filter(|courier_id| tokens.is_live(*courier_id) && !gate.is_delivering(*courier_id))
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::select_candidates;
    use crate::engine::gate::AssignmentGate;
    use crate::geo::GeoIndex;
    use crate::models::courier::GeoPoint;
    use crate::notify::tokens::{Role, TokenStore};

    struct Fixture {
        geo: GeoIndex,
        tokens: TokenStore,
        gate: AssignmentGate,
        pickup: GeoPoint,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                geo: GeoIndex::new(),
                tokens: TokenStore::new(300),
                gate: AssignmentGate::new(),
                pickup: GeoPoint { lat: 16.06, lng: 108.22 },
            }
        }

        fn add_courier(&self, seed: u128, lat: f64, lng: f64, live: bool) -> Uuid {
            let id = Uuid::from_u128(seed);
            self.geo.upsert(id, GeoPoint { lat, lng });
            if live {
                self.tokens.register(Role::Courier, id, format!("tok-{seed}"));
            }
            id
        }
    }

    #[test]
    fn nearest_live_couriers_come_first() {
        let fx = Fixture::new();
        let far = fx.add_courier(1, 16.10, 108.22, true);
        let near = fx.add_courier(2, 16.061, 108.22, true);

        let candidates =
            select_candidates(&fx.geo, &fx.tokens, &fx.gate, &fx.pickup, 50.0, 100);
        assert_eq!(candidates, vec![near, far]);
    }

    #[test]
    fn offline_courier_is_excluded_even_if_nearest() {
        let fx = Fixture::new();
        let offline = fx.add_courier(1, 16.0601, 108.22, false);
        let live = fx.add_courier(2, 16.10, 108.22, true);

        let candidates =
            select_candidates(&fx.geo, &fx.tokens, &fx.gate, &fx.pickup, 50.0, 100);
        assert_eq!(candidates, vec![live]);
        assert!(!candidates.contains(&offline));
    }

    #[test]
    fn delivering_courier_is_excluded() {
        let fx = Fixture::new();
        let delivering = fx.add_courier(1, 16.0601, 108.22, true);
        let free = fx.add_courier(2, 16.10, 108.22, true);
        fx.gate.try_assign(Uuid::from_u128(99), delivering);

        let candidates =
            select_candidates(&fx.geo, &fx.tokens, &fx.gate, &fx.pickup, 50.0, 100);
        assert_eq!(candidates, vec![free]);
    }

    #[test]
    fn cap_bounds_fanout() {
        let fx = Fixture::new();
        for seed in 0..10 {
            fx.add_courier(seed + 1, 16.06 + 0.001 * seed as f64, 108.22, true);
        }

        let candidates = select_candidates(&fx.geo, &fx.tokens, &fx.gate, &fx.pickup, 50.0, 3);
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn empty_when_nobody_is_in_range() {
        let fx = Fixture::new();
        fx.add_courier(1, 21.03, 105.85, true);

        let candidates =
            select_candidates(&fx.geo, &fx.tokens, &fx.gate, &fx.pickup, 50.0, 100);
        assert!(candidates.is_empty());
    }
}
