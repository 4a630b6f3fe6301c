use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::models::assignment::AssignmentRecord;

/// Keyed create-if-absent records, one per order; presence of a record is
/// the single source of truth for "is this order still open". Also tracks
/// the per-courier "currently delivering" marker set alongside a win.
#[derive(Default)]
pub struct AssignmentGate {
    records: DashMap<Uuid, AssignmentRecord>,
    delivering: DashMap<Uuid, Uuid>,
}

impl AssignmentGate {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            delivering: DashMap::new(),
        }
    }

    /// True iff this call created the record, i.e. the courier won the race.
    /// The winner is also marked as delivering the order.
    pub fn try_assign(&self, order_id: Uuid, courier_id: Uuid) -> bool {
        match self.records.entry(order_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(AssignmentRecord {
                    order_id,
                    courier_id,
                    assigned_at: Utc::now(),
                });
                self.delivering.insert(courier_id, order_id);
                true
            }
        }
    }

    pub fn is_assigned(&self, order_id: Uuid) -> bool {
        self.records.contains_key(&order_id)
    }

    pub fn assignment(&self, order_id: Uuid) -> Option<AssignmentRecord> {
        self.records.get(&order_id).map(|entry| entry.value().clone())
    }

    /// Reopens an order for offers. Used when an order enters reassignment.
    pub fn clear_assignment(&self, order_id: Uuid) {
        self.records.remove(&order_id);
    }

    pub fn is_delivering(&self, courier_id: Uuid) -> bool {
        self.delivering.contains_key(&courier_id)
    }

    pub fn clear_delivering(&self, courier_id: Uuid) {
        self.delivering.remove(&courier_id);
    }

    pub fn assignment_count(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use uuid::Uuid;

    use super::AssignmentGate;

    #[test]
    fn first_writer_wins() {
        let gate = AssignmentGate::new();
        let order = Uuid::from_u128(1);

        assert!(gate.try_assign(order, Uuid::from_u128(10)));
        assert!(!gate.try_assign(order, Uuid::from_u128(11)));

        let record = gate.assignment(order).unwrap();
        assert_eq!(record.courier_id, Uuid::from_u128(10));
    }

    #[test]
    fn winner_is_marked_delivering() {
        let gate = AssignmentGate::new();
        let order = Uuid::from_u128(2);
        let winner = Uuid::from_u128(20);
        let loser = Uuid::from_u128(21);

        gate.try_assign(order, winner);
        gate.try_assign(order, loser);

        assert!(gate.is_delivering(winner));
        assert!(!gate.is_delivering(loser));

        gate.clear_delivering(winner);
        assert!(!gate.is_delivering(winner));
    }

    #[test]
    fn clear_assignment_reopens_order() {
        let gate = AssignmentGate::new();
        let order = Uuid::from_u128(3);

        gate.try_assign(order, Uuid::from_u128(30));
        gate.clear_assignment(order);

        assert!(!gate.is_assigned(order));
        assert!(gate.try_assign(order, Uuid::from_u128(31)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_accepts_produce_exactly_one_winner() {
        let gate = Arc::new(AssignmentGate::new());
        let order = Uuid::from_u128(4);
        let wins = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for seed in 0..32u128 {
            let gate = gate.clone();
            let wins = wins.clone();
            handles.push(tokio::spawn(async move {
                if gate.try_assign(order, Uuid::from_u128(100 + seed)) {
                    wins.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert_eq!(gate.assignment_count(), 1);
    }
}
