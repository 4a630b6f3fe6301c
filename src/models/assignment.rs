use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Created exactly once per order by whichever courier wins the offer race.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentRecord {
    pub order_id: Uuid,
    pub courier_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum DispatchEvent {
    OfferSent { order_id: Uuid, courier_id: Uuid },
    Assigned { order_id: Uuid, courier_id: Uuid },
}
