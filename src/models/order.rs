use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::courier::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    PendingPayment,
    FindingDriver,
    DriverAssigned,
    DriverEnRoutePickup,
    ArrivedPickup,
    PickupAttemptFailed,
    PickupFailed,
    PackagePicked,
    EnRouteDelivery,
    ArrivedDelivery,
    DeliveryAttemptFailed,
    DeliveryFailed,
    Delivered,
    ReturningToSender,
    Returned,
    DriverIssueReported,
    ReassigningDriver,
    CancelledBySender,
    CancelledByDriver,
    CancelledNoDriver,
    OrderCancelled,
}

impl OrderStatus {
    /// Statuses after which the courier is no longer delivering this order.
    pub fn ends_delivery_for_courier(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered
                | OrderStatus::DeliveryFailed
                | OrderStatus::Returned
                | OrderStatus::ReassigningDriver
                | OrderStatus::CancelledBySender
                | OrderStatus::CancelledByDriver
                | OrderStatus::CancelledNoDriver
                | OrderStatus::OrderCancelled
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreated {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub pickup: GeoPoint,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub old_courier_id: Option<Uuid>,
    pub new_courier_id: Option<Uuid>,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderRecord {
    pub order_id: Uuid,
    pub customer_id: Uuid,
    pub pickup: GeoPoint,
    pub created_at: DateTime<Utc>,
}
