use std::collections::HashMap;

use uuid::Uuid;

use crate::models::order::OrderStatus;

/// Rendered notification content. Built fresh per send, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyPayload {
    pub event_type: &'static str,
    pub order_id: Uuid,
    pub title: &'static str,
    pub body: &'static str,
    pub extra: Option<String>,
}

impl NotifyPayload {
    fn new(event_type: &'static str, order_id: Uuid, title: &'static str, body: &'static str) -> Self {
        Self {
            event_type,
            order_id,
            title,
            body,
            extra: None,
        }
    }

    fn with_extra(mut self, extra: String) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn data(&self) -> HashMap<String, String> {
        let mut data = HashMap::new();
        data.insert("eventType".to_string(), self.event_type.to_string());
        data.insert("orderId".to_string(), self.order_id.to_string());
        data.insert("title".to_string(), self.title.to_string());
        data.insert("message".to_string(), self.body.to_string());
        if let Some(extra) = &self.extra {
            data.insert("extra".to_string(), extra.clone());
        }
        data
    }
}

/// Offer sent to a candidate courier during a dispatch wave.
pub fn offer_payload(order_id: Uuid) -> NotifyPayload {
    NotifyPayload::new(
        "ORDER_OFFER",
        order_id,
        "New order available",
        "A new order is nearby. Open the app to accept it.",
    )
}

/// Customer-facing copy per status. Statuses without copy are internal
/// bookkeeping and produce no notification.
pub fn customer_payload(
    to: OrderStatus,
    order_id: Uuid,
    courier_id: Option<Uuid>,
) -> Option<NotifyPayload> {
    match to {
        OrderStatus::FindingDriver => Some(NotifyPayload::new(
            "FINDING_DRIVER",
            order_id,
            "Searching for a courier",
            "We are looking for a courier near the pickup point.",
        )),
        OrderStatus::ReassigningDriver => Some(NotifyPayload::new(
            "ORDER_REASSIGNING",
            order_id,
            "Searching for a new courier",
            "We are finding a new courier for your order, please wait.",
        )),
        OrderStatus::DriverAssigned => {
            let courier_id = courier_id?;
            Some(
                NotifyPayload::new(
                    "DRIVER_ASSIGNED",
                    order_id,
                    "Courier found",
                    "A courier accepted your order and is heading to the pickup point.",
                )
                .with_extra(courier_id.to_string()),
            )
        }
        OrderStatus::DriverEnRoutePickup => Some(NotifyPayload::new(
            "DRIVER_EN_ROUTE_PICKUP",
            order_id,
            "Courier heading to pickup",
            "Your courier is on the way to the pickup point.",
        )),
        OrderStatus::ArrivedPickup => Some(NotifyPayload::new(
            "ARRIVED_PICKUP",
            order_id,
            "Courier arrived at pickup",
            "Your courier has arrived at the pickup point.",
        )),
        OrderStatus::PackagePicked => Some(NotifyPayload::new(
            "PICKUP_SUCCESS",
            order_id,
            "Package picked up",
            "Your courier picked up the package and is preparing to deliver it.",
        )),
        OrderStatus::EnRouteDelivery => Some(NotifyPayload::new(
            "EN_ROUTE_DELIVERY",
            order_id,
            "Delivering",
            "Your package is on its way to the destination.",
        )),
        OrderStatus::ArrivedDelivery => Some(NotifyPayload::new(
            "ARRIVED_DELIVERY",
            order_id,
            "Arrived at destination",
            "Your courier has arrived at the delivery address.",
        )),
        OrderStatus::Delivered => Some(NotifyPayload::new(
            "DELIVERED",
            order_id,
            "Delivered",
            "Your order was delivered successfully. Thank you!",
        )),
        OrderStatus::CancelledBySender
        | OrderStatus::CancelledByDriver
        | OrderStatus::CancelledNoDriver
        | OrderStatus::OrderCancelled => Some(NotifyPayload::new(
            "ORDER_CANCELLED",
            order_id,
            "Order cancelled",
            "Your order was cancelled. Please check the order details.",
        )),
        _ => None,
    }
}

/// Courier-facing copy per status, always addressed to a concrete courier.
pub fn courier_payload(
    to: OrderStatus,
    order_id: Uuid,
    courier_id: Option<Uuid>,
) -> Option<NotifyPayload> {
    let courier_id = courier_id?;
    let extra = courier_id.to_string();

    let payload = match to {
        OrderStatus::DriverAssigned => NotifyPayload::new(
            "ASSIGNED_ORDER",
            order_id,
            "You have been assigned an order",
            "Open the app to review and confirm the order.",
        ),
        OrderStatus::DriverEnRoutePickup => NotifyPayload::new(
            "EN_ROUTE_PICKUP",
            order_id,
            "Head to pickup",
            "Please proceed to the pickup point.",
        ),
        OrderStatus::ArrivedPickup => NotifyPayload::new(
            "ARRIVED_PICKUP",
            order_id,
            "Arrived at pickup",
            "You arrived at the pickup point. Contact the sender if needed.",
        ),
        OrderStatus::PackagePicked => NotifyPayload::new(
            "PICKUP_CONFIRMED",
            order_id,
            "Package picked up",
            "Pickup confirmed. Continue to the delivery address.",
        ),
        OrderStatus::EnRouteDelivery => NotifyPayload::new(
            "EN_ROUTE_DELIVERY",
            order_id,
            "Delivering",
            "Please deliver the package to the recipient's address.",
        ),
        OrderStatus::Delivered => NotifyPayload::new(
            "DELIVERED",
            order_id,
            "Delivery complete",
            "You completed this delivery. Thank you!",
        ),
        OrderStatus::ReassigningDriver => NotifyPayload::new(
            "REASSIGNING",
            order_id,
            "Order being reassigned",
            "This order is being offered to another courier. No further action needed.",
        ),
        OrderStatus::CancelledBySender
        | OrderStatus::CancelledByDriver
        | OrderStatus::OrderCancelled => NotifyPayload::new(
            "ORDER_CANCELLED",
            order_id,
            "Order cancelled",
            "This order was cancelled. No further action needed.",
        ),
        _ => return None,
    };

    Some(payload.with_extra(extra))
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{courier_payload, customer_payload, offer_payload};
    use crate::models::order::OrderStatus;

    #[test]
    fn same_status_renders_same_payload() {
        let order_id = Uuid::from_u128(1);
        let first = customer_payload(OrderStatus::Delivered, order_id, None);
        let second = customer_payload(OrderStatus::Delivered, order_id, None);
        assert_eq!(first, second);
    }

    #[test]
    fn bookkeeping_statuses_have_no_copy() {
        let order_id = Uuid::from_u128(2);
        assert!(customer_payload(OrderStatus::PendingPayment, order_id, None).is_none());
        assert!(customer_payload(OrderStatus::DriverIssueReported, order_id, None).is_none());
        assert!(courier_payload(OrderStatus::FindingDriver, order_id, Some(Uuid::from_u128(3))).is_none());
    }

    #[test]
    fn driver_assigned_requires_a_courier() {
        let order_id = Uuid::from_u128(4);
        assert!(customer_payload(OrderStatus::DriverAssigned, order_id, None).is_none());
        assert!(courier_payload(OrderStatus::DriverAssigned, order_id, None).is_none());

        let courier = Uuid::from_u128(5);
        let payload = customer_payload(OrderStatus::DriverAssigned, order_id, Some(courier)).unwrap();
        assert_eq!(payload.extra, Some(courier.to_string()));
    }

    #[test]
    fn payload_data_map_carries_event_fields() {
        let order_id = Uuid::from_u128(6);
        let data = offer_payload(order_id).data();

        assert_eq!(data["eventType"], "ORDER_OFFER");
        assert_eq!(data["orderId"], order_id.to_string());
        assert_eq!(data["title"], "New order available");
        assert!(data.contains_key("message"));
        assert!(!data.contains_key("extra"));
    }
}
