//! Order model
//!
//! An order is an immutable snapshot of a cart at checkout time. Its total
//! and line prices are computed once and never recomputed, so later catalog
//! price edits cannot retroactively alter a placed order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bundle::BundleContentRef;
use super::cart_line::{CartLine, LineKind};

/// Order status
///
/// Persisted with the literal store tokens. The lifecycle
/// `pendiente → en proceso → entregado` (with cancellation from either
/// non-terminal state) is advisory: transitions are enforced by UI
/// affordances, not rejected here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en proceso")]
    InProgress,
    #[serde(rename = "entregado")]
    Delivered,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl OrderStatus {
    /// Terminal states have no outgoing transitions in the advisory flow
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether moving to `next` follows the advisory lifecycle
    pub fn follows_lifecycle(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::InProgress, Self::Delivered)
                | (Self::Pending | Self::InProgress, Self::Cancelled)
        )
    }

    /// The persisted store token
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::InProgress => "en proceso",
            Self::Delivered => "entregado",
            Self::Cancelled => "cancelado",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Frozen copy of a cart line taken at checkout time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineSnapshot {
    pub line_id: String,
    pub kind: LineKind,
    pub source_id: String,
    pub display_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_contents: Option<Vec<BundleContentRef>>,
}

impl CartLineSnapshot {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

impl From<&CartLine> for CartLineSnapshot {
    fn from(line: &CartLine) -> Self {
        Self {
            line_id: line.line_id.clone(),
            kind: line.kind,
            source_id: line.source_id.clone(),
            display_name: line.display_name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            bundle_contents: line.bundle_contents.clone(),
        }
    }
}

/// Order entity (persisted record)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    /// Creation timestamp (UTC millis)
    pub created_at: i64,
    #[serde(rename = "nombre_cliente")]
    pub customer_name: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "productos")]
    pub lines: Vec<CartLineSnapshot>,
    /// Σ(line unit price × quantity), fixed at creation
    pub total: Decimal,
    #[serde(rename = "estado")]
    pub status: OrderStatus,
    /// Whether the fulfillment message hand-off occurred
    #[serde(rename = "enviado_whatsapp")]
    pub notified_via_messenger: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tokens_are_the_store_literals() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pendiente\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"en proceso\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Delivered).unwrap(),
            "\"entregado\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"cancelado\""
        );
        let status: OrderStatus = serde_json::from_str("\"en proceso\"").unwrap();
        assert_eq!(status, OrderStatus::InProgress);
    }

    #[test]
    fn test_advisory_lifecycle() {
        use OrderStatus::*;
        assert!(Pending.follows_lifecycle(InProgress));
        assert!(InProgress.follows_lifecycle(Delivered));
        assert!(Pending.follows_lifecycle(Cancelled));
        assert!(InProgress.follows_lifecycle(Cancelled));

        assert!(!Pending.follows_lifecycle(Delivered));
        assert!(!Delivered.follows_lifecycle(Pending));
        assert!(!Cancelled.follows_lifecycle(InProgress));
        assert!(Delivered.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Pending.is_terminal());
    }

    #[test]
    fn test_order_serde_tokens() {
        let order = Order {
            id: "42".to_string(),
            created_at: 1_700_000_000_000,
            customer_name: "Ana".to_string(),
            phone: "+56911111111".to_string(),
            address: None,
            lines: vec![],
            total: "95.00".parse().unwrap(),
            status: OrderStatus::Pending,
            notified_via_messenger: false,
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["nombre_cliente"], "Ana");
        assert_eq!(json["estado"], "pendiente");
        assert_eq!(json["enviado_whatsapp"], false);
        assert!(json.get("productos").is_some());
        assert!(json.get("telefono").is_some());
        assert!(json.get("direccion").is_some());
    }
}
