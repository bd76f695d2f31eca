//! Checkout: cart → immutable order + fulfillment message
//!
//! Composing a checkout freezes the cart into an [`Order`] snapshot and
//! renders the hand-off message in one pass. The message layout is a
//! contract with the fulfillment flow and must stay byte-stable:
//!
//! ```text
//! Nuevo pedido de {name}
//! Teléfono: {phone}
//! Dirección: {address}        (only when an address was given)
//!
//! {qty}x {line name} : {subtotal}
//!   - {qty}x {content label}  (only under bundle lines)
//!
//! Total: {amount}
//! ```
//!
//! Amounts always carry two decimals; there is no trailing newline.

use tracing::debug;

use crate::money;
use shared::models::{CartLine, CartLineSnapshot, Order, OrderStatus};
use shared::util::{now_millis, snowflake_id};
use shared::{StoreError, StoreResult};

/// Customer fields collected at checkout
#[derive(Debug, Clone, Default)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

/// Result of composing a checkout: the frozen order plus its message
#[derive(Debug, Clone)]
pub struct Checkout {
    pub order: Order,
    pub message: String,
}

impl Checkout {
    /// Freeze the cart into an order and render the fulfillment message
    ///
    /// The order captures line prices and the total as they are right now;
    /// later catalog or bundle edits never touch a placed order.
    pub fn compose(lines: &[CartLine], customer: &CustomerInfo) -> StoreResult<Self> {
        if lines.is_empty() {
            return Err(StoreError::validation("cannot check out an empty cart"));
        }
        let name = customer.name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("customer name is required"));
        }
        let phone = customer.phone.trim();
        if phone.is_empty() {
            return Err(StoreError::validation("customer phone is required"));
        }
        let address = customer
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        let snapshots: Vec<CartLineSnapshot> = lines.iter().map(CartLineSnapshot::from).collect();
        let total = money::round_amount(snapshots.iter().map(|s| s.subtotal()).sum());

        let order = Order {
            id: snowflake_id().to_string(),
            created_at: now_millis(),
            customer_name: name.to_string(),
            phone: phone.to_string(),
            address,
            lines: snapshots,
            total,
            status: OrderStatus::default(),
            notified_via_messenger: false,
        };
        let message = build_message(&order);
        debug!(order_id = %order.id, lines = order.lines.len(), total = %order.total, "checkout composed");
        Ok(Self { order, message })
    }
}

/// Deep link that opens the messenger with the order message prefilled
pub fn fulfillment_link(store_phone: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        store_phone,
        urlencoding::encode(message)
    )
}

/// Render the order message from the frozen snapshots
fn build_message(order: &Order) -> String {
    let mut out = String::new();
    out.push_str(&format!("Nuevo pedido de {}\n", order.customer_name));
    out.push_str(&format!("Teléfono: {}\n", order.phone));
    if let Some(address) = &order.address {
        out.push_str(&format!("Dirección: {}\n", address));
    }
    out.push('\n');
    for line in &order.lines {
        out.push_str(&format!(
            "{}x {} : {}\n",
            line.quantity,
            line.display_name,
            money::format_amount(line.subtotal())
        ));
        if let Some(contents) = &line.bundle_contents {
            for content in contents {
                out.push_str(&format!("  - {}x {}\n", content.quantity(), content.label()));
            }
        }
    }
    out.push('\n');
    out.push_str(&format!("Total: {}", money::format_amount(order.total)));
    out
}
