//! Cart line model
//!
//! A cart line is the addressable, quantity-bearing form of anything the
//! storefront sells: a catalog item by the unit, the same item by the box,
//! or a curated bundle. The line id is a pure function of (source id, kind)
//! so a box purchase never silently increments a unit purchase.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bundle::Bundle;
use super::catalog::CatalogItem;
use crate::error::{StoreError, StoreResult};

/// Purchasable variant discriminant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Unit,
    Box,
    Bundle,
}

/// Stable cart line id for a (source, kind) pair. Pure and total.
pub fn line_id(source_id: &str, kind: LineKind) -> String {
    match kind {
        LineKind::Unit => format!("{source_id}-unit"),
        LineKind::Box => format!("{source_id}-box"),
        LineKind::Bundle => format!("bundle-{source_id}"),
    }
}

/// One entry in a shopping cart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub line_id: String,
    pub kind: LineKind,
    pub source_id: String,
    pub display_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    /// Frozen contents, present on bundle lines only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_contents: Option<Vec<super::bundle::BundleContentRef>>,
}

impl CartLine {
    /// Build a unit or box line from a catalog item
    ///
    /// Box lines synthesize a display name embedding the per-box unit count
    /// so downstream consumers never re-derive it. Fails when the item has
    /// no box pricing, or when asked for a bundle line (those come from
    /// [`CartLine::from_bundle`]).
    pub fn from_catalog_item(item: &CatalogItem, kind: LineKind) -> StoreResult<Self> {
        match kind {
            LineKind::Unit => Ok(Self {
                line_id: line_id(&item.id, LineKind::Unit),
                kind: LineKind::Unit,
                source_id: item.id.clone(),
                display_name: item.name.clone(),
                unit_price: item.effective_unit_price(),
                quantity: 1,
                image_ref: item.image_ref.clone(),
                bundle_contents: None,
            }),
            LineKind::Box => {
                let (Some(box_price), Some(units)) = (item.box_price, item.units_per_box) else {
                    return Err(StoreError::validation(format!(
                        "{} has no box variant",
                        item.name
                    )));
                };
                Ok(Self {
                    line_id: line_id(&item.id, LineKind::Box),
                    kind: LineKind::Box,
                    source_id: item.id.clone(),
                    display_name: format!("{} (caja x{})", item.name, units),
                    unit_price: box_price,
                    quantity: 1,
                    image_ref: item.image_ref.clone(),
                    bundle_contents: None,
                })
            }
            LineKind::Bundle => Err(StoreError::validation(
                "bundle lines are built from a bundle, not a catalog item",
            )),
        }
    }

    /// Build a bundle line carrying the bundle price and frozen contents
    pub fn from_bundle(bundle: &Bundle) -> Self {
        Self {
            line_id: line_id(&bundle.id, LineKind::Bundle),
            kind: LineKind::Bundle,
            source_id: bundle.id.clone(),
            display_name: bundle.name.clone(),
            unit_price: bundle.promo_price,
            quantity: 1,
            image_ref: bundle.image_url.clone(),
            bundle_contents: Some(bundle.contents.clone()),
        }
    }

    /// Line subtotal at the line's own price
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
