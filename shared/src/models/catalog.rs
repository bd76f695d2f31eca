//! Catalog item model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog product record
///
/// Owned by the catalog collaborator; read-only to the engine. Items with
/// `box_price` and `units_per_box` set can also be sold by the box.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub promo_price: Option<Decimal>,
    pub promo_active: bool,
    pub box_price: Option<Decimal>,
    pub units_per_box: Option<i32>,
    pub image_ref: Option<String>,
}

impl CatalogItem {
    /// Price the storefront charges per unit right now
    ///
    /// The promo price applies only while the promo is active; an active
    /// promo without a price falls back to the normal unit price.
    pub fn effective_unit_price(&self) -> Decimal {
        if self.promo_active {
            self.promo_price.unwrap_or(self.unit_price)
        } else {
            self.unit_price
        }
    }

    /// Whether the item can be sold as a box variant
    pub fn has_box_variant(&self) -> bool {
        self.box_price.is_some() && self.units_per_box.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(promo_active: bool, promo_price: Option<&str>) -> CatalogItem {
        CatalogItem {
            id: "rice".to_string(),
            name: "Arroz".to_string(),
            unit_price: "4.50".parse().unwrap(),
            promo_price: promo_price.map(|p| p.parse().unwrap()),
            promo_active,
            box_price: None,
            units_per_box: None,
            image_ref: None,
        }
    }

    #[test]
    fn test_effective_price_uses_promo_only_while_active() {
        assert_eq!(
            item(true, Some("3.99")).effective_unit_price(),
            "3.99".parse().unwrap()
        );
        assert_eq!(
            item(false, Some("3.99")).effective_unit_price(),
            "4.50".parse().unwrap()
        );
    }

    #[test]
    fn test_active_promo_without_price_falls_back() {
        assert_eq!(
            item(true, None).effective_unit_price(),
            "4.50".parse().unwrap()
        );
    }
}
