//! Bundle (pack) model
//!
//! A bundle is a merchant-curated composite product with its own price. Its
//! contents either point at catalog items (price and name snapshotted at
//! authoring time) or are free-text manual entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One constituent entry inside a bundle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum BundleContentRef {
    /// Reference to a catalog item, with name and price frozen at add time
    #[serde(rename_all = "camelCase")]
    Catalog {
        catalog_id: String,
        label: String,
        unit_price: Decimal,
        quantity: i32,
    },
    /// Free-text entry described by the author
    #[serde(rename_all = "camelCase")]
    Manual {
        label: String,
        unit_price: Decimal,
        quantity: i32,
    },
}

impl BundleContentRef {
    /// Display label (item name snapshot or the manual text)
    pub fn label(&self) -> &str {
        match self {
            Self::Catalog { label, .. } | Self::Manual { label, .. } => label,
        }
    }

    pub fn unit_price(&self) -> Decimal {
        match self {
            Self::Catalog { unit_price, .. } | Self::Manual { unit_price, .. } => *unit_price,
        }
    }

    pub fn quantity(&self) -> i32 {
        match self {
            Self::Catalog { quantity, .. } | Self::Manual { quantity, .. } => *quantity,
        }
    }

    /// Replace the quantity. Callers enforce the floor of 1.
    pub fn set_quantity(&mut self, new_quantity: i32) {
        match self {
            Self::Catalog { quantity, .. } | Self::Manual { quantity, .. } => {
                *quantity = new_quantity
            }
        }
    }

    /// Contribution of this ref to the derived bundle price
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity())
    }
}

/// Bundle entity
///
/// Serialized with the persisted-store tokens (`nombre`, `precio_real`,
/// `es_cyber`, ...). Contents live in a child collection and are attached
/// by the repository, so they are skipped here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bundle {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    pub slug: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio_real")]
    pub list_price: Decimal,
    #[serde(rename = "precio_oferta")]
    pub promo_price: Decimal,
    #[serde(rename = "imagen_url")]
    pub image_url: Option<String>,
    /// Limited to the promotional event window
    #[serde(rename = "es_cyber")]
    pub is_limited_event: bool,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(skip)]
    pub contents: Vec<BundleContentRef>,
}

impl Bundle {
    /// Whether the storefront may show this bundle
    ///
    /// Inactive bundles and event-limited bundles outside the event window
    /// are hidden from the storefront but stay manipulable in the console.
    pub fn is_presentable(&self, event_active: bool) -> bool {
        self.active && (!self.is_limited_event || event_active)
    }
}
