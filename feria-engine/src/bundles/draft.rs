//! Bundle authoring draft
//!
//! Authoring is a pure reducer over an explicit command enum: every
//! content mutation produces a new draft with the price and description
//! recomputed at that moment. Recomputation is a convenience default, not
//! a continuously enforced constraint — the author may override either
//! field afterwards, and the override stands until the next content
//! mutation.

use rust_decimal::Decimal;
use shared::error::{StoreError, StoreResult};
use shared::models::{Bundle, BundleContentRef, CatalogItem};
use shared::util::{now_millis, slugify, snowflake_id};

/// Mutable authoring state for one bundle
#[derive(Debug, Clone, PartialEq)]
pub struct BundleDraft {
    pub name: String,
    pub description: String,
    pub list_price: Decimal,
    pub promo_price: Decimal,
    pub image_url: Option<String>,
    pub is_limited_event: bool,
    pub active: bool,
    pub contents: Vec<BundleContentRef>,
}

impl Default for BundleDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            list_price: Decimal::ZERO,
            promo_price: Decimal::ZERO,
            image_url: None,
            is_limited_event: false,
            active: true,
            contents: Vec::new(),
        }
    }
}

impl BundleDraft {
    /// Start a draft from an existing bundle (console edit flow)
    pub fn from_bundle(bundle: &Bundle) -> Self {
        Self {
            name: bundle.name.clone(),
            description: bundle.description.clone(),
            list_price: bundle.list_price,
            promo_price: bundle.promo_price,
            image_url: bundle.image_url.clone(),
            is_limited_event: bundle.is_limited_event,
            active: bundle.active,
            contents: bundle.contents.clone(),
        }
    }

    /// Live sum of the content refs
    pub fn contents_sum(&self) -> Decimal {
        self.contents.iter().map(BundleContentRef::line_total).sum()
    }
}

/// One authoring mutation
#[derive(Debug, Clone)]
pub enum DraftCommand {
    /// Append a catalog ref, snapshotting name and unit price at add time
    AddCatalogRef { item: CatalogItem },
    /// Append a free-text ref; the label is required
    AddManualRef { label: String, unit_price: Decimal },
    /// Remove a content ref (the only way to drop one; quantity never hits 0)
    RemoveRef { index: usize },
    /// Replace a ref's quantity, clamped to a floor of 1
    SetRefQuantity { index: usize, quantity: i32 },
    SetName { name: String },
    /// Author override; stands until the next content mutation
    OverrideDescription { description: String },
    /// Author override; stands until the next content mutation
    OverridePrices {
        list_price: Decimal,
        promo_price: Decimal,
    },
    SetImage { image_url: Option<String> },
    SetLimitedEvent { is_limited_event: bool },
    SetActive { active: bool },
}

/// Apply one command, producing the next draft
///
/// Content-ref commands recompute the derived price and description;
/// everything else leaves them untouched.
pub fn apply(draft: &BundleDraft, command: DraftCommand) -> StoreResult<BundleDraft> {
    let mut next = draft.clone();
    match command {
        DraftCommand::AddCatalogRef { item } => {
            next.contents.push(BundleContentRef::Catalog {
                catalog_id: item.id.clone(),
                label: item.name.clone(),
                unit_price: item.unit_price,
                quantity: 1,
            });
            recompute_derived(&mut next);
        }
        DraftCommand::AddManualRef { label, unit_price } => {
            if label.trim().is_empty() {
                return Err(StoreError::validation("missing label"));
            }
            next.contents.push(BundleContentRef::Manual {
                label,
                unit_price,
                quantity: 1,
            });
            recompute_derived(&mut next);
        }
        DraftCommand::RemoveRef { index } => {
            if index >= next.contents.len() {
                return Err(StoreError::validation(format!(
                    "no content ref at index {index}"
                )));
            }
            next.contents.remove(index);
            recompute_derived(&mut next);
        }
        DraftCommand::SetRefQuantity { index, quantity } => {
            let Some(content) = next.contents.get_mut(index) else {
                return Err(StoreError::validation(format!(
                    "no content ref at index {index}"
                )));
            };
            // Zero-quantity refs would silently corrupt the price sum;
            // removal is an explicit command instead.
            content.set_quantity(quantity.max(1));
            recompute_derived(&mut next);
        }
        DraftCommand::SetName { name } => next.name = name,
        DraftCommand::OverrideDescription { description } => next.description = description,
        DraftCommand::OverridePrices {
            list_price,
            promo_price,
        } => {
            next.list_price = list_price;
            next.promo_price = promo_price;
        }
        DraftCommand::SetImage { image_url } => next.image_url = image_url,
        DraftCommand::SetLimitedEvent { is_limited_event } => {
            next.is_limited_event = is_limited_event
        }
        DraftCommand::SetActive { active } => next.active = active,
    }
    Ok(next)
}

fn recompute_derived(draft: &mut BundleDraft) {
    let sum = draft.contents_sum();
    draft.list_price = sum;
    draft.promo_price = sum;
    draft.description = draft
        .contents
        .iter()
        .map(|c| format!("{}x {}", c.quantity(), c.label()))
        .collect::<Vec<_>>()
        .join(" + ");
}

/// Turn a draft into a publishable bundle
///
/// First publish generates the slug; republishing an existing bundle keeps
/// its id and slug, since external links may reference them.
pub fn publish(draft: &BundleDraft, existing: Option<&Bundle>) -> StoreResult<Bundle> {
    if draft.name.trim().is_empty() {
        return Err(StoreError::validation("missing bundle name"));
    }
    if draft.promo_price <= Decimal::ZERO {
        return Err(StoreError::validation("bundle price must be positive"));
    }

    let (id, slug) = match existing {
        Some(bundle) => (bundle.id.clone(), bundle.slug.clone()),
        None => (
            snowflake_id().to_string(),
            format!("{}-{}", slugify(&draft.name), now_millis()),
        ),
    };

    Ok(Bundle {
        id,
        name: draft.name.clone(),
        slug,
        description: draft.description.clone(),
        list_price: draft.list_price,
        promo_price: draft.promo_price,
        image_url: draft.image_url.clone(),
        is_limited_event: draft.is_limited_event,
        active: draft.active,
        contents: draft.contents.clone(),
    })
}
