//! Cart store
//!
//! In-memory collection of cart lines, persisted after every mutation and
//! rehydrated at session start. Lines merge by `line_id`, so a unit line
//! and a box line of the same product keep independent quantities, and a
//! bundle instance never merges with plain catalog lines.
//!
//! Store operations never fail. Persistence failures are logged and
//! ignored; the in-memory state stays authoritative for the session.

mod storage;

pub use storage::{CartStorage, RedbCartStorage};

use rust_decimal::Decimal;
use shared::models::CartLine;
use tracing::{debug, warn};

/// Cart collection with merge-by-identity semantics
///
/// Insertion order is preserved; the fulfillment message walks lines in
/// the order the customer added them.
pub struct CartStore<S: CartStorage> {
    lines: Vec<CartLine>,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Rehydrate the cart from storage
    pub fn load(storage: S) -> Self {
        let lines = storage.load();
        Self { lines, storage }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    fn find(&self, line_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.line_id == line_id)
    }

    /// Quantity of a line, 0 when absent
    pub fn quantity(&self, line_id: &str) -> i32 {
        self.find(line_id).map_or(0, |i| self.lines[i].quantity)
    }

    /// Add a line; an existing line with the same id absorbs the quantity
    pub fn add(&mut self, line: CartLine) {
        match self.find(&line.line_id) {
            Some(i) => {
                self.lines[i].quantity += line.quantity;
                debug!(line_id = %line.line_id, quantity = self.lines[i].quantity, "cart line merged");
            }
            None => {
                debug!(line_id = %line.line_id, "cart line added");
                self.lines.push(line);
            }
        }
        self.persist();
    }

    /// Remove a line unconditionally; removing an absent line is a no-op
    pub fn remove(&mut self, line_id: &str) {
        let before = self.lines.len();
        self.lines.retain(|l| l.line_id != line_id);
        if self.lines.len() != before {
            debug!(line_id, "cart line removed");
        }
        self.persist();
    }

    /// Replace a line's quantity; `n <= 0` removes the line
    pub fn set_quantity(&mut self, line_id: &str, n: i32) {
        if n <= 0 {
            self.remove(line_id);
            return;
        }
        if let Some(i) = self.find(line_id) {
            self.lines[i].quantity = n;
            self.persist();
        }
    }

    pub fn increment(&mut self, line_id: &str) {
        let current = self.quantity(line_id);
        if current > 0 {
            self.set_quantity(line_id, current + 1);
        }
    }

    /// Decrementing a 1-quantity line removes it
    pub fn decrement(&mut self, line_id: &str) {
        let current = self.quantity(line_id);
        if current > 0 {
            self.set_quantity(line_id, current - 1);
        }
    }

    /// Empty the collection and persist the empty state
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Cart total at each line's own price
    pub fn total(&self) -> Decimal {
        self.total_with(|line| line.unit_price)
    }

    /// Cart total under a caller-supplied price selection rule
    ///
    /// Bundle lines carry a single price; plain catalog lines may be priced
    /// promo-vs-normal by the caller.
    pub fn total_with(&self, price: impl Fn(&CartLine) -> Decimal) -> Decimal {
        self.lines
            .iter()
            .map(|line| price(line) * Decimal::from(line.quantity))
            .sum()
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save(&self.lines) {
            warn!(error = %err, "cart persist failed, in-memory state kept");
        }
    }
}
