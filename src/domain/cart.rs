//! Cart line store and aggregator.
//!
//! Lines keep insertion order, which is also display order. Every mutation
//! leaves `subtotal == unit_price * quantity` on each line, and the total is
//! always derived from the lines.

use serde::Serialize;
use utoipa::ToSchema;

use super::money::Money;
use super::product::{Product, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartLine {
    product_id: ProductId,
    name: String,
    unit_price: Money,
    quantity: u32,
    subtotal: Money,
}

impl CartLine {
    fn new(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.unit_price,
            quantity: 1,
            subtotal: product.unit_price,
        }
    }

    fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.subtotal = self.unit_price.times(quantity);
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `product`, appending a new line the first time it is
    /// seen.
    pub fn add_product(&mut self, product: &Product) {
        match self.position(product.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                let quantity = line.quantity.saturating_add(1);
                line.set_quantity(quantity);
            }
            None => self.lines.push(CartLine::new(product)),
        }
    }

    /// Applies `delta` to a line's quantity. A result below 1 removes the
    /// line; an unknown id is ignored.
    pub fn change_quantity(&mut self, product_id: ProductId, delta: i64) {
        let Some(idx) = self.position(product_id) else {
            return;
        };

        let new_quantity = i64::from(self.lines[idx].quantity).saturating_add(delta);
        if new_quantity < 1 {
            self.lines.remove(idx);
            return;
        }

        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        self.lines[idx].set_quantity(quantity);
    }

    pub fn remove_product(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == product_id)
    }
}
