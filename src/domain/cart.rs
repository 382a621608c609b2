use super::product::{Product, ProductCode, ProductId};

/// One committed item. Quantity is always one; scanning the same code twice
/// yields two lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub code: ProductCode,
    pub name: String,
    pub unit_price: u64,
}

impl From<&Product> for CartLine {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            code: product.code.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
        }
    }
}

/// Ordered lines of the current transaction. Lines are only ever appended or
/// cleared all at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of unit prices over every line, computed on each call.
    pub fn total_amount(&self) -> u64 {
        total_of(&self.lines)
    }
}

/// Saturates at `u64::MAX` instead of overflowing on absurd backend prices.
pub fn total_of(lines: &[CartLine]) -> u64 {
    lines
        .iter()
        .fold(0, |total, line| total.saturating_add(line.unit_price))
}
