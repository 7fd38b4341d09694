//! # Cart
//!
//! The in-progress, not-yet-committed list of lines a session intends to sell,
//! and the [`SaleDraft`] that checkout builds from it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Client Action            Cart Method            Effect                 │
//! │  ─────────────            ───────────            ──────                 │
//! │                                                                         │
//! │  Add item ───────────────► add(product, qty) ──► stock check, push line│
//! │                                                                         │
//! │  Clear basket ───────────► clear() ────────────► lines.clear()         │
//! │                                                                         │
//! │  Generate invoice ───────► SaleDraft::from_cart  (cart left as is;     │
//! │                                                  cleared after commit) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Each line freezes the product's price and cost at the moment it is added.
//! Checkout never re-reads prices, so what the cashier saw is what is billed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_cart_size, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Line Item
// =============================================================================

/// One line of a cart, and of a committed sale.
///
/// This is also the shape of each element in the sale's stored `items_json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Product name at time of adding (weak reference to the catalog).
    pub product_name: String,

    pub quantity: i64,

    /// Selling price per unit, frozen at add time.
    pub unit_price: Money,

    /// Cost per unit, frozen at add time. Absent in lines stored before
    /// cost tracking; those read back as zero.
    #[serde(default)]
    pub unit_cost: Money,
}

impl LineItem {
    /// Snapshots `product` for `quantity` units.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineItem {
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            unit_cost: product.cost_price,
        }
    }

    /// unit_price × quantity
    pub fn amount(&self) -> CoreResult<Money> {
        self.unit_price
            .checked_mul_quantity(self.quantity)
            .ok_or(CoreError::AmountOverflow)
    }

    /// unit_cost × quantity
    pub fn cost(&self) -> CoreResult<Money> {
        self.unit_cost
            .checked_mul_quantity(self.quantity)
            .ok_or(CoreError::AmountOverflow)
    }
}

/// Σ amount over `items`.
fn sum_amounts(items: &[LineItem]) -> CoreResult<Money> {
    items.iter().try_fold(Money::zero(), |acc, item| {
        acc.checked_add(item.amount()?).ok_or(CoreError::AmountOverflow)
    })
}

/// Σ cost over `items`.
fn sum_costs(items: &[LineItem]) -> CoreResult<Money> {
    items.iter().try_fold(Money::zero(), |acc, item| {
        acc.checked_add(item.cost()?).ok_or(CoreError::AmountOverflow)
    })
}

/// Serializes lines to the self-describing JSON stored with a sale.
pub fn encode_line_items(items: &[LineItem]) -> serde_json::Result<String> {
    serde_json::to_string(items)
}

/// Reverses [`encode_line_items`].
pub fn decode_line_items(json: &str) -> serde_json::Result<Vec<LineItem>> {
    serde_json::from_str(json)
}

// =============================================================================
// Cart
// =============================================================================

/// A session's cart.
///
/// ## Invariants
/// - Lines keep insertion order (the invoice prints them in this order)
/// - Every quantity is in `1..=MAX_ITEM_QUANTITY`
/// - At add time, the units of a product across all its lines never
///   exceeded that product's stock
/// - Both totals fit in `Money`; a line that would break this is refused
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Appends a line for `quantity` units of `product`.
    ///
    /// ## Behavior
    /// - Quantity is validated first
    /// - Stock check counts units of the same product already in the cart
    /// - `AmountOverflow` if the new totals would not fit
    /// - On any error the cart is unchanged
    ///
    /// ## User Workflow
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  Catalog: Pen, stock 10                                            │
    /// │                                                                     │
    /// │  add(Pen, 3)  ──► 3 ≤ 10  ✓  push {Pen, 3, 2.00, 1.00}            │
    /// │  add(Pen, 8)  ──► 3+8 > 10 ✗ InsufficientStock, cart unchanged    │
    /// │  add(Pen, 7)  ──► 3+7 ≤ 10 ✓  push {Pen, 7, 2.00, 1.00}            │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        if validate_cart_size(self.items.len()).is_err() {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        let requested = self.quantity_of(&product.name) + quantity;
        if !product.can_sell(requested) {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
                requested,
            });
        }

        let line = LineItem::from_product(product, quantity);
        self.total()?
            .checked_add(line.amount()?)
            .ok_or(CoreError::AmountOverflow)?;
        self.total_cost()?
            .checked_add(line.cost()?)
            .ok_or(CoreError::AmountOverflow)?;

        self.items.push(line);
        Ok(())
    }

    /// Empties the cart unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Units of `product_name` across all lines.
    pub fn quantity_of(&self, product_name: &str) -> i64 {
        self.items
            .iter()
            .filter(|i| i.product_name == product_name)
            .map(|i| i.quantity)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ unit_price × quantity
    pub fn total(&self) -> CoreResult<Money> {
        sum_amounts(&self.items)
    }

    /// Σ unit_cost × quantity
    pub fn total_cost(&self) -> CoreResult<Money> {
        sum_costs(&self.items)
    }
}

// =============================================================================
// Sale Draft
// =============================================================================

/// Everything the sale recorder needs to commit one checkout.
///
/// Totals are derived from the lines on construction and the fields are
/// private, so `total_price == Σ amount` and `total_cost == Σ cost` hold for
/// every draft that reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    line_items: Vec<LineItem>,
    total_price: Money,
    total_cost: Money,
    cashier: String,
}

impl SaleDraft {
    /// Builds a draft from explicit lines.
    ///
    /// ## Errors
    /// - No lines: nothing to sell
    /// - Empty cashier
    /// - `AmountOverflow` when a total does not fit
    pub fn new(line_items: Vec<LineItem>, cashier: impl Into<String>) -> CoreResult<Self> {
        let cashier = cashier.into();

        if line_items.is_empty() {
            return Err(ValidationError::Required {
                field: "cart items".to_string(),
            }
            .into());
        }
        if cashier.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "cashier".to_string(),
            }
            .into());
        }

        let total_price = sum_amounts(&line_items)?;
        let total_cost = sum_costs(&line_items)?;

        Ok(SaleDraft {
            line_items,
            total_price,
            total_cost,
            cashier,
        })
    }

    /// Snapshots the current cart for checkout.
    pub fn from_cart(cart: &Cart, cashier: impl Into<String>) -> CoreResult<Self> {
        SaleDraft::new(cart.items().to_vec(), cashier)
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn total_cost(&self) -> Money {
        self.total_cost
    }

    pub fn cashier(&self) -> &str {
        &self.cashier
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pen() -> Product {
        Product::new("Pen", 10, Money::from_cents(200), Money::from_cents(100))
    }

    fn notebook() -> Product {
        Product::new("Notebook", 4, Money::from_cents(4550), Money::from_cents(3000))
    }

    #[test]
    fn test_add_snapshots_price_and_cost() {
        let mut cart = Cart::new();
        cart.add(&pen(), 3).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Ok(Money::from_cents(600)));
        assert_eq!(cart.total_cost(), Ok(Money::from_cents(300)));

        let line = &cart.items()[0];
        assert_eq!(line.product_name, "Pen");
        assert_eq!(line.unit_price, Money::from_cents(200));
        assert_eq!(line.unit_cost, Money::from_cents(100));
    }

    #[test]
    fn test_price_change_after_add_is_ignored() {
        let mut cart = Cart::new();
        let mut product = pen();
        cart.add(&product, 1).unwrap();

        product.price = Money::from_cents(999);
        assert_eq!(cart.total(), Ok(Money::from_cents(200)));
    }

    #[test]
    fn test_insufficient_stock_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        let err = cart.add(&pen(), 11).unwrap_err();

        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product: "Pen".to_string(),
                available: 10,
                requested: 11,
            }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_stock_check_counts_existing_lines() {
        let mut cart = Cart::new();
        cart.add(&pen(), 3).unwrap();

        assert!(matches!(
            cart.add(&pen(), 8),
            Err(CoreError::InsufficientStock { requested: 11, .. })
        ));
        assert_eq!(cart.len(), 1);

        cart.add(&pen(), 7).unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.quantity_of("Pen"), 10);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&notebook(), 1).unwrap();
        cart.add(&pen(), 2).unwrap();
        cart.add(&notebook(), 1).unwrap();

        let names: Vec<&str> = cart
            .items()
            .iter()
            .map(|i| i.product_name.as_str())
            .collect();
        assert_eq!(names, vec!["Notebook", "Pen", "Notebook"]);
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_invalid_quantities() {
        let mut cart = Cart::new();
        assert!(matches!(cart.add(&pen(), 0), Err(CoreError::Validation(_))));
        assert!(matches!(cart.add(&pen(), -2), Err(CoreError::Validation(_))));
        assert!(matches!(
            cart.add(&pen(), 1000),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_size_limit() {
        let mut cart = Cart::new();
        let plenty = Product::new("Clip", 10_000, Money::from_cents(5), Money::from_cents(1));
        for _ in 0..MAX_CART_ITEMS {
            cart.add(&plenty, 1).unwrap();
        }
        assert_eq!(
            cart.add(&plenty, 1),
            Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS
            })
        );
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&pen(), 2).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Ok(Money::zero()));
    }

    #[test]
    fn test_draft_totals_match_lines() {
        let mut cart = Cart::new();
        cart.add(&pen(), 3).unwrap();
        cart.add(&notebook(), 2).unwrap();

        let draft = SaleDraft::from_cart(&cart, "alice").unwrap();
        assert_eq!(draft.total_price(), Money::from_cents(600 + 9100));
        assert_eq!(draft.total_cost(), Money::from_cents(300 + 6000));
        assert_eq!(Ok(draft.total_price()), cart.total());
        assert_eq!(draft.cashier(), "alice");
        assert_eq!(draft.line_items(), cart.items());
    }

    #[test]
    fn test_draft_rejects_empty_cart_and_cashier() {
        assert!(SaleDraft::from_cart(&Cart::new(), "alice").is_err());

        let mut cart = Cart::new();
        cart.add(&pen(), 1).unwrap();
        assert!(SaleDraft::from_cart(&cart, "  ").is_err());
    }

    #[test]
    fn test_line_items_json_preserves_order_and_values() {
        let mut cart = Cart::new();
        cart.add(&notebook(), 2).unwrap();
        cart.add(&pen(), 3).unwrap();

        let json = encode_line_items(cart.items()).unwrap();
        assert!(json.contains("\"product_name\":\"Notebook\""));

        let decoded = decode_line_items(&json).unwrap();
        assert_eq!(decoded, cart.items());
        assert_eq!(sum_amounts(&decoded), cart.total());
    }

    #[test]
    fn test_lines_stored_without_cost_decode_as_zero_cost() {
        let decoded =
            decode_line_items(r#"[{"product_name":"Pen","quantity":2,"unit_price":200}]"#).unwrap();
        assert_eq!(decoded[0].unit_cost, Money::zero());
        assert_eq!(decoded[0].amount(), Ok(Money::from_cents(400)));
    }

    #[test]
    fn test_overflowing_line_is_refused() {
        // Bypasses the catalog price cap, as a row written by an older build might.
        let huge = Product::new(
            "Gold",
            10,
            Money::parse_decimal("92233720368547758").unwrap(),
            Money::from_cents(1),
        );

        let mut cart = Cart::new();
        assert_eq!(cart.add(&huge, 2), Err(CoreError::AmountOverflow));
        assert!(cart.is_empty());

        cart.add(&huge, 1).unwrap();
        assert_eq!(cart.add(&huge, 1), Err(CoreError::AmountOverflow));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), Ok(huge.price));
    }

    #[test]
    fn test_draft_reports_overflow_instead_of_wrapping() {
        let line = LineItem {
            product_name: "Gold".to_string(),
            quantity: 2,
            unit_price: Money::from_cents(i64::MAX / 2 + 1),
            unit_cost: Money::zero(),
        };
        assert_eq!(line.amount(), Err(CoreError::AmountOverflow));
        assert_eq!(
            SaleDraft::new(vec![line], "alice"),
            Err(CoreError::AmountOverflow)
        );
    }
}
