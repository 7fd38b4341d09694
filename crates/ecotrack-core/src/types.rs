//! # Domain Types
//!
//! Core domain types used throughout EcoTrack.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name (unique)  │   │  id (invoice)   │   │  username (PK)  │       │
//! │  │  stock          │   │  line_items     │   │  password_digest│       │
//! │  │  price          │   │  total_price    │   │  role           │       │
//! │  │  cost_price     │   │  total_cost     │   └─────────────────┘       │
//! │  └─────────────────┘   │  date, cashier  │                              │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Role       │   │  StockPolicy    │   │  SalesSummary   │       │
//! │  │  Admin | Sales  │   │  Reject         │   │  revenue, cost  │       │
//! │  └─────────────────┘   │  AllowOversell  │   │  profit, margin │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Products are identified by `name` and users by `username`; sales by the
//! integer invoice number the database allocates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::cart::LineItem;
use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Display name; unique across the catalog.
    pub name: String,

    /// Units on hand.
    pub stock: i64,

    /// Selling price per unit.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    pub price: Money,

    /// Purchase cost per unit (for profit reporting).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "cost_price_cents"))]
    pub cost_price: Money,
}

impl Product {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, stock: i64, price: Money, cost_price: Money) -> Self {
        Product {
            name: name.into(),
            stock,
            price,
            cost_price,
        }
    }

    /// Checks if `quantity` units can be taken from current stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Role
// =============================================================================

/// What a logged-in user may do.
///
/// Stored as the literal text `Admin` / `Sales`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Role {
    /// Analytics, inventory control, backups.
    Admin,
    /// Point-of-sale terminal only.
    Sales,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Sales => "Sales",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "sales" => Ok(Role::Sales),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["Admin".to_string(), "Sales".to_string()],
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub username: String,

    /// Opaque one-way digest; never leaves the server.
    #[serde(skip_serializing)]
    pub password_digest: String,

    pub role: Role,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale, as read back from storage.
///
/// `line_items` is reconstructed from the stored JSON blob, so a sale can be
/// audited without the product rows it once referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    /// Invoice number.
    pub id: i64,
    pub line_items: Vec<LineItem>,
    pub total_price: Money,
    pub total_cost: Money,
    /// Recorded at insertion, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
    /// Username of the cashier.
    pub cashier: String,
}

/// What the sale recorder hands back for receipt rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleReceipt {
    pub invoice_id: i64,
    pub timestamp: String,
}

// =============================================================================
// Stock Policy
// =============================================================================

/// Commit-time stock rule for the sale transaction.
///
/// The cart checks stock when a line is added, but other terminals may sell
/// the same product before this cart is checked out.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────────────────┐
/// │  Terminal A: add Pen ×8 (stock 10 ✓)                                │
/// │  Terminal B: add Pen ×5 (stock 10 ✓) ──► checkout ──► stock 5       │
/// │  Terminal A: checkout                                                │
/// │       │                                                              │
/// │       ├── Reject:        fails, nothing written, stock stays 5      │
/// │       └── AllowOversell: succeeds, stock -3, warning logged         │
/// └──────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StockPolicy {
    /// Fail the whole sale if any line exceeds stock at commit time.
    #[default]
    Reject,
    /// Commit anyway and log every line that drove stock negative.
    AllowOversell,
}

impl FromStr for StockPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(StockPolicy::Reject),
            "allow_oversell" | "allow-oversell" => Ok(StockPolicy::AllowOversell),
            _ => Err(ValidationError::NotAllowed {
                field: "stock policy".to_string(),
                allowed: vec!["reject".to_string(), "allow_oversell".to_string()],
            }),
        }
    }
}

// =============================================================================
// Sales Summary
// =============================================================================

/// Revenue and profit over a set of sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub sale_count: i64,
    pub revenue: Money,
    pub cost_of_goods: Money,
}

impl SalesSummary {
    pub fn profit(&self) -> Money {
        self.revenue.saturating_sub(self.cost_of_goods)
    }

    /// Profit as a percentage of revenue; 0 when there is no revenue.
    ///
    /// Display only, hence the float.
    pub fn margin_percent(&self) -> f64 {
        if self.revenue.cents() <= 0 {
            return 0.0;
        }
        self.profit().cents() as f64 * 100.0 / self.revenue.cents() as f64
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("sales".parse::<Role>().unwrap(), Role::Sales);
        assert!("cashier".parse::<Role>().is_err());
        assert_eq!(Role::Sales.to_string(), "Sales");
        assert!(Role::Admin.is_admin());
        assert!(!Role::Sales.is_admin());
    }

    #[test]
    fn test_stock_policy_parse() {
        assert_eq!(StockPolicy::default(), StockPolicy::Reject);
        assert_eq!(
            "allow_oversell".parse::<StockPolicy>().unwrap(),
            StockPolicy::AllowOversell
        );
        assert_eq!("REJECT".parse::<StockPolicy>().unwrap(), StockPolicy::Reject);
        assert!("sometimes".parse::<StockPolicy>().is_err());
    }

    #[test]
    fn test_user_digest_not_serialized() {
        let user = User {
            username: "bob".to_string(),
            password_digest: "secret-digest".to_string(),
            role: Role::Sales,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-digest"));
        assert!(json.contains("\"role\":\"Sales\""));
    }

    #[test]
    fn test_summary_profit_and_margin() {
        let summary = SalesSummary {
            sale_count: 2,
            revenue: Money::from_cents(1000),
            cost_of_goods: Money::from_cents(750),
        };
        assert_eq!(summary.profit(), Money::from_cents(250));
        assert!((summary.margin_percent() - 25.0).abs() < 1e-9);

        assert_eq!(SalesSummary::default().margin_percent(), 0.0);
    }
}
