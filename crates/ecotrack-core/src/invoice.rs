//! # Invoice Rendering
//!
//! Turns a committed sale into the fixed-layout document handed to the
//! cashier for printing. Pure: no state, no I/O, same input → same bytes.
//!
//! ## Layout
//! ```text
//!                               OFFICIAL TAX INVOICE
//! Inv: #1 | Date: 2026-10-17 09:30:00 | Cashier: alice
//!
//! +------------------------------------------+--------+------------+--------------+
//! | Item Description                         |    Qty |       Rate |       Amount |
//! +------------------------------------------+--------+------------+--------------+
//! | Pen                                      |      3 |       2.00 |         6.00 |
//! +------------------------------------------+--------+------------+--------------+
//!
//!                                                          TOTAL (INR):      6.00
//! ```

use crate::cart::LineItem;
use crate::error::CoreResult;
use crate::money::Money;

const TITLE: &str = "OFFICIAL TAX INVOICE";

const DESC_WIDTH: usize = 40;
const QTY_WIDTH: usize = 6;
const RATE_WIDTH: usize = 10;
const AMOUNT_WIDTH: usize = 12;

/// Two spaces of padding plus one border per column, plus the closing border.
const TABLE_WIDTH: usize = DESC_WIDTH + QTY_WIDTH + RATE_WIDTH + AMOUNT_WIDTH + 4 * 3 + 1;

/// Inputs for one invoice.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceInput<'a> {
    pub invoice_id: i64,
    pub date: &'a str,
    pub cashier: &'a str,
    pub items: &'a [LineItem],
    pub total: Money,
    /// Label printed next to the total, e.g. `INR`.
    pub currency: &'a str,
}

/// Renders the invoice as UTF-8 text.
///
/// An empty `items` slice is legal and renders a table with no rows.
/// Fails only if a line amount overflows.
pub fn render_invoice(input: &InvoiceInput<'_>) -> CoreResult<Vec<u8>> {
    let border = border_line();
    let mut lines: Vec<String> = Vec::with_capacity(input.items.len() + 10);

    lines.push(format!("{:^width$}", TITLE, width = TABLE_WIDTH).trim_end().to_string());
    lines.push(format!(
        "Inv: #{} | Date: {} | Cashier: {}",
        input.invoice_id, input.date, input.cashier
    ));
    lines.push(String::new());

    lines.push(border.clone());
    lines.push(row("Item Description", "Qty", "Rate", "Amount"));
    lines.push(border.clone());
    for item in input.items {
        lines.push(row(
            &item.product_name,
            &item.quantity.to_string(),
            &item.unit_price.to_string(),
            &item.amount()?.to_string(),
        ));
    }
    lines.push(border);
    lines.push(String::new());

    let label = format!("TOTAL ({}):", input.currency);
    lines.push(format!(
        "{:>label_width$} {:>amount_width$}",
        label,
        input.total.format_grouped(),
        label_width = TABLE_WIDTH - AMOUNT_WIDTH - 3,
        amount_width = AMOUNT_WIDTH,
    ));

    let mut document = lines.join("\n");
    document.push('\n');
    Ok(document.into_bytes())
}

fn border_line() -> String {
    format!(
        "+{}+{}+{}+{}+",
        "-".repeat(DESC_WIDTH + 2),
        "-".repeat(QTY_WIDTH + 2),
        "-".repeat(RATE_WIDTH + 2),
        "-".repeat(AMOUNT_WIDTH + 2),
    )
}

fn row(description: &str, qty: &str, rate: &str, amount: &str) -> String {
    format!(
        "| {:<dw$} | {:>qw$} | {:>rw$} | {:>aw$} |",
        fit(description, DESC_WIDTH),
        qty,
        rate,
        amount,
        dw = DESC_WIDTH,
        qw = QTY_WIDTH,
        rw = RATE_WIDTH,
        aw = AMOUNT_WIDTH,
    )
}

/// Truncates to `width` characters, marking the cut with `...`.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width - 3).collect();
    cut.push_str("...");
    cut
}

// =============================================================================
// Unit Tests
// =============================================================================
