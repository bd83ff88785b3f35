use chrono::{Duration, NaiveDate};

use crate::model::{OrderRow, OrderStatus};

const SAMPLE_SIZE: usize = 20;

/// Placeholder order grid until the backend exposes orders to the seller.
pub fn sample_orders(count: usize) -> Vec<OrderRow> {
    let newest = NaiveDate::from_ymd_opt(2024, 2, 21).unwrap_or(NaiveDate::MIN);
    (0..count)
        .map(|i| {
            let n = i + 1;
            // deterministic stand-in for a random total in [0, 100)
            let cents = (n * 7919 + 1234) % 10_000;
            OrderRow {
                order_no: format!("{n:04}"),
                products: format!("Product {n}"),
                total: format!("${}.{:02}", cents / 100, cents % 100),
                order_date: (newest - Duration::days(i as i64))
                    .format("%Y-%m-%d")
                    .to_string(),
                status: OrderStatus::ALL[i % OrderStatus::ALL.len()],
                customer: format!("Customer {n}"),
                shipping_label: format!("/path/to/shipping_label_{n:04}.png"),
            }
        })
        .collect()
}

/// Orders grid with an optional detail popup.
#[derive(Debug, Clone)]
pub struct OrdersView {
    rows: Vec<OrderRow>,
    selected: Option<usize>,
}

impl Default for OrdersView {
    fn default() -> Self {
        Self::new(sample_orders(SAMPLE_SIZE))
    }
}

impl OrdersView {
    pub fn new(rows: Vec<OrderRow>) -> Self {
        Self {
            rows,
            selected: None,
        }
    }

    pub fn rows(&self) -> &[OrderRow] {
        &self.rows
    }

    /// Open the detail popup for an order number; false if it is not listed.
    pub fn open(&mut self, order_no: &str) -> bool {
        self.selected = self.rows.iter().position(|r| r.order_no == order_no);
        self.selected.is_some()
    }

    pub fn selected(&self) -> Option<&OrderRow> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn shipping_label(&self, order_no: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.order_no == order_no)
            .map(|r| r.shipping_label.as_str())
    }
}
