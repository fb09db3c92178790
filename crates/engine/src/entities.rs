//! Wiring of the payload records into the engine traits.
use api_types::{
    account::Account, budget::Budget, invoice::InvoiceItem, media::MediaUsage, shop::Shop,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    chart::CategoryAmount,
    diff::{Entity, scaled_fingerprint},
    summary::Amounted,
};

impl Entity for Account {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }

    fn fingerprint(&self) -> u64 {
        scaled_fingerprint(self, &[self.balance])
    }
}

impl Entity for Budget {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }

    fn fingerprint(&self) -> u64 {
        scaled_fingerprint(self, &[self.planned, self.spent])
    }
}

impl Entity for InvoiceItem {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }

    fn fingerprint(&self) -> u64 {
        scaled_fingerprint(self, &[self.unit_price])
    }
}

impl Entity for MediaUsage {
    type Key = Uuid;

    fn key(&self) -> Uuid {
        self.id
    }

    fn fingerprint(&self) -> u64 {
        scaled_fingerprint(self, &[self.amount])
    }
}

impl Entity for Shop {
    type Key = Uuid;

    fn key(&self) -> Uuid {
        self.id
    }

    fn fingerprint(&self) -> u64 {
        scaled_fingerprint(self, &[self.spent])
    }
}

impl Amounted for Account {
    fn amount(&self) -> Decimal {
        self.balance
    }
}

impl Amounted for Budget {
    fn amount(&self) -> Decimal {
        self.spent
    }
}

impl Amounted for InvoiceItem {
    fn amount(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

impl Amounted for MediaUsage {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Amounted for Shop {
    fn amount(&self) -> Decimal {
        self.spent
    }
}

impl From<&Budget> for CategoryAmount {
    fn from(budget: &Budget) -> Self {
        CategoryAmount::new(budget.category.clone(), budget.spent)
    }
}

impl From<&Shop> for CategoryAmount {
    fn from(shop: &Shop) -> Self {
        let label = shop.category.clone().unwrap_or_else(|| shop.name.clone());
        CategoryAmount::new(label, shop.spent)
    }
}

impl From<&MediaUsage> for CategoryAmount {
    fn from(usage: &MediaUsage) -> Self {
        CategoryAmount::new(usage.service.clone(), usage.amount)
    }
}

/// Planned amounts of a budget list, for the "planned" chart.
pub fn planned_amounts(budgets: &[Budget]) -> Vec<CategoryAmount> {
    budgets
        .iter()
        .map(|budget| CategoryAmount::new(budget.category.clone(), budget.planned))
        .collect()
}

/// Spent amounts of any list that maps to categories.
pub fn category_amounts<'a, T>(items: &'a [T]) -> Vec<CategoryAmount>
where
    &'a T: Into<CategoryAmount>,
{
    items.iter().map(Into::into).collect()
}
