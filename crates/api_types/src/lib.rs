use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
        }
    }

    /// Number of fraction digits used when formatting amounts.
    ///
    /// Example: EUR uses 2 fraction digits (cents).
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Currency::Eur => 2,
        }
    }
}

/// Body returned by the server for every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Month selector sent along with every list request.
///
/// Serialized as query parameters (`?year=2026&month=3`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodQuery {
    pub year: i32,
    pub month: u32,
}

pub mod account {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Account {
        pub id: i64,
        pub name: String,
        pub balance: Decimal,
        pub currency: Currency,
        #[serde(default)]
        pub archived: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountInput {
        pub name: String,
        /// Opening balance; the server defaults to zero.
        pub balance: Option<Decimal>,
        pub currency: Option<Currency>,
    }
}

pub mod budget {
    use super::*;

    /// Planned vs spent amount for one category in the selected month.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Budget {
        pub id: i64,
        pub category: String,
        pub planned: Decimal,
        pub spent: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetInput {
        pub category: String,
        pub planned: Decimal,
    }
}

pub mod invoice {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct InvoiceItem {
        pub id: i64,
        pub invoice_id: i64,
        pub description: String,
        pub quantity: u32,
        pub unit_price: Decimal,
        pub issued_on: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceItemInput {
        pub invoice_id: i64,
        pub description: String,
        pub quantity: u32,
        pub unit_price: Decimal,
        pub issued_on: NaiveDate,
    }
}

pub mod media {
    use super::*;

    /// Spend on a subscription/media service within the selected month.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MediaUsage {
        pub id: Uuid,
        pub service: String,
        pub amount: Decimal,
        pub renews_on: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MediaUsageInput {
        pub service: String,
        pub amount: Decimal,
        pub renews_on: Option<NaiveDate>,
    }
}

pub mod shop {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Shop {
        pub id: Uuid,
        pub name: String,
        pub category: Option<String>,
        /// Total spent at the shop within the selected month.
        pub spent: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShopInput {
        pub name: String,
        pub category: Option<String>,
    }
}
