use ratatui::style::Color;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Colors assigned to buckets by position in the sorted output.
pub const PALETTE: [Color; 8] = [
    Color::Rgb(80, 160, 160),
    Color::Rgb(230, 160, 70),
    Color::Rgb(120, 180, 90),
    Color::Rgb(200, 80, 80),
    Color::Rgb(150, 120, 200),
    Color::Rgb(220, 200, 90),
    Color::Rgb(90, 130, 210),
    Color::Rgb(140, 140, 140),
];

/// Whether the synthetic "Other" bucket shows up when nothing fell into it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherBucket {
    /// Emit "Other" only when the minor categories add up to more than zero.
    #[default]
    WhenPositive,
    /// Always emit "Other", even with a zero value.
    Always,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Categories at or below this value are folded into "Other".
    pub other_threshold: Decimal,
    pub other_bucket: OtherBucket,
    pub other_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            other_threshold: Decimal::from(40),
            other_bucket: OtherBucket::WhenPositive,
            other_label: "Other".to_string(),
        }
    }
}

/// One input record: a category and its planned or spent amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryAmount {
    pub label: String,
    pub value: Decimal,
}

impl CategoryAmount {
    pub fn new(label: impl Into<String>, value: Decimal) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartBucket {
    pub label: String,
    pub value: Decimal,
    pub color: Color,
}

/// Turns category amounts into ordered, colored chart buckets.
#[derive(Clone, Debug, Default)]
pub struct ChartAggregator {
    config: ChartConfig,
}

impl ChartAggregator {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Groups small categories into "Other" and sorts descending by value.
    ///
    /// Records with a value `<= 0` are ignored. Ties keep input order, with
    /// "Other" placed after the major categories it ties with. Colors cycle
    /// [`PALETTE`] by sorted position, not by label.
    pub fn aggregate<I>(&self, records: I) -> Vec<ChartBucket>
    where
        I: IntoIterator<Item = CategoryAmount>,
    {
        let mut slices: Vec<(String, Decimal)> = Vec::new();
        let mut other = Decimal::ZERO;

        for record in records {
            if record.value <= Decimal::ZERO {
                continue;
            }
            if record.value > self.config.other_threshold {
                slices.push((record.label, record.value));
            } else {
                other += record.value;
            }
        }

        let emit_other = match self.config.other_bucket {
            OtherBucket::Always => true,
            OtherBucket::WhenPositive => other > Decimal::ZERO,
        };
        if emit_other {
            slices.push((self.config.other_label.clone(), other));
        }

        // `sort_by` is stable: equal values keep the major-then-other order.
        slices.sort_by(|a, b| b.1.cmp(&a.1));

        slices
            .into_iter()
            .enumerate()
            .map(|(idx, (label, value))| ChartBucket {
                label,
                value,
                color: PALETTE[idx % PALETTE.len()],
            })
            .collect()
    }
}

/// Share of the total for each bucket, in percent, rounded to 2 decimals.
///
/// Returns zeros when the total is zero.
#[must_use]
pub fn percentages(buckets: &[ChartBucket]) -> Vec<Decimal> {
    let total: Decimal = buckets.iter().map(|bucket| bucket.value).sum();
    if total.is_zero() {
        return vec![Decimal::ZERO; buckets.len()];
    }

    let hundred = Decimal::ONE_HUNDRED;
    buckets
        .iter()
        .map(|bucket| (bucket.value * hundred / total).round_dp(2))
        .collect()
}
