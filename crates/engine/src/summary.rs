use rust_decimal::Decimal;

/// Records that contribute a signed amount to a screen summary.
pub trait Amounted {
    fn amount(&self) -> Decimal;
}

/// Totals shown above a list, recomputed from the store's current items.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub total: Decimal,
    /// Sum of the positive amounts.
    pub inflow: Decimal,
    /// Sum of the negative amounts (a value `<= 0`).
    pub outflow: Decimal,
}

impl Summary {
    pub fn from_items<'a, T, I>(items: I) -> Self
    where
        T: Amounted + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        items
            .into_iter()
            .fold(Self::default(), |mut summary, item| {
                let amount = item.amount();
                summary.count += 1;
                summary.total += amount;
                if amount.is_sign_positive() {
                    summary.inflow += amount;
                } else {
                    summary.outflow += amount;
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line(i64);

    impl Amounted for Line {
        fn amount(&self) -> Decimal {
            Decimal::from(self.0)
        }
    }

    #[test]
    fn splits_inflow_and_outflow() {
        let lines = [Line(100), Line(-30), Line(5)];
        let summary = Summary::from_items(&lines);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, Decimal::from(75));
        assert_eq!(summary.inflow, Decimal::from(105));
        assert_eq!(summary.outflow, Decimal::from(-30));
    }

    #[test]
    fn empty_list_sums_to_zero() {
        let summary = Summary::from_items::<Line, _>(&[]);
        assert_eq!(summary, Summary::default());
    }
}
