//! Row ordering for list builds.
//!
//! Sort keys are evaluated once per row over the style's accumulated sort
//! domains, then compared component-wise honoring each domain's direction.
//! Numeric domains compare as numbers so "10" lands after "2".

use crate::row::SourceRow;
use crate::schema::{Domain, SortDirection};
use std::cmp::Ordering;

/// One evaluated sort component.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Case-folded at evaluation; ordering over text is case-insensitive.
    Text(String),
    Number(f64),
    Missing,
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Missing => 0,
            SortValue::Number(_) => 1,
            SortValue::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Evaluate the sort key of one row.
pub fn sort_key(domains: &[Domain], row: &SourceRow) -> Vec<SortValue> {
    domains
        .iter()
        .map(|domain| {
            let value = domain.expr.eval(row);
            if value.is_empty() {
                SortValue::Missing
            } else if domain.expr.orders_numerically() {
                // Unparseable values ("Omnibus 3-10") fall back to text and
                // sort after every number.
                value
                    .parse::<f64>()
                    .map(SortValue::Number)
                    .unwrap_or_else(|_| SortValue::Text(value.to_lowercase()))
            } else {
                SortValue::Text(value.to_lowercase())
            }
        })
        .collect()
}

/// Compare two evaluated keys component-wise.
pub fn compare_keys(domains: &[Domain], a: &[SortValue], b: &[SortValue]) -> Ordering {
    for (i, domain) in domains.iter().enumerate() {
        let ord = a[i].compare(&b[i]);
        let ord = match domain.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
