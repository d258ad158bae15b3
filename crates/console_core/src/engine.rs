//! Pure search and sort over record slices.
//!
//! Search matches the case-folded query as a substring of any accessor-map
//! field, record id and uuid included. Sorting compares one field with the
//! root locale collation (numeric fields by value) and is stable; `reversed`
//! swaps the comparator arguments rather than reversing the output, so ties
//! keep their original order in both directions.

use std::{borrow::Cow, cmp::Ordering};

use icu::{
    casemap::CaseMapper,
    collator::{options::CollatorOptions, Collator, CollatorBorrowed},
};
use shared::record::{Entity, FieldSpec};
use tracing::warn;

fn fold(text: &str) -> Cow<'_, str> {
    CaseMapper::new().fold_string(text)
}

/// Records with at least one field containing `query`, in input order.
pub fn filter<E: Entity>(records: Vec<E>, query: &str) -> Vec<E> {
    let query = fold(query.trim());
    if query.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| matches(record, &query))
        .collect()
}

fn matches<E: Entity>(record: &E, folded_query: &str) -> bool {
    E::fields()
        .iter()
        .any(|field| fold(&field.text(record)).contains(folded_query))
}

struct TextOrder(Option<CollatorBorrowed<'static>>);

impl TextOrder {
    fn new() -> Self {
        match Collator::try_new(Default::default(), CollatorOptions::default()) {
            Ok(collator) => Self(Some(collator)),
            Err(err) => {
                warn!(error = %err, "collation data unavailable; sorting by code point");
                Self(None)
            }
        }
    }

    fn compare(&self, left: &str, right: &str) -> Ordering {
        match &self.0 {
            Some(collator) => collator.compare(left, right),
            None => left.cmp(right),
        }
    }

    /// Integer order when both sides parse, collated text otherwise.
    fn compare_numeric(&self, left: &str, right: &str) -> Ordering {
        match (left.trim().parse::<i64>(), right.trim().parse::<i64>()) {
            (Ok(left), Ok(right)) => left.cmp(&right),
            _ => self.compare(left, right),
        }
    }
}

/// Copy of `records` ordered by `key`; input order when there is no key.
pub fn sort<E: Entity>(records: &[E], key: Option<&FieldSpec<E>>, reversed: bool) -> Vec<E> {
    let Some(key) = key else {
        return records.to_vec();
    };
    let order = TextOrder::new();
    let mut keyed: Vec<(Cow<'_, str>, &E)> = records
        .iter()
        .map(|record| (key.text(record), record))
        .collect();
    let compare = |left: &str, right: &str| {
        if key.numeric {
            order.compare_numeric(left, right)
        } else {
            order.compare(left, right)
        }
    };
    keyed.sort_by(|(left, _), (right, _)| {
        if reversed {
            compare(&**right, &**left)
        } else {
            compare(&**left, &**right)
        }
    });
    keyed.into_iter().map(|(_, record)| record.clone()).collect()
}

pub fn derive_view<E: Entity>(
    records: &[E],
    query: &str,
    key: Option<&FieldSpec<E>>,
    reversed: bool,
) -> Vec<E> {
    filter(sort(records, key, reversed), query)
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
