//! Query evaluation for in-memory document filtering.
//!
//! Stored documents are evaluated in their stored form: the identifier separately
//! from the fields mapping.

use std::{cmp::Ordering, collections::HashMap, convert::Infallible};
use bson::{Bson, Document, datetime::DateTime};

use docshim_core::{
    document::resolve_path,
    query::{Query, QueryVisitor},
};


/// Comparable view of BSON values.
///
/// Normalizes every numeric type to f64 so that `12` stored as Int64 equals `12`
/// queried as Int32. Values of different kinds never compare equal.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value (all integers and floats normalized to f64)
    Number(f64),
    /// DateTime value
    DateTime(DateTime),
    /// String value
    String(&'a str),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map/Object of comparable values
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Anything else, compared by raw equality
    Other(&'a Bson),
}

impl<'a> Comparable<'a> {
    /// Sort rank of each kind, used to order values of different kinds.
    fn rank(&self) -> u8 {
        match self {
            Comparable::Null => 0,
            Comparable::Number(_) => 1,
            Comparable::String(_) => 2,
            Comparable::Map(_) => 3,
            Comparable::Array(_) => 4,
            Comparable::Bool(_) => 5,
            Comparable::DateTime(_) => 6,
            Comparable::Other(_) => 7,
        }
    }

    /// Total order over values: kind rank first, then value within a kind.
    ///
    /// NaN sorts before every other number and equals itself. Arrays compare
    /// element by element, maps entry by entry in key order.
    pub(crate) fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => Ordering::Equal,
            (Comparable::Bool(a), Comparable::Bool(b)) => a.cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => compare_numbers(*a, *b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.cmp(b),
            (Comparable::Array(a), Comparable::Array(b)) => compare_sequences(a, b),
            (Comparable::Map(a), Comparable::Map(b)) => compare_maps(a, b),
            (Comparable::Other(a), Comparable::Other(b)) => compare_raw(a, b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn compare_numbers(left: f64, right: f64) -> Ordering {
    match (left.is_nan(), right.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => left
            .partial_cmp(&right)
            .unwrap_or(Ordering::Equal),
    }
}

fn compare_sequences(left: &[Comparable<'_>], right: &[Comparable<'_>]) -> Ordering {
    left.iter()
        .zip(right)
        .map(|(l, r)| l.total_cmp(r))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| left.len().cmp(&right.len()))
}

fn compare_maps<'a>(left: &HashMap<&'a str, Comparable<'a>>, right: &HashMap<&'a str, Comparable<'a>>) -> Ordering {
    let (left, right) = (sorted_entries(left), sorted_entries(right));

    left.iter()
        .zip(&right)
        .map(|(l, r)| l.0.cmp(r.0).then_with(|| l.1.total_cmp(r.1)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| left.len().cmp(&right.len()))
}

fn sorted_entries<'m, 'a>(map: &'m HashMap<&'a str, Comparable<'a>>) -> Vec<(&'a str, &'m Comparable<'a>)> {
    let mut entries = map
        .iter()
        .map(|(key, value)| (*key, value))
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

// Binary, ObjectId, Regex and friends have no natural order; group them by
// element type and fall back to their debug rendering.
fn compare_raw(left: &Bson, right: &Bson) -> Ordering {
    (left.element_type() as u8)
        .cmp(&(right.element_type() as u8))
        .then_with(|| format!("{left:?}").cmp(&format!("{right:?}")))
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => Some(Ordering::Equal),
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

/// Equality used by queries and update operators.
pub(crate) fn values_equal(left: &Bson, right: &Bson) -> bool {
    Comparable::from(left) == Comparable::from(right)
}


pub(crate) struct DocumentEvaluator<'a> {
    id: &'a str,
    fields: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(id: &'a str, fields: &'a Document) -> Self {
        Self { id, fields }
    }

    /// Returns true if every clause of `query` holds for this document.
    pub fn matches(&mut self, query: &Query) -> bool {
        query
            .clauses
            .iter()
            .all(|clause| {
                let Ok(matched) = self.visit_clause(clause);
                matched
            })
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = Infallible;

    fn visit_id(&mut self, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(value.as_str() == Some(self.id))
    }

    fn visit_exact(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(
            self.fields
                .get(field)
                .is_some_and(|field_value| values_equal(field_value, value))
        )
    }

    fn visit_path_exists(&mut self, path: &[String]) -> Result<Self::Output, Self::Error> {
        Ok(resolve_path(self.fields, path).is_some())
    }

    fn visit_path_any_of(&mut self, path: &[String], candidates: &[Bson]) -> Result<Self::Output, Self::Error> {
        match resolve_path(self.fields, path) {
            Some(Bson::Array(array)) => Ok(
                candidates
                    .iter()
                    .any(|candidate| array.iter().any(|item| values_equal(item, candidate)))
            ),
            Some(single_value) => Ok(
                candidates
                    .iter()
                    .any(|candidate| values_equal(single_value, candidate))
            ),
            None => Ok(false),
        }
    }
}
