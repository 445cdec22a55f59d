//! Predicate evaluation against live entities.
//!
//! This is the executable meaning of a compiled filter: each predicate is
//! checked against one entity by resolving its field path through the
//! [`Entity`] trait. When a path step lands on a collection the walk expands
//! over the elements, so a predicate holds if any expansion satisfies it —
//! observably the same as a distinct select after a left outer join, for the
//! conjunctive per-field filters the compiler emits.

use std::cmp::Ordering;

use exemplar_query::Predicate;
use exemplar_schema::{Entity, Scalar, Value};
use smol_str::SmolStr;

/// Whether `entity` satisfies `predicate`.
pub(crate) fn matches(entity: &dyn Entity, predicate: &Predicate) -> bool {
    let mut candidates = Vec::new();
    resolve(entity, predicate.path().segments(), &mut candidates);

    match predicate {
        Predicate::Eq { value, .. } => any_scalar(&candidates, |s| s == value),
        Predicate::Neq { value, .. } => any_scalar(&candidates, |s| s != value),
        Predicate::Lt { value, .. } => any_ordering(&candidates, value, Ordering::is_lt),
        Predicate::Lte { value, .. } => any_ordering(&candidates, value, Ordering::is_le),
        Predicate::Gt { value, .. } => any_ordering(&candidates, value, Ordering::is_gt),
        Predicate::Gte { value, .. } => any_ordering(&candidates, value, Ordering::is_ge),
        Predicate::Like { pattern, .. } => any_text(&candidates, |text| like_match(pattern, text)),
        Predicate::NotLike { pattern, .. } => {
            any_text(&candidates, |text| !like_match(pattern, text))
        }
        Predicate::In { values, .. } => any_scalar(&candidates, |s| values.contains(s)),
        Predicate::MemberOf { value, .. } => candidates.iter().any(|candidate| match candidate {
            Value::Collection(items) => {
                items.iter().any(|item| item.as_scalar() == Some(value))
            }
            _ => false,
        }),
        Predicate::IsNull { .. } => candidates.iter().all(Value::is_null),
        Predicate::IsNotNull { .. } => candidates.iter().any(|v| !v.is_null()),
        Predicate::IsEmpty { .. } => candidates.iter().all(|candidate| match candidate {
            Value::Collection(items) => items.is_empty(),
            Value::Null => true,
            _ => false,
        }),
        Predicate::IsNotEmpty { .. } => candidates.iter().any(|candidate| match candidate {
            Value::Collection(items) => !items.is_empty(),
            _ => false,
        }),
    }
}

/// Resolve a field path to every value reachable through it, expanding
/// collections along the way. A missing parent contributes a null leaf so
/// null-checks see it.
pub(crate) fn resolve<'a>(entity: &'a dyn Entity, segments: &[SmolStr], out: &mut Vec<Value<'a>>) {
    if segments.is_empty() {
        out.push(Value::Entity(entity));
        return;
    }
    let value = entity.field(&segments[0]);
    descend(value, &segments[1..], out);
}

fn descend<'a>(value: Value<'a>, rest: &[SmolStr], out: &mut Vec<Value<'a>>) {
    if rest.is_empty() {
        out.push(value);
        return;
    }
    match value {
        Value::Entity(nested) => resolve(nested, rest, out),
        Value::Collection(items) => {
            for item in items {
                descend(item, rest, out);
            }
        }
        // A scalar or null partway through the path; the leaf is absent.
        _ => out.push(Value::Null),
    }
}

/// First scalar reachable through the path, for sorting. Returns `None` when
/// the path resolves to nothing comparable.
pub(crate) fn sort_key(entity: &dyn Entity, segments: &[SmolStr]) -> Option<Scalar> {
    let mut candidates = Vec::new();
    resolve(entity, segments, &mut candidates);
    candidates
        .iter()
        .find_map(|v| v.as_scalar().cloned())
}

fn any_scalar(candidates: &[Value<'_>], check: impl Fn(&Scalar) -> bool) -> bool {
    candidates
        .iter()
        .filter_map(Value::as_scalar)
        .any(|s| check(s))
}

fn any_ordering(
    candidates: &[Value<'_>],
    comparand: &Scalar,
    check: impl Fn(Ordering) -> bool,
) -> bool {
    candidates
        .iter()
        .filter_map(Value::as_scalar)
        .any(|s| s.compare(comparand).is_some_and(&check))
}

fn any_text(candidates: &[Value<'_>], check: impl Fn(&str) -> bool) -> bool {
    candidates
        .iter()
        .filter_map(Value::as_scalar)
        .filter_map(Scalar::as_text)
        .any(|t| check(t))
}

/// Case-insensitive `LIKE` match: `%` matches any run of characters, `_`
/// matches exactly one. The compiler lower-cases patterns; the stored value
/// is lower-cased here.
pub(crate) fn like_match(pattern: &str, text: &str) -> bool {
    let text = text.to_lowercase();
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    like_chars(&pattern, &text)
}

fn like_chars(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((&'%', rest)) => (0..=text.len()).any(|skip| like_chars(rest, &text[skip..])),
        Some((&'_', rest)) => !text.is_empty() && like_chars(rest, &text[1..]),
        Some((literal, rest)) => {
            text.first() == Some(literal) && like_chars(rest, &text[1..])
        }
    }
}
