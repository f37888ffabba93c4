//! Folds criteria maps and id lookups into predicates.

use crate::domain::criteria::{Criteria, BRAND_FLAGS};
use crate::domain::model::CarId;
use crate::query::predicate::{Clause, Field, Predicate};
use anyhow::anyhow;
use serde_json::Value as JsonValue;
use tracing::debug;

/// Builds the predicate selecting exactly the car with the given id.
///
/// Adapters executing it must hydrate the construction details as well.
pub fn translate_lookup(id: CarId) -> Predicate {
    Predicate::unconstrained().and(Clause::IdIs(id))
}

/// Builds a search predicate by folding the criteria in fixed precedence:
/// the construction substring first, then the brand flags, then everything
/// else as exact equality. The first clause is the base of the predicate and
/// each later clause is conjoined.
///
/// Keys must have been validated by the read service; a key that survives
/// validation but still has no column is reported as a store-level failure.
/// Construction values that are not strings and flag values that are not
/// `true`/`"true"` contribute no clause.
pub fn translate_search(criteria: &Criteria) -> anyhow::Result<Predicate> {
    debug!(%criteria, "translating search criteria");

    let mut predicate = Predicate::unconstrained();

    if let Some(value) = criteria.get("construction") {
        if let Some(needle) = value.as_str() {
            predicate = predicate.and(Clause::ModelContains(needle.to_string()));
        }
    }

    for (flag, keyword) in BRAND_FLAGS {
        if criteria.get(flag).map(is_truthy).unwrap_or(false) {
            predicate = predicate.and(Clause::HasTag((*keyword).to_string()));
        }
    }

    for (key, value) in criteria.iter() {
        if key == "construction" || BRAND_FLAGS.iter().any(|(flag, _)| *flag == key) {
            continue;
        }
        let field =
            Field::parse(key).ok_or_else(|| anyhow!("no column for criteria key: {key}"))?;
        predicate = predicate.and(Clause::Eq(field, field.coerce(value)?));
    }

    Ok(predicate)
}

fn is_truthy(value: &JsonValue) -> bool {
    value.as_bool() == Some(true) || value.as_str() == Some("true")
}
