//! Structural validation of declared entity models.
//!
//! Runs once per type, when the metadata cache first derives descriptors.
//! Only declaration bugs are rejected here; operator/value mismatches that
//! depend on runtime values stay a compile-time (best-effort) concern.

use std::collections::HashSet;

use crate::error::{SchemaError, SchemaResult};
use crate::model::EntityModel;

pub(crate) fn validate(entity: &'static str, model: &EntityModel) -> SchemaResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(model.len());
    for def in model.fields() {
        if !seen.insert(def.name.as_str()) {
            return Err(SchemaError::duplicate_field(entity, &def.name));
        }
        if let Some(op) = def.operator {
            if op.requires_collection() && !def.kind.is_collection() {
                return Err(SchemaError::invalid_condition(
                    entity,
                    &def.name,
                    format!("operator {op:?} requires a collection field, kind is {:?}", def.kind),
                ));
            }
        }
    }
    Ok(())
}
