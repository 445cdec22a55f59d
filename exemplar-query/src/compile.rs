//! The predicate compiler: example object graph in, conjunctive filter out.
//!
//! [`compile`] walks the populated fields of an example entity depth-first
//! and emits one [`Predicate`] per field that carries a real value, applying
//! the default rule (strings → case-insensitive LIKE, everything else →
//! equality) or the field's declared operator. The walk is read-only,
//! call-local, and deterministic for a fixed example; cyclic object graphs
//! are pruned by object identity.
//!
//! The compiler is best-effort: an operator that cannot apply to the value
//! it finds drops that clause with a debug note instead of failing the whole
//! query. The only hard error a value can cause is an `IN` probe that is not
//! a collection.

use std::collections::HashSet;
use std::fmt::Write;

use exemplar_schema::{
    ConditionDef, Entity, FieldDef, FieldKind, MetadataCache, Operator, PrimitiveKind, Scalar,
    Value,
};
use tracing::debug;

use crate::classify::{classify, is_value_type_collection, Classification};
use crate::error::{QueryError, QueryResult};
use crate::predicate::{CompiledFilter, FieldPath, Predicate};
use crate::zero::is_zero_value;

/// Compile an example into a conjunctive filter, using the process-wide
/// metadata cache.
///
/// An example with every field unset (null or primitive zero) compiles to an
/// empty filter, which backends interpret as "match everything".
///
/// # Examples
///
/// ```rust
/// use exemplar_query::{compile, Predicate};
/// use exemplar_schema::{Entity, EntityModel, FieldDef, Value};
///
/// #[derive(Default)]
/// struct Tag {
///     label: Option<String>,
/// }
///
/// impl Entity for Tag {
///     fn entity_name(&self) -> &'static str {
///         "doc::Tag"
///     }
///     fn model(&self) -> EntityModel {
///         EntityModel::new().field(FieldDef::scalar("label"))
///     }
///     fn field(&self, name: &str) -> Value<'_> {
///         match name {
///             "label" => self.label.as_deref().into(),
///             _ => Value::Null,
///         }
///     }
/// }
///
/// let filter = compile(&Tag { label: Some("  Rust  ".into()) }).unwrap();
/// assert!(matches!(&filter.predicates[0], Predicate::Like { pattern, .. } if pattern == "rust"));
/// assert_eq!(filter.trace, "doc::Tag.label LIKE 'rust'");
///
/// let empty = compile(&Tag::default()).unwrap();
/// assert!(empty.is_empty());
/// ```
pub fn compile(example: &dyn Entity) -> QueryResult<CompiledFilter> {
    compile_with(MetadataCache::global(), example)
}

/// Compile an example against an explicit metadata cache.
pub fn compile_with(cache: &MetadataCache, example: &dyn Entity) -> QueryResult<CompiledFilter> {
    let mut walker = Walker {
        cache,
        predicates: Vec::new(),
        trace: String::new(),
        visited: HashSet::new(),
    };
    walker.walk(example, &FieldPath::root(), example.entity_name())?;
    let filter = CompiledFilter {
        predicates: walker.predicates,
        trace: walker.trace,
    };
    debug!(
        entity = example.entity_name(),
        predicates = filter.len(),
        trace = %filter.trace,
        "compiled example filter"
    );
    Ok(filter)
}

/// State of one compile call. Never shared; a fresh walker per call keeps
/// concurrent compiles independent.
struct Walker<'c> {
    cache: &'c MetadataCache,
    predicates: Vec<Predicate>,
    trace: String,
    /// Entities already walked, by pointer identity and type name. The name
    /// disambiguates an embedded entity stored at offset 0 of its parent,
    /// which shares the parent's address without being a back-reference.
    visited: HashSet<(*const (), &'static str)>,
}

impl Walker<'_> {
    /// Walk one entity: default-rule fields first, declared conditions after,
    /// both in declaration order.
    ///
    /// `prefix` is the predicate path down from the query root; `label` is
    /// the trace prefix, which starts at the root entity name and restarts at
    /// the field name when a collection join is opened.
    fn walk(&mut self, entity: &dyn Entity, prefix: &FieldPath, label: &str) -> QueryResult<()> {
        let key = (std::ptr::from_ref(entity).cast::<()>(), entity.entity_name());
        if !self.visited.insert(key) {
            debug!(entity = entity.entity_name(), "cyclic reference, pruning recursion");
            return Ok(());
        }

        let meta = self.cache.describe(entity)?;
        for def in meta.fields() {
            if def.excluded || def.operator.is_some() {
                continue;
            }
            self.walk_field(entity, def, prefix, label)?;
        }
        for cond in meta.conditions() {
            if cond.excluded {
                continue;
            }
            self.walk_condition(entity, cond, prefix, label)?;
        }
        Ok(())
    }

    fn walk_field(
        &mut self,
        entity: &dyn Entity,
        def: &FieldDef,
        prefix: &FieldPath,
        label: &str,
    ) -> QueryResult<()> {
        let value = entity.field(&def.name);
        if value.is_null() {
            return Ok(());
        }
        if self.zero_suppressed(def.primitive, def.allow_zero, &value) {
            debug!(field = %def.name, "primitive zero value, not filtering");
            return Ok(());
        }

        match classify(&value) {
            Classification::Null | Classification::EmptyCollection => {}
            Classification::ValueCollection => {
                // Membership only applies to declared element collections;
                // leaf values inside an association collection have no
                // column to compare against.
                if def.kind == FieldKind::ElementCollection {
                    self.emit_membership(value, prefix, label, &def.name);
                } else {
                    debug!(field = %def.name, "value collection on a non-element field, skipping");
                }
            }
            Classification::EntityCollection | Classification::MixedCollection => {
                // Joins are only valid one level from the query root; deeper
                // joins would make the generated query non-linear.
                if prefix.is_root() && def.kind.is_collection() {
                    let join = FieldPath::new(def.name.clone());
                    if let Value::Collection(items) = value {
                        for item in items {
                            if let Value::Entity(element) = item {
                                self.walk(element, &join, &def.name)?;
                            }
                        }
                    }
                } else {
                    debug!(field = %def.name, "entity collection below the query root, skipping");
                }
            }
            Classification::ValueType => {
                if let Value::Scalar(scalar) = value {
                    self.emit_default_scalar(def, prefix, label, scalar);
                }
            }
            Classification::EntityType => {
                if matches!(def.kind, FieldKind::ToOne | FieldKind::Embedded) {
                    if let Value::Entity(nested) = value {
                        let child_label = format!("{label}.{}", def.name);
                        self.walk(nested, &prefix.child(def.name.as_str()), &child_label)?;
                    }
                } else {
                    debug!(field = %def.name, "entity value on a non-association field, skipping");
                }
            }
        }
        Ok(())
    }

    /// Default rule for one scalar: strings that are not identifiers compare
    /// case-insensitively by LIKE on the trimmed lower-cased operand (no
    /// wildcards injected), everything else by equality.
    fn emit_default_scalar(
        &mut self,
        def: &FieldDef,
        prefix: &FieldPath,
        label: &str,
        scalar: Scalar,
    ) {
        let path = prefix.child(def.name.as_str());
        if let Scalar::Text(text) = &scalar {
            if !def.identifier {
                let pattern = text.trim().to_lowercase();
                self.log_clause(label, &def.name, "LIKE", format_args!("'{pattern}'"));
                self.predicates.push(Predicate::Like { path, pattern });
                return;
            }
        }
        self.log_clause(label, &def.name, "=", format_args!("{scalar}"));
        self.predicates.push(Predicate::Eq { path, value: scalar });
    }

    /// One MEMBER_OF predicate per element of a leaf-value collection.
    fn emit_membership(&mut self, value: Value<'_>, prefix: &FieldPath, label: &str, field: &str) {
        let Value::Collection(items) = value else {
            return;
        };
        let path = prefix.child(field);
        for item in items {
            if let Value::Scalar(element) = item {
                self.log_member_of(label, field, &element);
                self.predicates.push(Predicate::MemberOf {
                    path: path.clone(),
                    value: element,
                });
            }
        }
    }

    fn walk_condition(
        &mut self,
        entity: &dyn Entity,
        cond: &ConditionDef,
        prefix: &FieldPath,
        label: &str,
    ) -> QueryResult<()> {
        let value = entity.field(&cond.field);
        // Null never filters, even for operators that ignore the value: a
        // null-check or emptiness-check activates only once the caller
        // stores some non-null marker in the field.
        if value.is_null() {
            return Ok(());
        }
        if self.zero_suppressed(cond.primitive, cond.allow_zero, &value) {
            debug!(field = %cond.field, "primitive zero value, not filtering");
            return Ok(());
        }

        let path = prefix.child(cond.field.as_str());
        match cond.operator {
            Operator::Eq | Operator::Neq => {
                if let Value::Scalar(scalar) = value {
                    let symbol = cond.operator.as_str();
                    self.log_clause(label, &cond.field, symbol, format_args!("{scalar}"));
                    self.predicates.push(match cond.operator {
                        Operator::Eq => Predicate::Eq { path, value: scalar },
                        _ => Predicate::Neq { path, value: scalar },
                    });
                } else {
                    self.skip(cond, "not a leaf value");
                }
            }
            Operator::Like | Operator::NotLike => {
                if let Value::Scalar(Scalar::Text(text)) = value {
                    let pattern = text.trim().to_lowercase();
                    let symbol = cond.operator.as_str();
                    self.log_clause(label, &cond.field, symbol, format_args!("'{pattern}'"));
                    self.predicates.push(match cond.operator {
                        Operator::Like => Predicate::Like { path, pattern },
                        _ => Predicate::NotLike { path, pattern },
                    });
                } else {
                    self.skip(cond, "pattern match needs a string value");
                }
            }
            Operator::Lt | Operator::Lte | Operator::Gt | Operator::Gte => {
                match value {
                    Value::Scalar(scalar) if scalar.supports_ordering() => {
                        let symbol = cond.operator.as_str();
                        self.log_clause(label, &cond.field, symbol, format_args!("{scalar}"));
                        self.predicates.push(match cond.operator {
                            Operator::Lt => Predicate::Lt { path, value: scalar },
                            Operator::Lte => Predicate::Lte { path, value: scalar },
                            Operator::Gt => Predicate::Gt { path, value: scalar },
                            _ => Predicate::Gte { path, value: scalar },
                        });
                    }
                    _ => self.skip(cond, "value does not support ordering"),
                }
            }
            Operator::In => match value {
                Value::Collection(items) => {
                    if items.is_empty() {
                        self.skip(cond, "empty IN probe");
                    } else if is_value_type_collection(&items) {
                        let values: Vec<Scalar> = items
                            .into_iter()
                            .filter_map(|item| match item {
                                Value::Scalar(scalar) => Some(scalar),
                                _ => None,
                            })
                            .collect();
                        self.log_in(label, &cond.field, &values);
                        self.predicates.push(Predicate::In { path, values });
                    } else {
                        self.skip(cond, "IN probe holds nulls or entities");
                    }
                }
                _ => {
                    return Err(QueryError::invalid_filter(
                        &cond.field,
                        "IN requires a collection of leaf values",
                    ));
                }
            },
            Operator::MemberOf => match value {
                Value::Scalar(element) => {
                    self.log_member_of(label, &cond.field, &element);
                    self.predicates.push(Predicate::MemberOf { path, value: element });
                }
                Value::Collection(items) if is_value_type_collection(&items) => {
                    self.emit_membership(Value::Collection(items), prefix, label, &cond.field);
                }
                _ => self.skip(cond, "membership needs leaf values"),
            },
            Operator::IsNull | Operator::IsNotNull | Operator::IsEmpty | Operator::IsNotEmpty => {
                let symbol = cond.operator.as_str();
                self.log_bare(label, &cond.field, symbol);
                self.predicates.push(match cond.operator {
                    Operator::IsNull => Predicate::IsNull { path },
                    Operator::IsNotNull => Predicate::IsNotNull { path },
                    Operator::IsEmpty => Predicate::IsEmpty { path },
                    _ => Predicate::IsNotEmpty { path },
                });
            }
        }
        Ok(())
    }

    fn zero_suppressed(
        &self,
        primitive: Option<PrimitiveKind>,
        allow_zero: bool,
        value: &Value<'_>,
    ) -> bool {
        if allow_zero {
            return false;
        }
        match (primitive, value.as_scalar()) {
            (Some(kind), Some(scalar)) => is_zero_value(kind, scalar),
            _ => false,
        }
    }

    fn skip(&self, cond: &ConditionDef, reason: &str) {
        debug!(field = %cond.field, operator = %cond.operator, reason, "unsupported condition, skipping");
    }

    // Trace clauses, joined with " AND ". String comparands are quoted by
    // the callers; membership renders reversed: `value MEMBER OF path`.

    fn separator(&mut self) {
        if !self.trace.is_empty() {
            self.trace.push_str(" AND ");
        }
    }

    fn log_clause(&mut self, label: &str, field: &str, symbol: &str, value: std::fmt::Arguments<'_>) {
        self.separator();
        let _ = write!(self.trace, "{label}.{field} {symbol} {value}");
    }

    fn log_bare(&mut self, label: &str, field: &str, symbol: &str) {
        self.separator();
        let _ = write!(self.trace, "{label}.{field} {symbol}");
    }

    fn log_member_of(&mut self, label: &str, field: &str, element: &Scalar) {
        self.separator();
        let _ = write!(self.trace, "{element} MEMBER OF {label}.{field}");
    }

    fn log_in(&mut self, label: &str, field: &str, values: &[Scalar]) {
        self.separator();
        let _ = write!(self.trace, "{label}.{field} IN [");
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.trace.push_str(", ");
            }
            let _ = write!(self.trace, "{value}");
        }
        self.trace.push(']');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exemplar_schema::EntityModel;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::cell::Cell;

    #[derive(Default, Clone)]
    struct Participator {
        id: Option<String>,
        name: Option<String>,
        activated: bool,
        login_names: Vec<String>,
    }

    impl Entity for Participator {
        fn entity_name(&self) -> &'static str {
            "compile::tests::Participator"
        }

        fn model(&self) -> EntityModel {
            EntityModel::new()
                .field(FieldDef::scalar("id").identifier())
                .field(FieldDef::scalar("name"))
                .field(FieldDef::primitive("activated", PrimitiveKind::Bool))
                .field(FieldDef::element_collection("login_names"))
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "id" => self.id.as_deref().into(),
                "name" => self.name.as_deref().into(),
                "activated" => Value::scalar(self.activated),
                "login_names" if self.login_names.is_empty() => Value::Null,
                "login_names" => Value::scalars(self.login_names.iter().map(String::as_str)),
                _ => Value::Null,
            }
        }
    }

    #[derive(Default, Clone)]
    struct Tag {
        label: Option<String>,
    }

    impl Entity for Tag {
        fn entity_name(&self) -> &'static str {
            "compile::tests::Tag"
        }

        fn model(&self) -> EntityModel {
            EntityModel::new().field(FieldDef::scalar("label"))
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "label" => self.label.as_deref().into(),
                _ => Value::Null,
            }
        }
    }

    #[derive(Default, Clone)]
    struct Bid {
        amount: Option<Decimal>,
        tags: Vec<Tag>,
    }

    impl Entity for Bid {
        fn entity_name(&self) -> &'static str {
            "compile::tests::Bid"
        }

        fn model(&self) -> EntityModel {
            EntityModel::new()
                .field(FieldDef::scalar("amount"))
                .field(FieldDef::to_many("tags"))
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "amount" => self.amount.into(),
                "tags" if self.tags.is_empty() => Value::Null,
                "tags" => Value::entities(&self.tags),
                _ => Value::Null,
            }
        }
    }

    #[derive(Default)]
    struct Item {
        name: Option<String>,
        version: Option<i64>,
        approved: bool,
        score: f64,
        buy_now_price: Option<Decimal>,
        status: Option<&'static str>,
        ends_soon: Option<bool>,
        seller: Option<Participator>,
        bids: Vec<Bid>,
    }

    impl Entity for Item {
        fn entity_name(&self) -> &'static str {
            "compile::tests::Item"
        }

        fn model(&self) -> EntityModel {
            EntityModel::new()
                .field(FieldDef::scalar("name"))
                .field(FieldDef::scalar("version").excluded())
                .field(FieldDef::primitive("approved", PrimitiveKind::Bool))
                .field(FieldDef::primitive("score", PrimitiveKind::F64))
                .field(FieldDef::scalar("buy_now_price").operator(Operator::Gte))
                .field(FieldDef::scalar("status").operator(Operator::Gt))
                .field(FieldDef::scalar("ends_soon").operator(Operator::IsNotNull))
                .field(FieldDef::to_one("seller"))
                .field(FieldDef::to_many("bids"))
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "name" => self.name.as_deref().into(),
                "version" => self.version.into(),
                "approved" => Value::scalar(self.approved),
                "score" => Value::scalar(self.score),
                "buy_now_price" => self.buy_now_price.into(),
                "status" => self.status.map_or(Value::Null, |s| Scalar::enumeration(s).into()),
                "ends_soon" => self.ends_soon.into(),
                "seller" => Value::entity_opt(self.seller.as_ref()),
                "bids" if self.bids.is_empty() => Value::Null,
                "bids" => Value::entities(&self.bids),
                _ => Value::Null,
            }
        }
    }

    /// IN probe whose runtime shape varies per test.
    struct Probe {
        qty: Value<'static>,
    }

    impl Entity for Probe {
        fn entity_name(&self) -> &'static str {
            "compile::tests::Probe"
        }

        fn model(&self) -> EntityModel {
            EntityModel::new().field(FieldDef::scalar("qty").operator(Operator::In))
        }

        fn field(&self, name: &str) -> Value<'_> {
            match (name, &self.qty) {
                ("qty", Value::Null) => Value::Null,
                ("qty", Value::Scalar(s)) => Value::Scalar(s.clone()),
                ("qty", Value::Collection(items)) => Value::Collection(
                    items
                        .iter()
                        .map(|v| match v {
                            Value::Scalar(s) => Value::Scalar(s.clone()),
                            _ => Value::Null,
                        })
                        .collect(),
                ),
                _ => Value::Null,
            }
        }
    }

    fn compile_fresh(example: &dyn Entity) -> QueryResult<CompiledFilter> {
        compile_with(&MetadataCache::new(), example)
    }

    // ========== Default Rule Tests ==========

    #[test]
    fn test_all_default_example_matches_everything() {
        let filter = compile_fresh(&Item::default()).unwrap();
        assert!(filter.is_empty());
        assert_eq!(filter.trace, "");
    }

    #[test]
    fn test_primitive_zero_equals_unset() {
        let unset = compile_fresh(&Item::default()).unwrap();
        let zeroed = compile_fresh(&Item {
            approved: false,
            ..Item::default()
        })
        .unwrap();
        assert_eq!(unset.predicates, zeroed.predicates);
    }

    #[test]
    fn test_primitive_set_emits_equality() {
        let filter = compile_fresh(&Item {
            approved: true,
            ..Item::default()
        })
        .unwrap();
        assert_eq!(
            filter.predicates,
            vec![Predicate::Eq {
                path: "approved".into(),
                value: Scalar::Bool(true),
            }]
        );
        assert_eq!(filter.trace, "compile::tests::Item.approved = true");
    }

    struct Flagged {
        seen: bool,
    }

    impl Entity for Flagged {
        fn entity_name(&self) -> &'static str {
            "compile::tests::Flagged"
        }

        fn model(&self) -> EntityModel {
            EntityModel::new()
                .field(FieldDef::primitive("seen", PrimitiveKind::Bool).allow_zero())
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "seen" => Value::scalar(self.seen),
                _ => Value::Null,
            }
        }
    }

    #[test]
    fn test_allow_zero_keeps_the_zero_condition() {
        let filter = compile_fresh(&Flagged { seen: false }).unwrap();
        assert_eq!(
            filter.predicates,
            vec![Predicate::Eq {
                path: "seen".into(),
                value: Scalar::Bool(false),
            }]
        );
    }

    #[test]
    fn test_double_near_zero_is_suppressed() {
        let filter = compile_fresh(&Item {
            score: 0.000001,
            ..Item::default()
        })
        .unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_string_compiles_to_trimmed_lowered_like() {
        let filter = compile_fresh(&Item {
            name: Some("  aBc  ".into()),
            ..Item::default()
        })
        .unwrap();
        assert_eq!(
            filter.predicates,
            vec![Predicate::Like {
                path: "name".into(),
                pattern: "abc".into(),
            }]
        );
        assert_eq!(filter.trace, "compile::tests::Item.name LIKE 'abc'");
    }

    #[test]
    fn test_identifier_string_compiles_to_equality() {
        let filter = compile_fresh(&Participator {
            id: Some("P-001".into()),
            ..Participator::default()
        })
        .unwrap();
        assert_eq!(
            filter.predicates,
            vec![Predicate::Eq {
                path: "id".into(),
                value: Scalar::Text("P-001".into()),
            }]
        );
    }

    #[test]
    fn test_excluded_field_never_contributes() {
        let filter = compile_fresh(&Item {
            version: Some(9),
            ..Item::default()
        })
        .unwrap();
        assert!(filter.is_empty());
    }

    // ========== Collection Tests ==========

    #[test]
    fn test_element_collection_emits_member_of_per_element() {
        let filter = compile_fresh(&Participator {
            login_names: vec!["alice".into(), "bob".into()],
            ..Participator::default()
        })
        .unwrap();
        assert_eq!(
            filter.predicates,
            vec![
                Predicate::MemberOf {
                    path: "login_names".into(),
                    value: Scalar::Text("alice".into()),
                },
                Predicate::MemberOf {
                    path: "login_names".into(),
                    value: Scalar::Text("bob".into()),
                },
            ]
        );
        assert_eq!(
            filter.trace,
            "'alice' MEMBER OF compile::tests::Participator.login_names \
             AND 'bob' MEMBER OF compile::tests::Participator.login_names"
        );
    }

    #[test]
    fn test_entity_collection_joins_at_root() {
        let filter = compile_fresh(&Item {
            bids: vec![Bid {
                amount: Some(Decimal::new(500, 0)),
                tags: vec![],
            }],
            ..Item::default()
        })
        .unwrap();
        assert_eq!(
            filter.predicates,
            vec![Predicate::Eq {
                path: FieldPath::new("bids").child("amount"),
                value: Scalar::Decimal(Decimal::new(500, 0)),
            }]
        );
        assert_eq!(filter.trace, "bids.amount = 500");
    }

    #[test]
    fn test_entity_collection_below_root_is_skipped() {
        let filter = compile_fresh(&Item {
            bids: vec![Bid {
                amount: None,
                tags: vec![Tag {
                    label: Some("rare".into()),
                }],
            }],
            ..Item::default()
        })
        .unwrap();
        assert!(filter.is_empty());
    }

    // ========== Nested Entity Tests ==========

    #[test]
    fn test_to_one_recursion_extends_the_path() {
        let filter = compile_fresh(&Item {
            seller: Some(Participator {
                name: Some("Alice".into()),
                ..Participator::default()
            }),
            ..Item::default()
        })
        .unwrap();
        assert_eq!(
            filter.predicates,
            vec![Predicate::Like {
                path: FieldPath::new("seller").child("name"),
                pattern: "alice".into(),
            }]
        );
        assert_eq!(filter.trace, "compile::tests::Item.seller.name LIKE 'alice'");
    }

    #[test]
    fn test_clauses_join_with_and() {
        let filter = compile_fresh(&Item {
            name: Some("chair".into()),
            approved: true,
            ..Item::default()
        })
        .unwrap();
        assert_eq!(
            filter.trace,
            "compile::tests::Item.name LIKE 'chair' AND compile::tests::Item.approved = true"
        );
    }

    // ========== Custom Condition Tests ==========

    #[test]
    fn test_gte_condition() {
        let filter = compile_fresh(&Item {
            buy_now_price: Some(Decimal::new(100, 0)),
            ..Item::default()
        })
        .unwrap();
        assert_eq!(
            filter.predicates,
            vec![Predicate::Gte {
                path: "buy_now_price".into(),
                value: Scalar::Decimal(Decimal::new(100, 0)),
            }]
        );
        assert_eq!(filter.trace, "compile::tests::Item.buy_now_price >= 100");
    }

    #[test]
    fn test_ordering_on_unordered_scalar_is_dropped() {
        let filter = compile_fresh(&Item {
            status: Some("OPEN"),
            ..Item::default()
        })
        .unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_null_check_activates_on_any_marker() {
        let unset = compile_fresh(&Item::default()).unwrap();
        assert!(unset.is_empty());

        let armed = compile_fresh(&Item {
            ends_soon: Some(true),
            ..Item::default()
        })
        .unwrap();
        assert_eq!(
            armed.predicates,
            vec![Predicate::IsNotNull {
                path: "ends_soon".into(),
            }]
        );
        assert_eq!(armed.trace, "compile::tests::Item.ends_soon IS NOT NULL");
    }

    // ========== IN Tests ==========

    #[test]
    fn test_in_expands_the_probe_collection() {
        let probe = Probe {
            qty: Value::Collection(vec![
                Value::Scalar(Scalar::Int(1)),
                Value::Scalar(Scalar::Int(2)),
                Value::Scalar(Scalar::Int(3)),
            ]),
        };
        let filter = compile_fresh(&probe).unwrap();
        assert_eq!(
            filter.predicates,
            vec![Predicate::In {
                path: "qty".into(),
                values: vec![Scalar::Int(1), Scalar::Int(2), Scalar::Int(3)],
            }]
        );
        assert_eq!(filter.trace, "compile::tests::Probe.qty IN [1, 2, 3]");
    }

    #[test]
    fn test_in_on_scalar_fails_fast() {
        let probe = Probe {
            qty: Value::Scalar(Scalar::Int(7)),
        };
        let err = compile_fresh(&probe).unwrap_err();
        assert!(err.is_invalid_filter());
    }

    #[test]
    fn test_in_on_empty_or_tainted_probe_is_dropped() {
        let empty = Probe {
            qty: Value::Collection(vec![]),
        };
        assert!(compile_fresh(&empty).unwrap().is_empty());

        let tainted = Probe {
            qty: Value::Collection(vec![Value::Scalar(Scalar::Int(1)), Value::Null]),
        };
        assert!(compile_fresh(&tainted).unwrap().is_empty());
    }

    // ========== Cycle Tests ==========

    struct Node<'n> {
        name: Option<String>,
        next: Cell<Option<&'n Node<'n>>>,
    }

    impl<'n> Node<'n> {
        fn new(name: &str) -> Self {
            Node {
                name: Some(name.to_string()),
                next: Cell::new(None),
            }
        }
    }

    impl Entity for Node<'_> {
        fn entity_name(&self) -> &'static str {
            "compile::tests::Node"
        }

        fn model(&self) -> EntityModel {
            EntityModel::new()
                .field(FieldDef::scalar("name"))
                .field(FieldDef::to_one("next"))
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "name" => self.name.as_deref().into(),
                "next" => match self.next.get() {
                    Some(node) => Value::Entity(node),
                    None => Value::Null,
                },
                _ => Value::Null,
            }
        }
    }

    #[test]
    fn test_cyclic_graph_terminates_visiting_each_node_once() {
        let a = Node::new("alpha");
        let b = Node::new("beta");
        a.next.set(Some(&b));
        b.next.set(Some(&a));

        let filter = compile_fresh(&a).unwrap();
        assert_eq!(
            filter.predicates,
            vec![
                Predicate::Like {
                    path: "name".into(),
                    pattern: "alpha".into(),
                },
                Predicate::Like {
                    path: FieldPath::new("next").child("name"),
                    pattern: "beta".into(),
                },
            ]
        );
    }

    #[derive(Default)]
    struct Residence {
        city: Option<String>,
    }

    impl Entity for Residence {
        fn entity_name(&self) -> &'static str {
            "compile::tests::Residence"
        }

        fn model(&self) -> EntityModel {
            EntityModel::new().field(FieldDef::scalar("city"))
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "city" => self.city.as_deref().into(),
                _ => Value::Null,
            }
        }
    }

    /// The embedded value is the first field, so it shares its parent's
    /// address; it must still be walked, not pruned as a back-reference.
    #[derive(Default)]
    struct Person {
        address: Residence,
    }

    impl Entity for Person {
        fn entity_name(&self) -> &'static str {
            "compile::tests::Person"
        }

        fn model(&self) -> EntityModel {
            EntityModel::new().field(FieldDef::embedded("address"))
        }

        fn field(&self, name: &str) -> Value<'_> {
            match name {
                "address" => Value::entity(&self.address),
                _ => Value::Null,
            }
        }
    }

    #[test]
    fn test_embedded_entity_at_parent_offset_zero_is_walked() {
        let person = Person {
            address: Residence {
                city: Some("Hamburg".into()),
            },
        };
        let filter = compile_fresh(&person).unwrap();
        assert_eq!(
            filter.predicates,
            vec![Predicate::Like {
                path: FieldPath::new("address").child("city"),
                pattern: "hamburg".into(),
            }]
        );
        assert_eq!(filter.trace, "compile::tests::Person.address.city LIKE 'hamburg'");
    }

    #[test]
    fn test_self_reference_terminates() {
        let a = Node::new("alpha");
        a.next.set(Some(&a));
        let filter = compile_fresh(&a).unwrap();
        assert_eq!(filter.len(), 1);
    }
}
