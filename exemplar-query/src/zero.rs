//! Zero-value suppression for primitive fields.
//!
//! A field whose Rust type cannot encode "unset" (a bare `bool`, `i32`, ...)
//! always reports a value, so its default is read as "caller did not intend
//! to filter here" and dropped, unless the field is annotated allow-zero.
//! Fields declared without a [`PrimitiveKind`] signal absence through
//! `Value::Null` and are never suppressed by this policy.

use exemplar_schema::{PrimitiveKind, Scalar};

/// Tolerance under which an `f64` counts as zero.
const F64_ZERO_TOLERANCE: f64 = 0.00001;

/// Tolerance under which an `f32` counts as zero.
const F32_ZERO_TOLERANCE: f32 = 0.001;

/// Whether `value` is the zero value of the declared primitive kind.
///
/// A kind/value mismatch is a schema declaration bug; it returns `false`
/// so the condition survives rather than silently vanishing.
///
/// # Examples
///
/// ```rust
/// use exemplar_query::is_zero_value;
/// use exemplar_schema::{PrimitiveKind, Scalar};
///
/// assert!(is_zero_value(PrimitiveKind::I32, &Scalar::Int(0)));
/// assert!(is_zero_value(PrimitiveKind::Bool, &Scalar::Bool(false)));
/// assert!(!is_zero_value(PrimitiveKind::I32, &Scalar::Int(7)));
/// ```
pub fn is_zero_value(kind: PrimitiveKind, value: &Scalar) -> bool {
    match (kind, value) {
        (PrimitiveKind::Bool, Scalar::Bool(v)) => !v,
        (PrimitiveKind::Char, Scalar::Char(v)) => *v == '\0',
        (
            PrimitiveKind::I8
            | PrimitiveKind::I16
            | PrimitiveKind::I32
            | PrimitiveKind::I64
            | PrimitiveKind::U8
            | PrimitiveKind::U16
            | PrimitiveKind::U32,
            Scalar::Int(v),
        ) => *v == 0,
        (PrimitiveKind::F32, Scalar::Float(v)) => v.abs() < F32_ZERO_TOLERANCE,
        (PrimitiveKind::F64, Scalar::Double(v)) => v.abs() < F64_ZERO_TOLERANCE,
        _ => false,
    }
}
