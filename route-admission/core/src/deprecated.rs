use crate::{FieldError, ValidationContext};
use route_admission_k8s_api::RouteSpec;
use tracing::debug;

/// Fields that are still accepted on input for compatibility with older
/// clients but are no longer read.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LegacyField {
    /// `spec.generation`
    Generation,
}

// === impl LegacyField ===

impl LegacyField {
    pub const ROUTE_SPEC: &'static [Self] = &[Self::Generation];

    /// The field's serialized name, relative to its parent.
    pub fn json_name(self) -> &'static str {
        match self {
            Self::Generation => "generation",
        }
    }

    pub fn is_set(self, spec: &RouteSpec) -> bool {
        match self {
            Self::Generation => spec.deprecated_generation != 0,
        }
    }
}

/// Reports every deprecated field of `spec` that is set, unless the context
/// allows deprecated fields.
pub fn check_deprecated(ctx: ValidationContext, spec: &RouteSpec) -> FieldError {
    let set = LegacyField::ROUTE_SPEC
        .iter()
        .copied()
        .filter(|field| field.is_set(spec))
        .map(LegacyField::json_name)
        .collect::<Vec<_>>();

    if set.is_empty() {
        return FieldError::none();
    }

    if ctx.is_deprecated_allowed() {
        debug!(fields = ?set, "Accepting deprecated fields");
        return FieldError::none();
    }

    FieldError::disallowed_fields(set)
}
