#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod context;
pub mod deprecated;
mod field_error;
pub mod metadata;
pub mod names;
mod route;

pub use self::{
    context::ValidationContext,
    field_error::{FieldError, Kind, Violation},
    route::validate_route,
};
pub use route_admission_k8s_api as k8s;

/// Checks a value against admission-time invariants.
///
/// Implementations report every violation they find rather than stopping at
/// the first one. Returned paths are relative to `self`; callers scope them
/// with [`FieldError::via_field`] and friends.
pub trait Validate {
    fn validate(&self, ctx: ValidationContext) -> FieldError;
}
