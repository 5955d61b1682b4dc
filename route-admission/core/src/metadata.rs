use crate::{names, FieldError};
use route_admission_k8s_api::ObjectMeta;

/// Validates the generic object metadata of a resource.
///
/// Paths are relative to `metadata`.
pub fn validate_object_meta(meta: &ObjectMeta) -> FieldError {
    let name = meta.name.as_deref().unwrap_or_default();
    let generate_name = meta.generate_name.as_deref().unwrap_or_default();

    let mut errs = FieldError::none();

    if !generate_name.is_empty() {
        let msgs = names::name_is_dns1035_label(generate_name, true);
        if !msgs.is_empty() {
            errs = errs.also(FieldError::invalid_value(
                format!("not a DNS 1035 label prefix: [{}]", msgs.join(", ")),
                "generateName",
            ));
        }
    }

    if !name.is_empty() {
        let msgs = names::name_is_dns1035_label(name, false);
        if !msgs.is_empty() {
            errs = errs.also(FieldError::invalid_value(
                format!("not a DNS 1035 label: [{}]", msgs.join(", ")),
                "name",
            ));
        }
    }

    if name.is_empty() && generate_name.is_empty() {
        errs = errs.also(FieldError::invalid_value(
            "name or generateName is required",
            "name",
        ));
    }

    errs
}
