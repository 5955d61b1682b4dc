use crate::{
    deprecated, field_error::CURRENT_FIELD, metadata, names, FieldError, Validate,
    ValidationContext,
};
use route_admission_k8s_api::{Route, RouteSpec, TrafficTarget};
use std::collections::{hash_map::Entry, HashMap};


const MIN_PERCENT: i64 = 0;
const MAX_PERCENT: i64 = 100;

/// The sum of all traffic target percentages in a non-empty spec.
const TOTAL_PERCENT: i64 = 100;

/// Validates a `Route` submitted for admission.
pub fn validate_route(ctx: ValidationContext, route: &Route) -> Result<(), FieldError> {
    route.validate(ctx).into_result()
}

impl Validate for Route {
    fn validate(&self, ctx: ValidationContext) -> FieldError {
        metadata::validate_object_meta(&self.metadata)
            .via_field("metadata")
            .also(self.spec.validate(ctx.within_spec()).via_field("spec"))
    }
}

impl Validate for RouteSpec {
    fn validate(&self, ctx: ValidationContext) -> FieldError {
        if *self == RouteSpec::default() {
            return FieldError::missing_field([CURRENT_FIELD]);
        }

        let mut errs = deprecated::check_deprecated(ctx, self);

        // Index of the first target to use each name.
        let mut names = HashMap::<&str, usize>::with_capacity(self.traffic.len());
        let mut percent_sum = 0i64;

        for (i, tt) in self.traffic.iter().enumerate() {
            errs = errs.also(tt.validate(ctx).via_field_index("traffic", i));

            percent_sum = percent_sum.saturating_add(tt.percent);

            if tt.name.is_empty() {
                continue;
            }

            // A name may only be defined once, even if both targets point at
            // the same revision or configuration.
            match names.entry(tt.name.as_str()) {
                Entry::Vacant(entry) => {
                    entry.insert(i);
                }
                Entry::Occupied(first) => {
                    errs = errs.also(FieldError::duplicate_definition(
                        &tt.name,
                        [
                            format!("traffic[{}].name", first.get()),
                            format!("traffic[{i}].name"),
                        ],
                    ));
                }
            }
        }

        if percent_sum != TOTAL_PERCENT {
            errs = errs.also(FieldError::sum_mismatch(
                percent_sum,
                TOTAL_PERCENT,
                "traffic",
            ));
        }

        errs
    }
}

impl Validate for TrafficTarget {
    fn validate(&self, _ctx: ValidationContext) -> FieldError {
        let mut errs = match (
            self.revision_name.is_empty(),
            self.configuration_name.is_empty(),
        ) {
            (false, false) => FieldError::multiple_one_of(["revisionName", "configurationName"]),
            (false, true) => validate_key_name(&self.revision_name, "revisionName"),
            (true, false) => validate_key_name(&self.configuration_name, "configurationName"),
            (true, true) => FieldError::missing_one_of(["revisionName", "configurationName"]),
        };

        if !(MIN_PERCENT..=MAX_PERCENT).contains(&self.percent) {
            errs = errs.also(FieldError::out_of_bounds(
                self.percent,
                MIN_PERCENT,
                MAX_PERCENT,
                "percent",
            ));
        }

        // Only ever populated by the controller in status.
        if !self.url.is_empty() {
            errs = errs.also(FieldError::disallowed_fields(["url"]));
        }

        errs
    }
}

fn validate_key_name(value: &str, path: &str) -> FieldError {
    let msgs = names::is_qualified_name(value);
    if msgs.is_empty() {
        return FieldError::none();
    }
    FieldError::invalid_key_name(value, path, msgs)
}
