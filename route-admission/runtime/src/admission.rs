use crate::{
    core::{validate_route, FieldError, ValidationContext},
    k8s::{Resource, ResourceExt, Route, RouteSpec},
};
use kube::core::{
    admission::{self, Operation},
    DynamicObject,
};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Decides whether Routes may be admitted.
#[derive(Clone, Debug, Default)]
pub struct Admission {
    ctx: ValidationContext,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("admission request missing 'object'")]
    MissingObject,

    #[error("unsupported resource type: {api_version}.{kind}")]
    UnsupportedKind { api_version: String, kind: String },

    #[error("failed to decode route spec: {0}")]
    Spec(#[from] serde_json::Error),
}

pub(crate) type AdmissionReview = admission::AdmissionReview<DynamicObject>;
type AdmissionRequest = admission::AdmissionRequest<DynamicObject>;
type AdmissionResponse = admission::AdmissionResponse;

// === impl Admission ===

impl Admission {
    pub fn new(ctx: ValidationContext) -> Self {
        Self { ctx }
    }

    /// Evaluates an admission review, returning the review to send back to
    /// the API server.
    pub fn review(&self, review: AdmissionReview) -> AdmissionReview {
        trace!(?review);
        let rsp = match review.try_into() {
            Ok(req) => {
                debug!(?req);
                self.admit(req)
            }
            Err(error) => {
                warn!(%error, "Invalid admission request");
                AdmissionResponse::invalid(error)
            }
        };
        debug!(?rsp);
        rsp.into_review()
    }

    /// Responds to a review that could not be decoded.
    pub(crate) fn invalid(error: impl ToString) -> AdmissionReview {
        AdmissionResponse::invalid(error).into_review()
    }

    /// Validates a single route.
    pub fn check(&self, route: &Route) -> Result<(), FieldError> {
        validate_route(self.ctx, route)
    }

    fn admit(&self, req: AdmissionRequest) -> AdmissionResponse {
        if !is_route(&req) {
            return AdmissionResponse::invalid(format_args!(
                "unsupported resource type: {}.{}.{}",
                req.kind.group, req.kind.version, req.kind.kind
            ));
        }

        let rsp = AdmissionResponse::from(&req);

        // Deletions carry no object to validate.
        if matches!(req.operation, Operation::Delete) {
            return rsp;
        }

        let route = match req.object.ok_or(Error::MissingObject).and_then(route_from_object) {
            Ok(route) => route,
            Err(error) => {
                info!(%error, "Failed to parse Route");
                return rsp.deny(error);
            }
        };

        let ns = route.namespace().unwrap_or_default();
        let name = route.name_any();
        match self.check(&route) {
            Ok(()) => {
                debug!(%ns, %name, "Admitted");
                rsp
            }
            Err(error) => {
                info!(%error, %ns, %name, "Denied");
                rsp.deny(error)
            }
        }
    }
}

fn is_route(req: &AdmissionRequest) -> bool {
    req.kind.group.eq_ignore_ascii_case(&Route::group(&()))
        && req.kind.kind.eq_ignore_ascii_case(&Route::kind(&()))
}

/// Builds a `Route` from an untyped object. An absent spec is treated as an
/// empty one so that validation reports it.
pub(crate) fn route_from_object(obj: DynamicObject) -> Result<Route, Error> {
    if let Some(types) = &obj.types {
        if types.api_version != Route::api_version(&()) || types.kind != Route::kind(&()) {
            return Err(Error::UnsupportedKind {
                api_version: types.api_version.clone(),
                kind: types.kind.clone(),
            });
        }
    }

    let spec = match obj.data.get("spec") {
        None | Some(serde_json::Value::Null) => RouteSpec::default(),
        Some(data) => serde_json::from_value(data.clone())?,
    };

    Ok(Route {
        metadata: obj.metadata,
        spec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn mk_review(operation: &str, kind: serde_json::Value, object: serde_json::Value) -> AdmissionReview {
        serde_json::from_value(json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
            "request": {
                "uid": "c5f3a3a9-8e2b-4a3c-9b53-1a7f0b1e2d4c",
                "kind": kind,
                "resource": {
                    "group": "serving.knative.dev",
                    "version": "v1alpha1",
                    "resource": "routes",
                },
                "name": "my-route",
                "namespace": "default",
                "operation": operation,
                "userInfo": {},
                "object": object,
                "dryRun": false,
            },
        }))
        .expect("review must decode")
    }

    fn route_kind() -> serde_json::Value {
        json!({ "group": "serving.knative.dev", "version": "v1alpha1", "kind": "Route" })
    }

    fn mk_route_object(spec: serde_json::Value) -> serde_json::Value {
        json!({
            "apiVersion": "serving.knative.dev/v1alpha1",
            "kind": "Route",
            "metadata": { "name": "my-route", "namespace": "default" },
            "spec": spec,
        })
    }

    fn response(review: AdmissionReview) -> AdmissionResponse {
        review.response.expect("review must have a response")
    }

    #[test]
    fn admits_valid_route() {
        let review = mk_review(
            "CREATE",
            route_kind(),
            mk_route_object(json!({
                "traffic": [
                    { "revisionName": "hello-00001", "percent": 50 },
                    { "configurationName": "hello", "percent": 50 },
                ],
            })),
        );
        let rsp = response(Admission::default().review(review));
        assert!(rsp.allowed);
        assert_eq!(rsp.uid, "c5f3a3a9-8e2b-4a3c-9b53-1a7f0b1e2d4c");
    }

    #[test]
    fn denies_invalid_route() {
        let review = mk_review(
            "UPDATE",
            route_kind(),
            mk_route_object(json!({
                "traffic": [
                    { "name": "a", "revisionName": "hello-00001", "percent": 50 },
                    { "name": "a", "revisionName": "hello-00002", "percent": 50 },
                ],
            })),
        );
        let rsp = response(Admission::default().review(review));
        assert!(!rsp.allowed);
        assert_eq!(
            rsp.result.message,
            r#"Multiple definitions for "a": spec.traffic[0].name, spec.traffic[1].name"#
        );
    }

    #[test]
    fn denies_route_without_spec() {
        let review = mk_review(
            "CREATE",
            route_kind(),
            json!({
                "apiVersion": "serving.knative.dev/v1alpha1",
                "kind": "Route",
                "metadata": { "name": "my-route", "namespace": "default" },
            }),
        );
        let rsp = response(Admission::default().review(review));
        assert!(!rsp.allowed);
        assert_eq!(rsp.result.message, "missing field(s): spec");
    }

    #[test]
    fn denies_undecodable_spec() {
        let review = mk_review(
            "CREATE",
            route_kind(),
            mk_route_object(json!({ "traffic": "all of it" })),
        );
        let rsp = response(Admission::default().review(review));
        assert!(!rsp.allowed);
        assert!(rsp.result.message.starts_with("failed to decode route spec"));
    }

    #[test]
    fn admits_deletes() {
        let review = mk_review("DELETE", route_kind(), serde_json::Value::Null);
        assert!(response(Admission::default().review(review)).allowed);
    }

    #[test]
    fn rejects_other_kinds() {
        let review = mk_review(
            "CREATE",
            json!({ "group": "serving.knative.dev", "version": "v1alpha1", "kind": "Service" }),
            json!({}),
        );
        let rsp = response(Admission::default().review(review));
        assert!(!rsp.allowed);
        assert_eq!(
            rsp.result.message,
            "unsupported resource type: serving.knative.dev.v1alpha1.Service"
        );
    }

    #[test]
    fn strict_context_rejects_deprecated_fields() {
        let spec = json!({
            "generation": 2,
            "traffic": [{ "revisionName": "hello-00001", "percent": 100 }],
        });
        let review = || mk_review("CREATE", route_kind(), mk_route_object(spec.clone()));

        assert!(response(Admission::default().review(review())).allowed);

        let strict = Admission::new(ValidationContext::default().disallow_deprecated());
        let rsp = response(strict.review(review()));
        assert!(!rsp.allowed);
        assert_eq!(rsp.result.message, "must not set the field(s): spec.generation");
    }

    #[test]
    fn object_of_wrong_kind() {
        let obj: DynamicObject = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "ConfigMap",
            "metadata": { "name": "cm" },
        }))
        .unwrap();
        assert!(matches!(
            route_from_object(obj),
            Err(Error::UnsupportedKind { .. })
        ));
    }
}
