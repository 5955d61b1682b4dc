/// Route is responsible for configuring ingress over a collection of
/// Revisions. Some of the Revisions a Route distributes traffic over may be
/// specified by referencing the Configuration responsible for creating them;
/// in these cases the Route is additionally responsible for monitoring the
/// Configuration for "latest ready" revision changes.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    kube::CustomResource,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
)]
#[kube(
    group = "serving.knative.dev",
    version = "v1alpha1",
    kind = "Route",
    namespaced
)]
pub struct RouteSpec {
    /// Deprecated and not read. Retained so that objects written by older
    /// clients are still accepted.
    #[serde(
        default,
        rename = "generation",
        skip_serializing_if = "is_zero"
    )]
    pub deprecated_generation: i64,

    /// Traffic specifies how to distribute traffic over a collection of
    /// Knative Serving Revisions and Configurations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traffic: Vec<TrafficTarget>,
}

/// TrafficTarget holds a single entry of the routing table for a Route.
#[derive(
    Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct TrafficTarget {
    /// Name is optionally used to expose a dedicated hostname for referencing
    /// this target exclusively.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// RevisionName of a specific revision to which to send this portion of
    /// traffic. This is mutually exclusive with ConfigurationName.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub revision_name: String,

    /// ConfigurationName of a configuration to whose latest revision we will
    /// send this portion of traffic. When the "status.latestReadyRevisionName"
    /// of the referenced configuration changes, we will automatically migrate
    /// traffic from the prior "latest ready" revision to the new one. This
    /// field is never set in Route's status, only its spec. This is mutually
    /// exclusive with RevisionName.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub configuration_name: String,

    /// Percent specifies percent of the traffic to this Revision or
    /// Configuration. This defaults to zero if unspecified.
    #[serde(default)]
    pub percent: i64,

    /// URL displays the URL for accessing named traffic targets. URL is
    /// displayed in status, and is disallowed on spec.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

// === impl TrafficTarget ===

impl TrafficTarget {
    pub fn revision(name: impl Into<String>, percent: i64) -> Self {
        Self {
            revision_name: name.into(),
            percent,
            ..Default::default()
        }
    }

    pub fn configuration(name: impl Into<String>, percent: i64) -> Self {
        Self {
            configuration_name: name.into(),
            percent,
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
