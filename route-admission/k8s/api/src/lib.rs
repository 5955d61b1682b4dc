#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod route;

pub use self::route::{Route, RouteSpec, TrafficTarget};
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
pub use kube::{Resource, ResourceExt};
