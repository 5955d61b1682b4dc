#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use route_admission_core as core;
pub use route_admission_k8s_api as k8s;

mod admission;
mod args;
mod log;
mod manifest;
mod report;

pub use self::{admission::Admission, args::Args};
