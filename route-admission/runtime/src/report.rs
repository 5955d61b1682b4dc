use crate::{
    core::FieldError,
    k8s::{ResourceExt, Route},
};
use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

/// The outcome of checking one route from a manifest.
#[derive(Debug, Serialize)]
pub(crate) struct Report<'a> {
    file: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    name: String,
    allowed: bool,
    #[serde(skip_serializing_if = "FieldError::is_empty")]
    errors: FieldError,
}

// === impl Report ===

impl<'a> Report<'a> {
    pub(crate) fn new(file: &'a str, route: &Route, result: Result<(), FieldError>) -> Self {
        let errors = result.err().unwrap_or_default();
        Self {
            file,
            namespace: route.namespace(),
            name: route.name_any(),
            allowed: errors.is_empty(),
            errors,
        }
    }

    #[inline]
    pub(crate) fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub(crate) fn render(&self, format: OutputFormat) -> serde_json::Result<String> {
        match format {
            OutputFormat::Json => serde_json::to_string(self),
            OutputFormat::Plain => Ok(self.to_plain()),
        }
    }

    fn to_plain(&self) -> String {
        let id = match &self.namespace {
            Some(ns) => format!("{ns}/{}", self.name),
            None => self.name.clone(),
        };
        if self.allowed {
            return format!("{}: {id}: ok", self.file);
        }

        let mut out = format!("{}: {id}: denied", self.file);
        for line in self.errors.to_string().lines() {
            out.push_str("\n  ");
            out.push_str(line);
        }
        out
    }
}
