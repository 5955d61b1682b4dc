use crate::{admission, k8s::Route};
use kube::core::DynamicObject;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("document {index}: invalid YAML: {source}")]
    Yaml {
        index: usize,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("document {index}: {source}")]
    Route {
        index: usize,
        #[source]
        source: admission::Error,
    },
}

/// Decodes every Route in a (possibly multi-document) YAML or JSON manifest.
/// Empty documents are skipped.
pub(crate) fn parse_routes(contents: &str) -> Result<Vec<Route>, Error> {
    let mut routes = Vec::new();
    for (index, doc) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let value =
            serde_yaml::Value::deserialize(doc).map_err(|source| Error::Yaml { index, source })?;
        if value.is_null() {
            continue;
        }

        let obj = serde_yaml::from_value::<DynamicObject>(value)
            .map_err(|source| Error::Yaml { index, source })?;
        let route =
            admission::route_from_object(obj).map_err(|source| Error::Route { index, source })?;
        routes.push(route);
    }
    Ok(routes)
}
