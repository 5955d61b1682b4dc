use serde::Serialize;
use std::fmt;

/// The path of whichever field an error is eventually scoped to. Joining a
/// prefix onto the current field yields just the prefix.
pub const CURRENT_FIELD: &str = "";

/// The class of rule a [`Violation`] reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    MissingField,
    MultipleOneOf,
    MissingOneOf,
    InvalidKeyName,
    OutOfBoundsValue,
    DisallowedFields,
    DuplicateDefinition,
    SumMismatch,
    InvalidValue,
}

/// A single rule violation, applying to one or more field paths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    #[serde(skip)]
    pub kind: Kind,
    pub message: String,
    pub paths: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An accumulation of validation violations.
///
/// An empty `FieldError` means the validated value is acceptable. Errors from
/// nested values are combined with [`FieldError::also`] and scoped to their
/// position in the containing value with [`FieldError::via_field`],
/// [`FieldError::via_index`] and [`FieldError::via_field_index`], so that a
/// violation reported as `percent` by a traffic target surfaces as
/// `spec.traffic[2].percent` on the route.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("{}", render(.violations))]
pub struct FieldError {
    violations: Vec<Violation>,
}

// === impl FieldError ===

impl FieldError {
    /// Returns an error with no violations.
    #[inline]
    pub fn none() -> Self {
        Self::default()
    }

    fn single<P>(
        kind: Kind,
        message: String,
        paths: impl IntoIterator<Item = P>,
        details: Option<String>,
    ) -> Self
    where
        P: Into<String>,
    {
        Self {
            violations: vec![Violation {
                kind,
                message,
                paths: paths.into_iter().map(Into::into).collect(),
                details,
            }],
        }
    }

    pub fn missing_field<P: Into<String>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self::single(Kind::MissingField, "missing field(s)".into(), paths, None)
    }

    pub fn multiple_one_of<P: Into<String>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self::single(
            Kind::MultipleOneOf,
            "expected exactly one, got both".into(),
            paths,
            None,
        )
    }

    pub fn missing_one_of<P: Into<String>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self::single(
            Kind::MissingOneOf,
            "expected exactly one, got neither".into(),
            paths,
            None,
        )
    }

    /// `value` at `path` failed a key-name syntax check; `details` are the
    /// checker's messages.
    pub fn invalid_key_name<D>(value: &str, path: &str, details: impl IntoIterator<Item = D>) -> Self
    where
        D: AsRef<str>,
    {
        let details = details
            .into_iter()
            .map(|d| d.as_ref().to_string())
            .collect::<Vec<_>>();
        Self::single(
            Kind::InvalidKeyName,
            format!("invalid key name {value:?}"),
            [path],
            (!details.is_empty()).then(|| details.join(", ")),
        )
    }

    pub fn out_of_bounds<T: fmt::Display>(value: T, lower: T, upper: T, path: &str) -> Self {
        Self::single(
            Kind::OutOfBoundsValue,
            format!("expected {lower} <= {value} <= {upper}"),
            [path],
            None,
        )
    }

    pub fn disallowed_fields<P: Into<String>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self::single(
            Kind::DisallowedFields,
            "must not set the field(s)".into(),
            paths,
            None,
        )
    }

    pub fn duplicate_definition<P: Into<String>>(
        name: &str,
        paths: impl IntoIterator<Item = P>,
    ) -> Self {
        Self::single(
            Kind::DuplicateDefinition,
            format!("Multiple definitions for {name:?}"),
            paths,
            None,
        )
    }

    pub fn sum_mismatch(actual: i64, expected: i64, path: &str) -> Self {
        Self::single(
            Kind::SumMismatch,
            format!("Traffic targets sum to {actual}, want {expected}"),
            [path],
            None,
        )
    }

    pub fn invalid_value(message: impl Into<String>, path: &str) -> Self {
        Self::single(Kind::InvalidValue, message.into(), [path], None)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violations, in the order they were reported.
    #[inline]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Iterates over the violations of the given kind.
    pub fn of_kind(&self, kind: Kind) -> impl Iterator<Item = &Violation> + '_ {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    /// Combines two errors, keeping the violations of `self` first.
    #[must_use]
    pub fn also(mut self, other: FieldError) -> Self {
        self.violations.extend(other.violations);
        self
    }

    /// Scopes every path under the field `name`.
    #[must_use]
    pub fn via_field(self, name: &str) -> Self {
        self.prefixed(name)
    }

    /// Scopes every path under the sequence index `index`.
    #[must_use]
    pub fn via_index(self, index: usize) -> Self {
        self.prefixed(&format!("[{index}]"))
    }

    /// Scopes every path under element `index` of the sequence field `name`.
    #[must_use]
    pub fn via_field_index(self, name: &str, index: usize) -> Self {
        self.prefixed(&format!("{name}[{index}]"))
    }

    fn prefixed(mut self, prefix: &str) -> Self {
        for path in self.violations.iter_mut().flat_map(|v| v.paths.iter_mut()) {
            *path = join(prefix, path);
        }
        self
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn join(prefix: &str, path: &str) -> String {
    if path.is_empty() {
        prefix.to_string()
    } else if path.starts_with('[') {
        format!("{prefix}{path}")
    } else {
        format!("{prefix}.{path}")
    }
}

/// Renders violations one per line, folding together violations that only
/// differ by path.
fn render(violations: &[Violation]) -> String {
    let mut groups = Vec::<Violation>::with_capacity(violations.len());
    for v in violations {
        let group = groups
            .iter_mut()
            .find(|g| g.kind == v.kind && g.message == v.message && g.details == v.details);
        match group {
            Some(group) => {
                for path in &v.paths {
                    if !group.paths.contains(path) {
                        group.paths.push(path.clone());
                    }
                }
            }
            None => groups.push(v.clone()),
        }
    }

    groups
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

// === impl Violation ===

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        let paths = self
            .paths
            .iter()
            .filter(|p| !p.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>();
        if !paths.is_empty() {
            write!(f, ": {}", paths.join(", "))?;
        }
        if let Some(details) = &self.details {
            write!(f, "\n{details}")?;
        }
        Ok(())
    }
}
