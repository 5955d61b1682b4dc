/// Ambient flags that select which rules apply during a validation pass.
///
/// The context is a plain value: every call owns its copy, so concurrent
/// validations never share state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ValidationContext {
    within_spec: bool,
    deprecated_allowed: bool,
}

// === impl ValidationContext ===

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            within_spec: false,
            deprecated_allowed: true,
        }
    }
}

impl ValidationContext {
    /// Marks that validation has descended into a resource's `spec`.
    #[must_use]
    pub fn within_spec(self) -> Self {
        Self {
            within_spec: true,
            ..self
        }
    }

    /// Rejects deprecated fields that are set.
    #[must_use]
    pub fn disallow_deprecated(self) -> Self {
        Self {
            deprecated_allowed: false,
            ..self
        }
    }

    #[inline]
    pub fn is_within_spec(&self) -> bool {
        self.within_spec
    }

    #[inline]
    pub fn is_deprecated_allowed(&self) -> bool {
        self.deprecated_allowed
    }
}
