use std::borrow::Cow;

/// Configuration for [`StructuralDiffer`](crate::StructuralDiffer).
///
/// Use the builder methods to customize, or [`Default`] for the settings the
/// default differ uses.
///
/// # Examples
///
/// ```rust
/// use es_matchers::{DiffConfig, StructuralDiffer};
///
/// let config = DiffConfig::default()
///     .with_max_depth(4)          // Compare deeper subtrees as a whole
///     .with_show_unchanged(true)  // Also list fields that are equal
///     .with_root_label("data");   // Paths start with `data` instead of `$`
/// let differ = StructuralDiffer::new(config);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiffConfig {
    /// Nesting depth up to which objects and arrays are compared field by field.
    /// Deeper subtrees that differ are reported as a single change.
    /// Default: 32
    max_depth: usize,

    /// Emit unchanged leaves as context lines.
    /// Default: false
    show_unchanged: bool,

    /// Path label of the compared values themselves.
    /// Default: `$`
    root_label: Cow<'static, str>,
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig {
            max_depth: 32,
            show_unchanged: false,
            root_label: Cow::Borrowed("$"),
        }
    }
}

impl DiffConfig {
    /// Set how deep objects and arrays are walked field by field.
    ///
    /// With a depth of 0 any difference is reported for the whole value.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Returns the field-by-field walking depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Set whether equal leaves are listed as context.
    pub fn with_show_unchanged(mut self, show: bool) -> Self {
        self.show_unchanged = show;
        self
    }

    /// Returns whether equal leaves are listed as context.
    pub fn show_unchanged(&self) -> bool {
        self.show_unchanged
    }

    /// Set the label that starts every path.
    pub fn with_root_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.root_label = label.into();
        self
    }

    /// Returns the label that starts every path.
    pub fn root_label(&self) -> &str {
        &self.root_label
    }
}
