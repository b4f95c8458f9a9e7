//! Engine configuration types.

/// Naming options for fresh variables and skolem constants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifyConfig {
    /// Placed between a variable name and the context index when a variable
    /// is renamed to avoid capture, e.g. `X_3`
    pub rename_separator: String,
    /// Prepended to every generated skolem constant
    pub skolem_prefix: String,
}

impl Default for UnifyConfig {
    fn default() -> Self {
        UnifyConfig {
            rename_separator: "_".to_string(),
            skolem_prefix: String::new(),
        }
    }
}

impl UnifyConfig {
    /// Name used for `name` when it escapes from context `index`
    pub fn fresh_name(&self, name: &str, index: u32) -> String {
        format!("{}{}{}", name, self.rename_separator, index)
    }
}
