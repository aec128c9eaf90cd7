//! Launch parameter classification.
//!
//! Splits a flat POST payload into OAuth, LTI, custom and extension
//! parameters. Rules are applied per key in priority order, first match wins:
//!
//! 1. `oauth_*` → [`ParameterCategory::OAuth`]
//! 2. recognized LTI name → [`ParameterCategory::Lti`]
//! 3. `custom_*` → [`ParameterCategory::Custom`]
//! 4. `ext_*` → [`ParameterCategory::Ext`]
//!
//! Any other key is dropped.

use std::collections::BTreeMap;

use crate::params::is_lti_parameter;

/// Parameter category of a launch payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterCategory {
    /// OAuth protocol parameters (`oauth_*`).
    OAuth,
    /// Recognized LTI launch parameters.
    Lti,
    /// Tool-specific custom parameters (`custom_*`).
    Custom,
    /// Consumer extension parameters (`ext_*`).
    Ext,
}

impl ParameterCategory {
    /// Category of a parameter name, or `None` if the name is dropped.
    pub fn of(name: &str) -> Option<Self> {
        if name.starts_with("oauth_") {
            Some(Self::OAuth)
        } else if is_lti_parameter(name) {
            Some(Self::Lti)
        } else if name.starts_with("custom_") {
            Some(Self::Custom)
        } else if name.starts_with("ext_") {
            Some(Self::Ext)
        } else {
            None
        }
    }
}

/// Launch parameters grouped by category.
///
/// Every key appears in at most one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedParameters {
    pub oauth: BTreeMap<String, String>,
    pub lti: BTreeMap<String, String>,
    pub custom: BTreeMap<String, String>,
    pub ext: BTreeMap<String, String>,
}

impl ClassifiedParameters {
    /// Parameters of one category.
    pub fn category(&self, category: ParameterCategory) -> &BTreeMap<String, String> {
        match category {
            ParameterCategory::OAuth => &self.oauth,
            ParameterCategory::Lti => &self.lti,
            ParameterCategory::Custom => &self.custom,
            ParameterCategory::Ext => &self.ext,
        }
    }

    fn category_mut(&mut self, category: ParameterCategory) -> &mut BTreeMap<String, String> {
        match category {
            ParameterCategory::OAuth => &mut self.oauth,
            ParameterCategory::Lti => &mut self.lti,
            ParameterCategory::Custom => &mut self.custom,
            ParameterCategory::Ext => &mut self.ext,
        }
    }
}

/// Classify raw launch parameters.
///
/// Pure and total: the same input always yields the same output.
pub fn classify<'a, I>(raw: I) -> ClassifiedParameters
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut classified = ClassifiedParameters::default();
    for (key, value) in raw {
        if let Some(category) = ParameterCategory::of(key) {
            classified
                .category_mut(category)
                .insert(key.clone(), value.clone());
        }
    }
    classified
}
