//! Validated launch context.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::classify::{ClassifiedParameters, ParameterCategory};
use crate::params;

/// Classified view of an accepted launch.
///
/// Only [`ToolProvider`](crate::ToolProvider) constructs this type, and only
/// for requests that passed every check.
#[derive(Debug)]
pub struct LaunchContext {
    consumer_key: String,
    parameters: ClassifiedParameters,
    roles: OnceCell<BTreeSet<String>>,
}

impl LaunchContext {
    pub(crate) fn new(consumer_key: String, parameters: ClassifiedParameters) -> Self {
        Self {
            consumer_key,
            parameters,
            roles: OnceCell::new(),
        }
    }

    /// Key of the consumer that signed the launch.
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Parameters of a category, optionally restricted to `keys`.
    ///
    /// Keys absent from the category are silently omitted.
    pub fn parameters(
        &self,
        category: ParameterCategory,
        keys: Option<&[&str]>,
    ) -> BTreeMap<String, String> {
        let all = self.parameters.category(category);
        match keys {
            None => all.clone(),
            Some(keys) => keys
                .iter()
                .filter_map(|k| all.get_key_value(*k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// A single parameter of a category.
    pub fn parameter(&self, key: &str, category: ParameterCategory) -> Option<&str> {
        self.parameters
            .category(category)
            .get(key)
            .map(String::as_str)
    }

    /// A single LTI parameter.
    pub fn lti_parameter(&self, key: &str) -> Option<&str> {
        self.parameter(key, ParameterCategory::Lti)
    }

    pub fn lti_parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters.lti
    }

    pub fn custom_parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters.custom
    }

    pub fn extension_parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters.ext
    }

    pub fn oauth_parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters.oauth
    }

    /// User id, image, roles and person name fields.
    pub fn user_parameters(&self) -> BTreeMap<String, String> {
        self.parameters(ParameterCategory::Lti, Some(params::USER_PARAMETERS))
    }

    /// Resource link id, title and description.
    pub fn resource_parameters(&self) -> BTreeMap<String, String> {
        self.parameters(ParameterCategory::Lti, Some(params::RESOURCE_PARAMETERS))
    }

    /// Context (course) id, type, title and label.
    pub fn context_parameters(&self) -> BTreeMap<String, String> {
        self.parameters(ParameterCategory::Lti, Some(params::CONTEXT_PARAMETERS))
    }

    /// Tool consumer product and instance metadata.
    pub fn consumer_parameters(&self) -> BTreeMap<String, String> {
        self.parameters(ParameterCategory::Lti, Some(params::CONSUMER_PARAMETERS))
    }

    pub fn message_type(&self) -> Option<&str> {
        self.lti_parameter(params::LTI_MESSAGE_TYPE)
    }

    pub fn lti_version(&self) -> Option<&str> {
        self.lti_parameter(params::LTI_VERSION)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.lti_parameter(params::USER_ID)
    }

    /// True for a `basic-lti-launch-request` message.
    pub fn is_launch_request(&self) -> bool {
        self.message_type() == Some(params::BASIC_LAUNCH_REQUEST)
    }

    /// Lowercased, trimmed roles from the comma-separated `roles` parameter.
    ///
    /// Parsed on first access and cached.
    pub fn roles(&self) -> &BTreeSet<String> {
        self.roles.get_or_init(|| {
            self.lti_parameter(params::ROLES)
                .map(parse_roles)
                .unwrap_or_default()
        })
    }

    /// Case-insensitive role membership.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles().contains(&role.trim().to_lowercase())
    }

    /// Learner or student.
    pub fn is_student(&self) -> bool {
        self.has_role("learner") || self.has_role("student")
    }

    /// Instructor, faculty or staff.
    pub fn is_instructor(&self) -> bool {
        self.has_role("instructor") || self.has_role("faculty") || self.has_role("staff")
    }

    pub fn is_content_developer(&self) -> bool {
        self.has_role("contentdeveloper")
    }
}

fn parse_roles(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(|role| role.trim().to_lowercase())
        .filter(|role| !role.is_empty())
        .collect()
}
