//! LTI 1.x launch parameter vocabulary.
//!
//! Recognized names are compile-time constants. Anything outside this list is
//! classified by prefix (`custom_`, `ext_`) or dropped.

pub const LTI_MESSAGE_TYPE: &str = "lti_message_type";
pub const LTI_VERSION: &str = "lti_version";
pub const RESOURCE_LINK_ID: &str = "resource_link_id";
pub const RESOURCE_LINK_TITLE: &str = "resource_link_title";
pub const RESOURCE_LINK_DESCRIPTION: &str = "resource_link_description";
pub const USER_ID: &str = "user_id";
pub const USER_IMAGE: &str = "user_image";
pub const ROLES: &str = "roles";
pub const ROLE_SCOPE_MENTOR: &str = "role_scope_mentor";
pub const LIS_PERSON_NAME_GIVEN: &str = "lis_person_name_given";
pub const LIS_PERSON_NAME_FAMILY: &str = "lis_person_name_family";
pub const LIS_PERSON_NAME_FULL: &str = "lis_person_name_full";
pub const LIS_PERSON_CONTACT_EMAIL_PRIMARY: &str = "lis_person_contact_email_primary";
pub const LIS_PERSON_SOURCEDID: &str = "lis_person_sourcedid";
pub const CONTEXT_ID: &str = "context_id";
pub const CONTEXT_TYPE: &str = "context_type";
pub const CONTEXT_TITLE: &str = "context_title";
pub const CONTEXT_LABEL: &str = "context_label";
pub const LAUNCH_PRESENTATION_LOCALE: &str = "launch_presentation_locale";
pub const LAUNCH_PRESENTATION_DOCUMENT_TARGET: &str = "launch_presentation_document_target";
pub const LAUNCH_PRESENTATION_CSS_URL: &str = "launch_presentation_css_url";
pub const LAUNCH_PRESENTATION_WIDTH: &str = "launch_presentation_width";
pub const LAUNCH_PRESENTATION_HEIGHT: &str = "launch_presentation_height";
pub const LAUNCH_PRESENTATION_RETURN_URL: &str = "launch_presentation_return_url";
pub const TOOL_CONSUMER_INFO_PRODUCT_FAMILY_CODE: &str = "tool_consumer_info_product_family_code";
pub const TOOL_CONSUMER_INFO_VERSION: &str = "tool_consumer_info_version";
pub const TOOL_CONSUMER_INSTANCE_GUID: &str = "tool_consumer_instance_guid";
pub const TOOL_CONSUMER_INSTANCE_NAME: &str = "tool_consumer_instance_name";
pub const TOOL_CONSUMER_INSTANCE_DESCRIPTION: &str = "tool_consumer_instance_description";
pub const TOOL_CONSUMER_INSTANCE_URL: &str = "tool_consumer_instance_url";
pub const TOOL_CONSUMER_INSTANCE_CONTACT_EMAIL: &str = "tool_consumer_instance_contact_email";
pub const LIS_RESULT_SOURCEDID: &str = "lis_result_sourcedid";
pub const LIS_OUTCOME_SERVICE_URL: &str = "lis_outcome_service_url";
pub const LIS_COURSE_OFFERING_SOURCEDID: &str = "lis_course_offering_sourcedid";
pub const LIS_COURSE_SECTION_SOURCEDID: &str = "lis_course_section_sourcedid";

/// `lti_message_type` value of a basic tool launch.
pub const BASIC_LAUNCH_REQUEST: &str = "basic-lti-launch-request";

/// Every recognized LTI launch parameter name.
pub const LTI_PARAMETERS: &[&str] = &[
    LTI_MESSAGE_TYPE,
    LTI_VERSION,
    RESOURCE_LINK_ID,
    RESOURCE_LINK_TITLE,
    RESOURCE_LINK_DESCRIPTION,
    USER_ID,
    USER_IMAGE,
    ROLES,
    ROLE_SCOPE_MENTOR,
    LIS_PERSON_NAME_GIVEN,
    LIS_PERSON_NAME_FAMILY,
    LIS_PERSON_NAME_FULL,
    LIS_PERSON_CONTACT_EMAIL_PRIMARY,
    LIS_PERSON_SOURCEDID,
    CONTEXT_ID,
    CONTEXT_TYPE,
    CONTEXT_TITLE,
    CONTEXT_LABEL,
    LAUNCH_PRESENTATION_LOCALE,
    LAUNCH_PRESENTATION_DOCUMENT_TARGET,
    LAUNCH_PRESENTATION_CSS_URL,
    LAUNCH_PRESENTATION_WIDTH,
    LAUNCH_PRESENTATION_HEIGHT,
    LAUNCH_PRESENTATION_RETURN_URL,
    TOOL_CONSUMER_INFO_PRODUCT_FAMILY_CODE,
    TOOL_CONSUMER_INFO_VERSION,
    TOOL_CONSUMER_INSTANCE_GUID,
    TOOL_CONSUMER_INSTANCE_NAME,
    TOOL_CONSUMER_INSTANCE_DESCRIPTION,
    TOOL_CONSUMER_INSTANCE_URL,
    TOOL_CONSUMER_INSTANCE_CONTACT_EMAIL,
    LIS_RESULT_SOURCEDID,
    LIS_OUTCOME_SERVICE_URL,
    LIS_COURSE_OFFERING_SOURCEDID,
    LIS_COURSE_SECTION_SOURCEDID,
];

/// User-related LTI parameters.
pub const USER_PARAMETERS: &[&str] = &[
    USER_ID,
    USER_IMAGE,
    ROLES,
    LIS_PERSON_NAME_FULL,
    LIS_PERSON_NAME_FAMILY,
    LIS_PERSON_NAME_GIVEN,
    LIS_PERSON_SOURCEDID,
];

/// Resource-link LTI parameters.
pub const RESOURCE_PARAMETERS: &[&str] = &[
    RESOURCE_LINK_ID,
    RESOURCE_LINK_TITLE,
    RESOURCE_LINK_DESCRIPTION,
];

/// Context (course) LTI parameters.
pub const CONTEXT_PARAMETERS: &[&str] = &[CONTEXT_ID, CONTEXT_TYPE, CONTEXT_TITLE, CONTEXT_LABEL];

/// Tool consumer metadata parameters.
pub const CONSUMER_PARAMETERS: &[&str] = &[
    TOOL_CONSUMER_INFO_PRODUCT_FAMILY_CODE,
    TOOL_CONSUMER_INFO_VERSION,
    TOOL_CONSUMER_INSTANCE_CONTACT_EMAIL,
    TOOL_CONSUMER_INSTANCE_DESCRIPTION,
    TOOL_CONSUMER_INSTANCE_GUID,
    TOOL_CONSUMER_INSTANCE_NAME,
    TOOL_CONSUMER_INSTANCE_URL,
];

/// Check whether `name` is a recognized LTI launch parameter.
pub fn is_lti_parameter(name: &str) -> bool {
    LTI_PARAMETERS.contains(&name)
}
