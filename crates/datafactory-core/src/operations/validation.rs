//! Client-side argument checks run before any request is sent

use crate::error::{CoreError, Result};

const MAX_DATA_FACTORY_NAME_LEN: usize = 63;
const MAX_ACTIVITY_TYPE_NAME_LEN: usize = 260;

fn require_non_empty(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{} must not be empty", what)));
    }
    Ok(())
}

pub(crate) fn resource_group_name(name: &str) -> Result<()> {
    require_non_empty(name, "resource group name")
}

pub(crate) fn data_factory_name(name: &str) -> Result<()> {
    require_non_empty(name, "data factory name")?;

    if name.len() > MAX_DATA_FACTORY_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "data factory name '{}' is longer than {} characters",
            name, MAX_DATA_FACTORY_NAME_LEN
        )));
    }
    if let Some(c) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
        return Err(CoreError::Validation(format!(
            "data factory name '{}' contains invalid character '{}'",
            name, c
        )));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(CoreError::Validation(format!(
            "data factory name '{}' must not start or end with '-'",
            name
        )));
    }
    Ok(())
}

pub(crate) fn activity_type_name(name: &str) -> Result<()> {
    require_non_empty(name, "activity type name")?;

    if name.chars().count() > MAX_ACTIVITY_TYPE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "activity type name is longer than {} characters",
            MAX_ACTIVITY_TYPE_NAME_LEN
        )));
    }
    Ok(())
}

/// Resource group and data factory in one go
pub(crate) fn scope(resource_group: &str, data_factory: &str) -> Result<()> {
    resource_group_name(resource_group)?;
    data_factory_name(data_factory)
}

pub(crate) fn raw_json_content(content: &str) -> Result<()> {
    require_non_empty(content, "raw JSON content")?;
    serde_json::from_str::<serde_json::Value>(content)
        .map(|_| ())
        .map_err(|e| CoreError::Validation(format!("raw content is not valid JSON: {}", e)))
}

pub(crate) fn next_link(link: &str) -> Result<()> {
    require_non_empty(link, "next link")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_factory_name_rules() {
        assert!(data_factory_name("factory-01").is_ok());
        assert!(data_factory_name(&"a".repeat(63)).is_ok());

        assert!(data_factory_name("").is_err());
        assert!(data_factory_name(&"a".repeat(64)).is_err());
        assert!(data_factory_name("-factory").is_err());
        assert!(data_factory_name("factory-").is_err());

        let err = data_factory_name("my_factory").unwrap_err();
        assert!(err.to_string().contains("'_'"));
    }

    #[test]
    fn test_activity_type_name_rules() {
        assert!(activity_type_name("Copy").is_ok());
        assert!(activity_type_name(&"x".repeat(260)).is_ok());
        assert!(activity_type_name(&"x".repeat(261)).is_err());
        assert!(activity_type_name("   ").is_err());
    }

    #[test]
    fn test_raw_json_content() {
        assert!(raw_json_content(r#"{"name":"Copy"}"#).is_ok());
        assert!(raw_json_content("").is_err());

        let err = raw_json_content("{not json").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_scope_checks_both_names() {
        assert!(scope("rg", "df").is_ok());
        assert!(scope("", "df").is_err());
        assert!(scope("rg", "").is_err());
        assert!(next_link("").is_err());
    }
}
