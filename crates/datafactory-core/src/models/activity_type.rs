use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A registered kind of processing step usable in a data factory pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityType {
    /// Full resource id, set by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub properties: ActivityTypeProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTypeProperties {
    /// Registration scope (e.g. `DataFactory`, `Subscription`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    /// JSON schema of the activity's `typeProperties`
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

impl ActivityType {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            id: None,
            name: name.into(),
            properties: ActivityTypeProperties {
                schema,
                ..Default::default()
            },
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.properties.scope = Some(scope.into());
        self
    }

    #[must_use]
    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.properties.base_type = Some(base_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let activity = ActivityType::new("HiveQuery", json!({"type": "object"}))
            .with_scope("DataFactory")
            .with_base_type("HDInsightActivity");

        let value = serde_json::to_value(&activity).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "HiveQuery",
                "properties": {
                    "scope": "DataFactory",
                    "baseType": "HDInsightActivity",
                    "schema": {"type": "object"}
                }
            })
        );
    }

    #[test]
    fn test_service_payload_parses() {
        let activity: ActivityType = serde_json::from_value(json!({
            "id": "/subscriptions/s/resourcegroups/rg/providers/Microsoft.DataFactory/datafactories/df/activityTypes/Copy",
            "name": "Copy",
            "properties": {
                "scope": "DataFactory",
                "schema": {"type": "object"},
                "provisioningState": "Succeeded",
                "unknownField": 1
            }
        }))
        .unwrap();

        assert_eq!(activity.name, "Copy");
        assert!(activity.id.unwrap().ends_with("/activityTypes/Copy"));
        assert_eq!(activity.properties.provisioning_state.as_deref(), Some("Succeeded"));
    }
}
