//! Custom resources
//!
//! [CustomResource] is the `Custom::AWS` resource issuing SDK calls on stack events, its
//! handlers are stored as serialized JSON.
use super::CustomResource;
use crate::error::AssertionError;
use crate::pattern::Pattern;
use crate::removable::{DELETION_POLICY, UPDATE_REPLACE_POLICY};
use crate::resource::Resource;
use indexmap::IndexMap;

/// Kinds backed by a custom resource provider
pub trait Custom {}

impl<'t, K: Custom> Resource<'t, K> {
    /// Expect the provider to be the function (or topic) `provider`
    pub fn with_service_token<P>(self, provider: &Resource<'_, P>) -> Result<Self, AssertionError> {
        Ok(self.with_property("ServiceToken", provider.arn()?))
    }

    pub fn with_deletion_policy(self, policy: &str) -> Self {
        self.with_root_property(DELETION_POLICY, policy)
    }

    pub fn with_update_replace_policy(self, policy: &str) -> Self {
        self.with_root_property(UPDATE_REPLACE_POLICY, policy)
    }
}

impl<'t> Resource<'t, CustomResource> {
    /// Expect the handler of `event` (`Create`, `Update` or `Delete`) to call `service`.`action`
    pub fn with_event_handler(
        self,
        event: &str,
        action: &str,
        service: &str,
        parameters: Option<IndexMap<String, Pattern>>,
    ) -> Self {
        let mut handler = crate::fields! {
            "action" => action,
            "service" => service,
        };
        if let Some(parameters) = parameters {
            handler.insert("parameters".to_string(), Pattern::object_like(parameters));
        }

        self.with_property(event, Pattern::serialized_json(Pattern::object_like(handler)))
    }

    pub fn with_create_handler(
        self,
        action: &str,
        service: &str,
        parameters: Option<IndexMap<String, Pattern>>,
    ) -> Self {
        self.with_event_handler("Create", action, service, parameters)
    }

    pub fn with_update_handler(
        self,
        action: &str,
        service: &str,
        parameters: Option<IndexMap<String, Pattern>>,
    ) -> Self {
        self.with_event_handler("Update", action, service, parameters)
    }

    pub fn with_delete_handler(
        self,
        action: &str,
        service: &str,
        parameters: Option<IndexMap<String, Pattern>>,
    ) -> Self {
        self.with_event_handler("Delete", action, service, parameters)
    }
}

#[cfg(test)]
mod test {
    use crate::fields;
    use crate::template;
    use pretty_assertions::assert_eq;

    const TEMPLATE: &str = r#"{
        "Resources": {
            "Provider": { "Type": "AWS::Lambda::Function", "Properties": { "Runtime": "nodejs18.x" } },
            "PutParameter": {
                "Type": "Custom::AWS",
                "Properties": {
                    "ServiceToken": { "Fn::GetAtt": ["Provider", "Arn"] },
                    "Create": "{\"service\":\"SSM\",\"action\":\"putParameter\",\"parameters\":{\"Name\":\"/app/version\",\"Value\":\"1\"},\"physicalResourceId\":{\"id\":\"version\"}}",
                    "Update": "{\"service\":\"SSM\",\"action\":\"putParameter\",\"parameters\":{\"Name\":\"/app/version\",\"Value\":\"2\"}}"
                },
                "UpdateReplacePolicy": "Delete",
                "DeletionPolicy": "Delete"
            },
            "Certificate": {
                "Type": "AWS::CloudFormation::CustomResource",
                "Properties": { "ServiceToken": { "Fn::GetAtt": ["Provider", "Arn"] }, "DomainName": "example.com" },
                "UpdateReplacePolicy": "Retain",
                "DeletionPolicy": "Retain"
            }
        }
    }"#;

    #[test]
    fn handlers() {
        let template = template!(TEMPLATE);

        let custom = template
            .custom_resource()
            .with_create_handler("putParameter", "SSM", Some(fields! { "Value" => "1" }))
            .with_update_handler("putParameter", "SSM", None)
            .with_service_token(&template.lambda_function())
            .unwrap();
        assert_eq!(custom.id().unwrap(), "PutParameter");

        let delete = template
            .custom_resource()
            .with_delete_handler("deleteParameter", "SSM", None);
        assert!(delete.does_not_exist().is_ok());
    }

    #[test]
    fn policies() {
        let template = template!(TEMPLATE);
        let certificate = template
            .cloudformation_custom_resource()
            .with_deletion_policy("Retain")
            .with_update_replace_policy("Retain")
            .with_property("DomainName", "example.com");

        assert_eq!(certificate.id().unwrap(), "Certificate");
    }
}
