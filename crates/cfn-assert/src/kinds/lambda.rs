//! Lambda functions
use super::{IamRole, LambdaFunction};
use crate::error::AssertionError;
use crate::resource::Resource;

impl<'t> Resource<'t, LambdaFunction> {
    /// Expect the function to run as `role`
    pub fn with_role(self, role: &Resource<'_, IamRole>) -> Result<Self, AssertionError> {
        Ok(self.with_property("Role", role.arn()?))
    }

    pub fn with_runtime(self, runtime: &str) -> Self {
        self.with_property("Runtime", runtime)
    }

    pub fn with_handler(self, handler: &str) -> Self {
        self.with_property("Handler", handler)
    }

    /// Timeout in seconds
    pub fn with_timeout(self, timeout: u32) -> Self {
        self.with_property("Timeout", timeout)
    }
}

#[cfg(test)]
mod test {
    use crate::template;
    use pretty_assertions::assert_eq;

    const TEMPLATE: &str = r#"{
        "Resources": {
            "HandlerRole": { "Type": "AWS::IAM::Role", "Properties": {} },
            "Handler": {
                "Type": "AWS::Lambda::Function",
                "Properties": {
                    "Role": { "Fn::GetAtt": ["HandlerRole", "Arn"] },
                    "Runtime": "nodejs18.x",
                    "Handler": "index.handler",
                    "Timeout": 30
                },
                "DependsOn": ["HandlerRole"]
            }
        }
    }"#;

    #[test]
    fn function() {
        let template = template!(TEMPLATE);
        let role = template.iam_role();

        let function = template
            .lambda_function()
            .with_role(&role)
            .unwrap()
            .with_runtime("nodejs")
            .with_handler("handler")
            .with_timeout(30)
            .depends_on(&role)
            .unwrap();
        assert_eq!(function.id().unwrap(), "Handler");

        assert!(function.clone().with_timeout(3).does_not_exist().is_ok());
        assert!(function.exists().is_ok());
    }
}
