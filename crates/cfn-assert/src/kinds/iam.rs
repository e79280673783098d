//! IAM roles and policies
use super::{IamPolicy, IamRole};
use crate::error::AssertionError;
use crate::fields;
use crate::intrinsic;
use crate::pattern::Pattern;
use crate::resource::Resource;

const STATEMENTS: &str = "statements";
const ROLES: &str = "roles";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolicyEffect {
    #[default]
    Allow,
    Deny,
}

impl PolicyEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyEffect::Allow => "Allow",
            PolicyEffect::Deny => "Deny",
        }
    }
}

impl<'t> Resource<'t, IamRole> {
    /// Expect the role to be assumable by `principal`, e.g. `{ "Service": "lambda.amazonaws.com" }`
    pub fn assumable_by(self, principal: impl Into<Pattern>) -> Self {
        let principal: Pattern = principal.into();
        let statement = fields! {
            "Action" => "sts:AssumeRole",
            "Effect" => "Allow",
            "Principal" => principal,
        };

        self.with_property(
            "AssumeRolePolicyDocument",
            Pattern::object_like(fields! { "Statement" => Pattern::array_with([statement]) }),
        )
    }

    pub fn assumable_by_lambda(self) -> Self {
        self.assumable_by(fields! { "Service" => "lambda.amazonaws.com" })
    }

    pub fn assumable_by_code_build(self) -> Self {
        self.assumable_by(fields! { "Service" => "codebuild.amazonaws.com" })
    }

    /// Expect a managed policy whose ARN contains `policy`
    ///
    /// Managed policy ARNs are joined from the partition and the policy name.
    pub fn with_managed_policy(self, policy: &str) -> Self {
        let arn = intrinsic::fn_join(Pattern::array_with([Pattern::partial(policy)]));
        self.with_property("ManagedPolicyArns", Pattern::array_with([arn]))
    }
}

impl<'t> Resource<'t, IamPolicy> {
    /// Expect a statement with `actions`, on `resource` if given
    ///
    /// Without `resource` the statement's `Resource` key is not checked, which leaves room for
    /// `NotResource` statements. Statements add up, the policy document must contain all of them
    /// in the order given.
    pub fn with_statement(
        mut self,
        actions: &[&str],
        resource: Option<Pattern>,
        effect: PolicyEffect,
    ) -> Self {
        let action = match actions {
            [action] => Pattern::from(*action),
            actions => Pattern::array_with(actions.iter().copied()),
        };
        let mut statement = fields! {
            "Action" => action,
            "Effect" => effect.as_str(),
        };
        if let Some(resource) = resource {
            statement.insert("Resource".to_string(), resource);
        }

        let statements = self.accumulate(STATEMENTS, Pattern::object_like(statement));
        self.with_property(
            "PolicyDocument",
            Pattern::object_like(fields! { "Statement" => Pattern::array_with(statements) }),
        )
    }

    /// Expect the policy to be attached to `role`, in addition to roles given before
    pub fn used_by_role(mut self, role: &Resource<'_, IamRole>) -> Result<Self, AssertionError> {
        let roles = self.accumulate(ROLES, role.reference()?);
        Ok(self.with_property("Roles", Pattern::array_with(roles)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::template;

    const TEMPLATE: &str = r#"{
        "Resources": {
            "HandlerRole": {
                "Type": "AWS::IAM::Role",
                "Properties": {
                    "AssumeRolePolicyDocument": {
                        "Statement": [{ "Action": "sts:AssumeRole", "Effect": "Allow", "Principal": { "Service": "lambda.amazonaws.com" } }],
                        "Version": "2012-10-17"
                    },
                    "ManagedPolicyArns": [{
                        "Fn::Join": ["", ["arn:", { "Ref": "AWS::Partition" }, ":iam::aws:policy/service-role/AWSLambdaBasicExecutionRole"]]
                    }]
                }
            },
            "BuildRole": {
                "Type": "AWS::IAM::Role",
                "Properties": {
                    "AssumeRolePolicyDocument": {
                        "Statement": [{ "Action": "sts:AssumeRole", "Effect": "Allow", "Principal": { "Service": "codebuild.amazonaws.com" } }]
                    }
                }
            },
            "HandlerRoleDefaultPolicy": {
                "Type": "AWS::IAM::Policy",
                "Properties": {
                    "PolicyDocument": {
                        "Statement": [
                            { "Action": "ssm:GetParameter", "Effect": "Allow", "Resource": "*" },
                            { "Action": ["s3:GetObject", "s3:PutObject"], "Effect": "Deny", "Resource": { "Fn::GetAtt": ["Bucket", "Arn"] } },
                            { "Action": "s3:DeleteObject", "Effect": "Deny", "NotResource": "arn:aws:s3:::logs/*" }
                        ]
                    },
                    "Roles": [{ "Ref": "HandlerRole" }, { "Ref": "BuildRole" }]
                }
            }
        }
    }"#;

    #[test]
    fn roles() {
        let template = template!(TEMPLATE);

        let handler = template
            .iam_role()
            .assumable_by_lambda()
            .with_managed_policy("AWSLambdaBasicExecutionRole");
        assert_eq!(handler.id().unwrap(), "HandlerRole");

        let build = template.iam_role().assumable_by_code_build();
        assert_eq!(build.id().unwrap(), "BuildRole");
    }

    #[test]
    fn statements_add_up() {
        let template = template!(TEMPLATE);

        let policy = template
            .iam_policy()
            .with_statement(&["ssm:GetParameter"], None, PolicyEffect::Allow)
            .with_statement(
                &["s3:GetObject", "s3:PutObject"],
                Some(intrinsic::fn_get_att(["Bucket", "Arn"])),
                PolicyEffect::Deny,
            );
        assert!(policy.exists().is_ok());

        let reversed = template
            .iam_policy()
            .with_statement(&["s3:PutObject"], None, PolicyEffect::Deny)
            .with_statement(&["ssm:GetParameter"], None, PolicyEffect::Allow);
        assert!(reversed.does_not_exist().is_ok());
    }

    #[test]
    fn statements_without_resource() {
        let template = template!(TEMPLATE);

        let not_resource = template
            .iam_policy()
            .with_statement(&["s3:DeleteObject"], None, PolicyEffect::Deny);
        assert!(not_resource.exists().is_ok());

        let wildcard = template
            .iam_policy()
            .with_statement(&["s3:DeleteObject"], Some("*".into()), PolicyEffect::Deny);
        assert!(wildcard.does_not_exist().is_ok());
    }

    #[test]
    fn roles_add_up() {
        let template = template!(TEMPLATE);
        let handler = template.iam_role().assumable_by_lambda();
        let build = template.iam_role().assumable_by_code_build();

        let policy = template
            .iam_policy()
            .used_by_role(&handler)
            .and_then(|policy| policy.used_by_role(&build))
            .unwrap();
        assert_eq!(policy.id().unwrap(), "HandlerRoleDefaultPolicy");
    }
}
