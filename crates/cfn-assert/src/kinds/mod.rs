//! Resource kinds and their vocabulary
//!
//! Every kind is a marker type used as the `K` of [Resource]. The table below maps each marker to
//! its type tag and mints a constructor on [Template] (`template.s3_bucket()`, ...). The setters
//! specific to a kind live in the submodule of its service.
//!
//! Kinds without a marker are still reachable through [Template::resource].
use crate::resource::Resource;
use crate::template::Template;

pub mod cloudfront;
pub mod codebuild;
pub mod custom;
pub mod dynamodb;
pub mod iam;
pub mod lambda;
pub mod logs;
pub mod route53;
pub mod s3;
pub mod secretsmanager;
pub mod ssm;
pub mod wafv2;

/// A resource kind with a fixed type tag
pub trait ResourceKind {
    const TYPE: &'static str;
}

/// Kinds supporting [crate::removable::RemovalPolicy]
pub trait Removable {}

/// Any resource type, chosen at runtime
#[derive(Debug, Clone, Copy)]
pub enum Any {}

/// Any resource type, chosen at runtime, with removal policy support
#[derive(Debug, Clone, Copy)]
pub enum AnyRemovable {}

impl Removable for AnyRemovable {}

macro_rules! resource_kinds {
    { $( $kind:ident($tag:literal) => $constructor:ident $(: $($marker:path),+)? ; )* } => {
        $(
            #[doc = concat!("`", $tag, "`")]
            #[derive(Debug, Clone, Copy)]
            pub enum $kind {}

            impl ResourceKind for $kind {
                const TYPE: &'static str = $tag;
            }

            $($(impl $marker for $kind {})+)?
        )*

        impl Template {
            $(
                #[doc = concat!("Resource matcher for `", $tag, "`")]
                pub fn $constructor(&self) -> Resource<'_, $kind> {
                    self.of()
                }
            )*
        }
    };
}

resource_kinds! {
    S3Bucket("AWS::S3::Bucket") => s3_bucket: Removable;
    S3BucketPolicy("AWS::S3::BucketPolicy") => s3_bucket_policy;
    IamRole("AWS::IAM::Role") => iam_role;
    IamPolicy("AWS::IAM::Policy") => iam_policy;
    LambdaFunction("AWS::Lambda::Function") => lambda_function;
    CloudFrontDistribution("AWS::CloudFront::Distribution") => cloudfront_distribution;
    CloudFrontFunction("AWS::CloudFront::Function") => cloudfront_function;
    Route53RecordSet("AWS::Route53::RecordSet") => route53_record_set;
    DynamoDbTable("AWS::DynamoDB::Table") => dynamodb_table: Removable;
    SsmParameter("AWS::SSM::Parameter") => ssm_parameter;
    Secret("AWS::SecretsManager::Secret") => secret: Removable;
    LogGroup("AWS::Logs::LogGroup") => log_group: Removable;
    CustomResource("Custom::AWS") => custom_resource: custom::Custom;
    CloudFormationCustomResource("AWS::CloudFormation::CustomResource") => cloudformation_custom_resource: custom::Custom;
    WafV2WebAcl("AWS::WAFv2::WebACL") => wafv2_web_acl;
    CodeBuildProject("AWS::CodeBuild::Project") => codebuild_project;
    CodeBuildSourceCredential("AWS::CodeBuild::SourceCredential") => codebuild_source_credential;
}
