//! CloudFront distributions and functions
//!
//! The settings of a distribution are nested in its `DistributionConfig`.
use super::{CloudFrontDistribution, CloudFrontFunction, S3Bucket, WafV2WebAcl};
use crate::error::AssertionError;
use crate::fields;
use crate::intrinsic;
use crate::pattern::Pattern;
use crate::resource::Resource;

const DISTRIBUTION_CONFIG: &str = "DistributionConfig";
pub const VIEWER_REQUEST: &str = "viewer-request";

impl<'t> Resource<'t, CloudFrontDistribution> {
    fn with_config(self, key: &str, value: impl Into<Pattern>) -> Self {
        self.with_property_at(&[DISTRIBUTION_CONFIG, key], value)
    }

    /// Expect exactly these aliases, in this order
    pub fn with_aliases(self, aliases: &[&str]) -> Self {
        self.with_config("Aliases", aliases.to_vec())
    }

    /// Expect `function` to be associated with the default cache behavior
    ///
    /// The event type defaults to [VIEWER_REQUEST].
    pub fn with_function_association(
        self,
        function: &Resource<'_, CloudFrontFunction>,
        event_type: Option<&str>,
    ) -> Result<Self, AssertionError> {
        let association = Pattern::object_like(fields! {
            "EventType" => event_type.unwrap_or(VIEWER_REQUEST),
            "FunctionARN" => function.arn_attribute("FunctionARN")?,
        });

        Ok(self.with_config(
            "DefaultCacheBehavior",
            Pattern::object_like(fields! {
                "FunctionAssociations" => Pattern::array_with([association]),
            }),
        ))
    }

    /// Expect an origin serving the website endpoint of `bucket`
    pub fn with_s3_website_origin(self, bucket: &Resource<'_, S3Bucket>) -> Result<Self, AssertionError> {
        let origin = Pattern::object_like(fields! {
            "DomainName" => intrinsic::website_url_of(bucket)?,
        });
        Ok(self.with_config("Origins", Pattern::array_with([origin])))
    }

    /// e.g. `http2`
    pub fn with_http_version(self, version: &str) -> Self {
        self.with_config("HttpVersion", Pattern::partial(version))
    }

    pub fn with_web_acl(self, acl: &Resource<'_, WafV2WebAcl>) -> Result<Self, AssertionError> {
        Ok(self.with_config("WebACLId", acl.arn()?))
    }
}

impl<'t> Resource<'t, CloudFrontFunction> {
    /// Expect the function code to contain `code`
    pub fn with_code(self, code: &str) -> Self {
        self.with_property("FunctionCode", code)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::template;
    use pretty_assertions::assert_eq;

    const TEMPLATE: &str = r#"{
        "Resources": {
            "WebsiteBucket": {
                "Type": "AWS::S3::Bucket",
                "Properties": { "WebsiteConfiguration": { "IndexDocument": "index.html", "ErrorDocument": "index.html" } }
            },
            "WebAcl": { "Type": "AWS::WAFv2::WebACL", "Properties": { "Scope": "CLOUDFRONT" } },
            "RewriteFunction": {
                "Type": "AWS::CloudFront::Function",
                "Properties": { "FunctionCode": "function handler(event) { return event.request; }", "Name": "rewrite" }
            },
            "Distribution": {
                "Type": "AWS::CloudFront::Distribution",
                "Properties": {
                    "DistributionConfig": {
                        "Aliases": ["www.example.com"],
                        "DefaultCacheBehavior": {
                            "FunctionAssociations": [
                                { "EventType": "viewer-request", "FunctionARN": { "Fn::GetAtt": ["RewriteFunction", "FunctionARN"] } }
                            ],
                            "ViewerProtocolPolicy": "redirect-to-https"
                        },
                        "HttpVersion": "http2",
                        "Origins": [{
                            "DomainName": { "Fn::Select": [2, { "Fn::Split": ["/", { "Fn::GetAtt": ["WebsiteBucket", "WebsiteURL"] }] }] },
                            "Id": "Origin1"
                        }],
                        "WebACLId": { "Fn::GetAtt": ["WebAcl", "Arn"] }
                    }
                }
            }
        }
    }"#;

    #[test]
    fn nested_config_adds_up() {
        let template = template!(TEMPLATE);
        let function = template.cloudfront_function().with_code("handler");

        let distribution = template
            .cloudfront_distribution()
            .with_aliases(&["www.example.com"])
            .with_http_version("http2")
            .with_function_association(&function, None)
            .and_then(|distribution| distribution.with_s3_website_origin(&template.s3_bucket()))
            .and_then(|distribution| distribution.with_web_acl(&template.wafv2_web_acl()))
            .unwrap();
        assert_eq!(distribution.id().unwrap(), "Distribution");

        let other_event = template
            .cloudfront_distribution()
            .with_function_association(&function, Some("viewer-response"))
            .unwrap();
        assert!(other_event.does_not_exist().is_ok());
    }

    #[test]
    fn aliases_are_exact() {
        let template = template!(TEMPLATE);

        assert!(template
            .cloudfront_distribution()
            .with_aliases(&["www.example.com", "example.com"])
            .does_not_exist()
            .is_ok());
    }
}
