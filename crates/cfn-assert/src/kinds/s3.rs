//! S3 buckets and bucket policies
use super::{S3Bucket, S3BucketPolicy};
use crate::error::AssertionError;
use crate::fields;
use crate::intrinsic;
use crate::pattern::Pattern;
use crate::resource::Resource;

/// Options of [Resource::with_website_hosting]
///
/// With `redirect_to` set, the bucket is expected to redirect every request, otherwise to serve
/// its index and error documents (both `index.html` unless given).
#[derive(Debug, Clone, Default)]
pub struct WebsiteHosting {
    pub redirect_to: Option<String>,
    pub redirect_protocol: Option<String>,
    pub index_document: Option<String>,
    pub error_document: Option<String>,
}

impl WebsiteHosting {
    pub fn redirect(host_name: impl Into<String>) -> Self {
        Self {
            redirect_to: Some(host_name.into()),
            ..Self::default()
        }
    }

    fn to_pattern(&self) -> Pattern {
        if let Some(host_name) = &self.redirect_to {
            let protocol = self.redirect_protocol.as_deref().unwrap_or("https");
            return Pattern::object_like(fields! {
                "RedirectAllRequestsTo" => Pattern::object_like(fields! {
                    "HostName" => Pattern::partial(host_name),
                    "Protocol" => Pattern::partial(protocol),
                }),
            });
        }

        let index_document = self.index_document.as_deref().unwrap_or("index.html");
        let error_document = self.error_document.as_deref().unwrap_or("index.html");
        Pattern::object_like(fields! {
            "IndexDocument" => Pattern::partial(index_document),
            "ErrorDocument" => Pattern::partial(error_document),
        })
    }
}

fn cors_rules(methods: Pattern, origins: Pattern) -> Pattern {
    Pattern::object_like(fields! {
        "CorsRules" => Pattern::array_with([Pattern::object_equals(fields! {
            "AllowedMethods" => methods,
            "AllowedOrigins" => origins,
        })]),
    })
}

impl<'t> Resource<'t, S3Bucket> {
    pub fn with_bucket_name(self, name: &str) -> Self {
        self.with_property("BucketName", name)
    }

    pub fn with_website_hosting(self, options: WebsiteHosting) -> Self {
        self.with_property("WebsiteConfiguration", options.to_pattern())
    }

    /// Expect a CORS rule allowing `GET` from anywhere
    pub fn with_cors_enabled(self) -> Self {
        self.with_cors_allowing("GET", "*")
    }

    /// Expect a CORS rule allowing (at least) `method` from `origin`
    pub fn with_cors_allowing(self, method: &str, origin: &str) -> Self {
        self.with_property(
            "CorsConfiguration",
            cors_rules(Pattern::array_with([method]), Pattern::array_with([origin])),
        )
    }

    /// Expect a CORS rule allowing exactly `methods` from exactly `origins`
    pub fn with_cors_exactly(self, methods: &[&str], origins: &[&str]) -> Self {
        self.with_property(
            "CorsConfiguration",
            cors_rules(
                Pattern::array_equals(methods.iter().copied()),
                Pattern::array_equals(origins.iter().copied()),
            ),
        )
    }
}

impl<'t> Resource<'t, S3BucketPolicy> {
    pub fn for_bucket(self, bucket: &Resource<'_, S3Bucket>) -> Result<Self, AssertionError> {
        Ok(self.with_property("Bucket", bucket.reference()?))
    }

    /// Expect a statement allowing anyone to read the objects of `bucket`
    pub fn with_public_access(self, bucket: &Resource<'_, S3Bucket>) -> Result<Self, AssertionError> {
        let statement = Pattern::object_like(fields! {
            "Action" => "s3:GetObject",
            "Effect" => "Allow",
            "Principal" => fields! { "AWS" => "*" },
            "Resource" => intrinsic::fn_join(Pattern::array_with([bucket.arn()?])),
        });

        Ok(self.with_property(
            "PolicyDocument",
            Pattern::object_like(fields! { "Statement" => Pattern::array_with([statement]) }),
        ))
    }
}
