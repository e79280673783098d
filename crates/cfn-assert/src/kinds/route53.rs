//! Route 53 record sets
use super::{CloudFrontDistribution, Route53RecordSet};
use crate::error::AssertionError;
use crate::fields;
use crate::intrinsic;
use crate::pattern::Pattern;
use crate::resource::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ptr,
    Srv,
    Spf,
    Naptr,
    Caa,
    Ns,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
            RecordType::Ptr => "PTR",
            RecordType::Srv => "SRV",
            RecordType::Spf => "SPF",
            RecordType::Naptr => "NAPTR",
            RecordType::Caa => "CAA",
            RecordType::Ns => "NS",
        }
    }
}

impl<'t> Resource<'t, Route53RecordSet> {
    pub fn with_record_type(self, record_type: RecordType) -> Self {
        self.with_property("Type", Pattern::exact(record_type.as_str()))
    }

    pub fn with_name(self, name: &str) -> Self {
        self.with_property("Name", name)
    }

    /// Expect the record in hosted zone `zone`, e.g. `{ "Ref": "Zone" }`
    pub fn in_hosted_zone(self, zone: impl Into<Pattern>) -> Self {
        self.with_property("HostedZoneId", zone)
    }

    /// Expect exactly these record values, in this order
    pub fn with_resource_records(self, records: &[&str]) -> Self {
        self.with_property("ResourceRecords", records.to_vec())
    }

    pub fn with_alias_to_cloudfront(
        self,
        distribution: &Resource<'_, CloudFrontDistribution>,
    ) -> Result<Self, AssertionError> {
        let dns_name = distribution.arn_attribute("DomainName")?;
        Ok(self.with_property("AliasTarget", Pattern::object_like(fields! { "DNSName" => dns_name })))
    }

    /// Expect an alias to the S3 website endpoint of the template region
    ///
    /// Without a region any S3 website endpoint matches.
    pub fn with_alias_to_s3(self) -> Self {
        let endpoint = match self.template().region() {
            Some(region) => format!("s3-website.{region}.amazonaws.com"),
            None => "s3-website".to_string(),
        };
        self.with_property(
            "AliasTarget",
            Pattern::object_like(fields! { "DNSName" => Pattern::partial(endpoint) }),
        )
    }

    /// Like [Resource::with_alias_to_s3] for a bucket website referenced through its URL
    pub fn with_alias_to_s3_website_url(
        self,
        bucket: &Resource<'_, super::S3Bucket>,
    ) -> Result<Self, AssertionError> {
        let dns_name = intrinsic::website_url_of(bucket)?;
        Ok(self.with_property("AliasTarget", Pattern::object_like(fields! { "DNSName" => dns_name })))
    }
}
