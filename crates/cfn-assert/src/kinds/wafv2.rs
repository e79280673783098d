//! WAFv2 web ACLs
use super::WafV2WebAcl;
use crate::error::{AssertionError, Failure};
use crate::pattern::Pattern;
use crate::resource::Resource;
use serde_json::Value;

pub const DEFAULT_VENDOR: &str = "AWS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebAclScope {
    Regional,
    CloudFront,
}

impl WebAclScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebAclScope::Regional => "REGIONAL",
            WebAclScope::CloudFront => "CLOUDFRONT",
        }
    }
}

impl<'t> Resource<'t, WafV2WebAcl> {
    pub fn in_scope(self, scope: WebAclScope) -> Self {
        self.with_property("Scope", Pattern::exact(scope.as_str()))
    }

    /// Rules of the matching web ACL
    pub fn rules(&self) -> Result<Vec<Value>, AssertionError> {
        let definition = self.definition()?;
        let rules = definition
            .pointer("/Properties/Rules")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(rules)
    }

    /// Expect a rule using the managed rule group `name` of `vendor` ([DEFAULT_VENDOR] if `None`)
    pub fn has_named_rule(&self, name: &str, vendor: Option<&str>) -> Result<&Self, AssertionError> {
        let vendor = vendor.unwrap_or(DEFAULT_VENDOR);
        let found = self.rules()?.iter().any(|rule| {
            let statement = rule.pointer("/Statement/ManagedRuleGroupStatement");
            statement.and_then(|s| s.get("Name")).and_then(Value::as_str) == Some(name)
                && statement.and_then(|s| s.get("VendorName")).and_then(Value::as_str) == Some(vendor)
        });

        self.assert(found, Failure::RuleMissing(format!("named rule: {vendor}/{name}")))?;
        Ok(self)
    }

    /// Expect a rate based rule limiting requests per `key_type` (e.g. `IP`) to `limit`
    pub fn has_rate_based_rule(&self, key_type: &str, limit: u64) -> Result<&Self, AssertionError> {
        let found = self.rules()?.iter().any(|rule| {
            let statement = rule.pointer("/Statement/RateBasedStatement");
            statement.and_then(|s| s.get("AggregateKeyType")).and_then(Value::as_str) == Some(key_type)
                && statement.and_then(|s| s.get("Limit")).and_then(Value::as_u64) == Some(limit)
        });

        self.assert(found, Failure::RuleMissing(format!("rate based rule: {key_type}/{limit}")))?;
        Ok(self)
    }
}
