//! Patterns for intrinsic function calls (`Fn::GetAtt`, `Fn::Join`, ...)
//!
//! A call pattern `{ "Fn::<name>": [<args>...] }` matches any call of that function whose
//! argument list contains the given arguments in this relative order.
use crate::error::AssertionError;
use crate::pattern::Pattern;
use crate::resource::Resource;

pub const ARN: &str = "Arn";
pub const WEBSITE_URL: &str = "WebsiteURL";

/// `Fn::<name>` called with at least `arguments`, in order
pub fn fn_call<P: Into<Pattern>>(name: &str, arguments: impl IntoIterator<Item = P>) -> Pattern {
    Pattern::object_like([(format!("Fn::{name}"), Pattern::array_with(arguments))])
}

pub fn fn_select(argument: impl Into<Pattern>) -> Pattern {
    fn_call::<Pattern>("Select", [argument.into()])
}

pub fn fn_split(argument: impl Into<Pattern>) -> Pattern {
    fn_call::<Pattern>("Split", [argument.into()])
}

pub fn fn_get_att<P: Into<Pattern>>(arguments: impl IntoIterator<Item = P>) -> Pattern {
    fn_call("GetAtt", arguments)
}

pub fn fn_equals<P: Into<Pattern>>(arguments: impl IntoIterator<Item = P>) -> Pattern {
    fn_call("Equals", arguments)
}

pub fn fn_join(argument: impl Into<Pattern>) -> Pattern {
    fn_call::<Pattern>("Join", [argument.into()])
}

/// `Fn::GetAtt` of the `Arn` attribute of `resource`
pub fn arn_of<K>(resource: &Resource<'_, K>) -> Result<Pattern, AssertionError> {
    attribute_of(resource, ARN)
}

/// `Fn::GetAtt` of `attribute` of `resource`
pub fn attribute_of<K>(resource: &Resource<'_, K>, attribute: &str) -> Result<Pattern, AssertionError> {
    let id = resource.id()?;
    Ok(fn_get_att([id.as_str(), attribute]))
}

/// The website endpoint of a bucket
///
/// CloudFormation has no plain attribute for it, templates derive it from the `WebsiteURL`
/// attribute as `Fn::Select(Fn::Split(Fn::GetAtt(bucket, WebsiteURL)))`.
pub fn website_url_of<K>(bucket: &Resource<'_, K>) -> Result<Pattern, AssertionError> {
    Ok(fn_select(fn_split(attribute_of(bucket, WEBSITE_URL)?)))
}
