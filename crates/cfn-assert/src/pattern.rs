//! pattern representation
//!
//! A [Pattern] describes what (part of) a template value is expected to look like.
//!
//! - literal (scalar, compared for equality)
//! - partial string (substring of the actual string)
//! - matcher (see [Matcher])
//! - array (same length, compared element by element)
//! - object (order-preserving "map", every listed key must be present and match; extra keys are fine)
//!
//! Plain values convert into patterns via [From]: strings, numbers and booleans become literals,
//! [serde_json::Value] objects and arrays are converted recursively.
//!
//! Builders apply one extra rule when a value is handed to a setter: a top-level plain string is
//! turned into a partial match (see [Pattern::shaped]). Nested strings stay literal.
use crate::matcher::{self, MatchResult, Matcher};
use crate::template::StringMatch;
use indexmap::IndexMap;
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serializer,
};
use serde_json::Value;

/// All possible pattern types
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Literal(Value),
    Partial(String),
    Matcher(Matcher),
    Object(IndexMap<String, Pattern>),
    Array(Vec<Pattern>),
}

impl Pattern {
    /// Deep equality with `value`, opting out of any partial matching
    pub fn exact(value: impl Into<Value>) -> Self {
        Matcher::Exact(value.into()).into()
    }

    /// The actual value is a string containing `needle`
    pub fn partial(needle: impl Into<String>) -> Self {
        Pattern::Partial(needle.into())
    }

    /// Key must be present with any non-null value
    pub fn any_value() -> Self {
        Matcher::AnyValue.into()
    }

    /// Key must not be present
    pub fn absent() -> Self {
        Matcher::Absent.into()
    }

    pub fn object_like<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Pattern>,
    {
        Matcher::ObjectLike(collect_fields(fields)).into()
    }

    pub fn object_equals<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Pattern>,
    {
        Matcher::ObjectEquals(collect_fields(fields)).into()
    }

    /// Array containing the given elements in this relative order
    pub fn array_with<P: Into<Pattern>>(elements: impl IntoIterator<Item = P>) -> Self {
        Matcher::ArrayWith(elements.into_iter().map(Into::into).collect()).into()
    }

    /// Array containing each of the given elements, in any order
    pub fn array_containing<P: Into<Pattern>>(elements: impl IntoIterator<Item = P>) -> Self {
        Matcher::ArrayContaining(elements.into_iter().map(Into::into).collect()).into()
    }

    pub fn array_equals<P: Into<Pattern>>(elements: impl IntoIterator<Item = P>) -> Self {
        Matcher::ArrayEquals(elements.into_iter().map(Into::into).collect()).into()
    }

    /// The actual value is a string matching the regular expression `regex`
    pub fn string_like(regex: &str) -> Result<Self, regex::Error> {
        Ok(Matcher::StringLike(matcher::StringLike::new(regex)?).into())
    }

    pub fn not(pattern: impl Into<Pattern>) -> Self {
        Matcher::Not(Box::new(pattern.into())).into()
    }

    /// Every one of `patterns` matches
    pub fn all_of<P: Into<Pattern>>(patterns: impl IntoIterator<Item = P>) -> Self {
        Matcher::AllOf(patterns.into_iter().map(Into::into).collect()).into()
    }

    /// The actual value is a string holding JSON which matches `pattern`
    pub fn serialized_json(pattern: impl Into<Pattern>) -> Self {
        Matcher::SerializedJson(Box::new(pattern.into())).into()
    }

    /// Applies the setter rule for plain strings
    ///
    /// A top-level literal string becomes a [Pattern::Partial] unless `mode` asks for exact
    /// strings. Everything else is returned untouched.
    pub fn shaped(self, mode: StringMatch) -> Self {
        match self {
            Pattern::Literal(Value::String(needle)) if mode == StringMatch::Partial => {
                Pattern::Partial(needle)
            }
            other => other,
        }
    }

    /// Matches `actual` and reports every mismatch
    pub fn test(&self, actual: &Value) -> MatchResult {
        let mut result = MatchResult::default();
        self.check(actual, &mut Vec::new(), &mut result);
        result
    }

    pub fn matches(&self, actual: &Value) -> bool {
        self.test(actual).is_success()
    }

    pub(crate) fn check(&self, actual: &Value, path: &mut Vec<String>, result: &mut MatchResult) {
        match self {
            Pattern::Literal(expected) => {
                if actual != expected {
                    result.fail(path, format!("Expected {expected} but received {actual}"));
                }
            }
            Pattern::Partial(needle) => match actual.as_str() {
                Some(haystack) if haystack.contains(needle.as_str()) => {}
                _ => result.fail(
                    path,
                    format!("Expected a string containing {needle:?} but received {actual}"),
                ),
            },
            Pattern::Matcher(matcher) => matcher.check(actual, path, result),
            Pattern::Object(fields) => matcher::check_object(fields, false, actual, path, result),
            Pattern::Array(elements) => matcher::check_array(elements, actual, path, result),
        }
    }

    pub(crate) fn is_absent(&self) -> bool {
        matches!(self, Pattern::Matcher(Matcher::Absent))
    }
}

fn collect_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> IndexMap<String, Pattern>
where
    K: Into<String>,
    V: Into<Pattern>,
{
    fields
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&rendered)
    }
}

impl From<Matcher> for Pattern {
    fn from(value: Matcher) -> Self {
        Pattern::Matcher(value)
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Pattern::Literal(Value::String(value))
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Pattern::Literal(Value::String(value.to_string()))
    }
}

impl From<&String> for Pattern {
    fn from(value: &String) -> Self {
        value.as_str().into()
    }
}

impl From<bool> for Pattern {
    fn from(value: bool) -> Self {
        Pattern::Literal(Value::Bool(value))
    }
}

impl From<i64> for Pattern {
    fn from(value: i64) -> Self {
        Pattern::Literal(value.into())
    }
}

impl From<i32> for Pattern {
    fn from(value: i32) -> Self {
        Pattern::Literal(value.into())
    }
}

impl From<u32> for Pattern {
    fn from(value: u32) -> Self {
        Pattern::Literal(value.into())
    }
}

impl From<u64> for Pattern {
    fn from(value: u64) -> Self {
        Pattern::Literal(value.into())
    }
}

impl From<f64> for Pattern {
    fn from(value: f64) -> Self {
        Pattern::Literal(value.into())
    }
}

impl<T: Into<Pattern>> From<Vec<T>> for Pattern {
    fn from(value: Vec<T>) -> Self {
        Pattern::Array(value.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Pattern>> for Pattern {
    fn from(value: IndexMap<String, Pattern>) -> Self {
        Pattern::Object(value)
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(array) => array.into(),
            Value::Object(object) => Pattern::Object(
                object
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
            scalar => Pattern::Literal(scalar),
        }
    }
}

impl serde::ser::Serialize for Pattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Pattern::Literal(value) => value.serialize(serializer),
            Pattern::Partial(value) => {
                let mut ser = serializer.serialize_map(Some(1))?;
                ser.serialize_entry("$partial", value)?;
                ser.end()
            }
            Pattern::Matcher(matcher) => matcher.serialize(serializer),
            Pattern::Array(value) => {
                let mut ser = serializer.serialize_seq(Some(value.len()))?;
                for element in value {
                    ser.serialize_element(element)?;
                }
                ser.end()
            }
            Pattern::Object(value) => {
                let mut ser = serializer.serialize_map(Some(value.len()))?;
                for (element_key, element_value) in value {
                    ser.serialize_entry(element_key, element_value)?;
                }
                ser.end()
            }
        }
    }
}

/// Utility macro to create the fields of an object [Pattern]
///
/// ```
/// # use cfn_assert::{fields, pattern::Pattern};
/// let fields = fields! {
///     "Action" => "sts:AssumeRole",
///     "Effect" => Pattern::partial("Allow"),
/// };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    { $($key:expr => $value:expr),* $(,)? } => {{
        #[allow(unused_mut)]
        let mut fields = $crate::indexmap::IndexMap::<::std::string::String, $crate::pattern::Pattern>::new();
        $(
            fields.insert(::std::string::String::from($key), $crate::pattern::Pattern::from($value));
        )*
        fields
    }};
}
