//! matcher primitives
//!
//! Matchers are the building blocks nested inside a [Pattern]. From the point of view of a
//! builder they are opaque values, indistinguishable from literals.
use crate::pattern::Pattern;
use indexmap::IndexMap;
use regex::Regex;
use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Deep equality
    Exact(Value),
    /// Every listed key present and matching, extra keys allowed
    ObjectLike(IndexMap<String, Pattern>),
    /// Like [Matcher::ObjectLike] but extra keys are rejected
    ObjectEquals(IndexMap<String, Pattern>),
    /// Every element matches, in this relative order (other elements may sit in between)
    ArrayWith(Vec<Pattern>),
    /// Every element matches its own element of the array, in any order
    ///
    /// A single non-array value counts as a one-element array (`DependsOn: Role`).
    ArrayContaining(Vec<Pattern>),
    ArrayEquals(Vec<Pattern>),
    StringLike(StringLike),
    AnyValue,
    Absent,
    Not(Box<Pattern>),
    SerializedJson(Box<Pattern>),
    /// Every pattern matches the same value
    AllOf(Vec<Pattern>),
}

/// Regular expression compared by its source
#[derive(Debug, Clone)]
pub struct StringLike(Regex);

impl StringLike {
    pub fn new(regex: &str) -> Result<Self, regex::Error> {
        Regex::new(regex).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for StringLike {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Matcher {
    pub(crate) fn check(&self, actual: &Value, path: &mut Vec<String>, result: &mut MatchResult) {
        match self {
            Matcher::Exact(expected) => {
                if actual != expected {
                    result.fail(path, format!("Expected {expected} but received {actual}"));
                }
            }
            Matcher::ObjectLike(fields) => check_object(fields, false, actual, path, result),
            Matcher::ObjectEquals(fields) => check_object(fields, true, actual, path, result),
            Matcher::ArrayWith(elements) => {
                let Some(items) = actual.as_array() else {
                    result.fail(path, format!("Expected an array but received {actual}"));
                    return;
                };

                let mut next = 0;
                for (index, element) in elements.iter().enumerate() {
                    match items[next..].iter().position(|item| element.matches(item)) {
                        Some(offset) => next += offset + 1,
                        None => {
                            result.fail(
                                path,
                                format!("Could not match pattern element {index} ({element}) in order"),
                            );
                            return;
                        }
                    }
                }
            }
            Matcher::ArrayContaining(elements) => {
                let items = match actual {
                    Value::Array(items) => items.as_slice(),
                    single => std::slice::from_ref(single),
                };

                for element in unassigned(elements, items) {
                    result.fail(path, format!("Array does not contain {}", elements[element]));
                }
            }
            Matcher::ArrayEquals(elements) => check_array(elements, actual, path, result),
            Matcher::StringLike(regex) => match actual.as_str() {
                Some(haystack) if regex.0.is_match(haystack) => {}
                _ => result.fail(
                    path,
                    format!("Expected a string like /{}/ but received {actual}", regex.as_str()),
                ),
            },
            Matcher::AnyValue => {
                if actual.is_null() {
                    result.fail(path, "Expected a value but received null".to_string());
                }
            }
            Matcher::Absent => {
                result.fail(path, format!("Expected no value but received {actual}"));
            }
            Matcher::Not(pattern) => {
                if pattern.matches(actual) {
                    result.fail(path, format!("Expected {actual} not to match {pattern}"));
                }
            }
            Matcher::SerializedJson(pattern) => {
                let Some(serialized) = actual.as_str() else {
                    result.fail(path, format!("Expected serialized JSON but received {actual}"));
                    return;
                };

                match serde_json::from_str::<Value>(serialized) {
                    Ok(parsed) => pattern.check(&parsed, path, result),
                    Err(err) => result.fail(path, format!("Invalid serialized JSON: {err}")),
                }
            }
            Matcher::AllOf(patterns) => {
                for pattern in patterns {
                    pattern.check(actual, path, result);
                }
            }
        }
    }
}

/// Indices of `elements` left without an item of their own
///
/// Bipartite matching by augmenting paths, so an element matching several items does not take
/// the only item another element could use.
fn unassigned(elements: &[Pattern], items: &[Value]) -> Vec<usize> {
    let candidates: Vec<Vec<usize>> = elements
        .iter()
        .map(|element| {
            items
                .iter()
                .enumerate()
                .filter(|(_, item)| element.matches(item))
                .map(|(index, _)| index)
                .collect()
        })
        .collect();

    let mut owners = vec![None; items.len()];
    (0..elements.len())
        .filter(|&element| !assign(element, &candidates, &mut owners, &mut vec![false; items.len()]))
        .collect()
}

fn assign(
    element: usize,
    candidates: &[Vec<usize>],
    owners: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &item in &candidates[element] {
        if visited[item] {
            continue;
        }
        visited[item] = true;

        let free = match owners[item] {
            None => true,
            Some(owner) => assign(owner, candidates, owners, visited),
        };
        if free {
            owners[item] = Some(element);
            return true;
        }
    }
    false
}

pub(crate) fn check_object(
    fields: &IndexMap<String, Pattern>,
    exact: bool,
    actual: &Value,
    path: &mut Vec<String>,
    result: &mut MatchResult,
) {
    let Some(object) = actual.as_object() else {
        result.fail(path, format!("Expected an object but received {actual}"));
        return;
    };

    for (key, pattern) in fields {
        path.push(key.clone());
        match object.get(key) {
            None if pattern.is_absent() => {}
            None => result.fail(path, "Missing key".to_string()),
            Some(value) => pattern.check(value, path, result),
        }
        path.pop();
    }

    if exact {
        for key in object.keys().filter(|key| !fields.contains_key(*key)) {
            path.push(key.clone());
            result.fail(path, "Unexpected key".to_string());
            path.pop();
        }
    }
}

pub(crate) fn check_array(
    elements: &[Pattern],
    actual: &Value,
    path: &mut Vec<String>,
    result: &mut MatchResult,
) {
    let Some(items) = actual.as_array() else {
        result.fail(path, format!("Expected an array but received {actual}"));
        return;
    };

    if items.len() != elements.len() {
        result.fail(
            path,
            format!(
                "Expected array of length {} but received length {}",
                elements.len(),
                items.len()
            ),
        );
        return;
    }

    for (index, (element, item)) in elements.iter().zip(items).enumerate() {
        path.push(index.to_string());
        element.check(item, path, result);
        path.pop();
    }
}

/// A single mismatch, located by its JSON path
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct MatchFailure {
    pub path: String,
    pub message: String,
}

/// Outcome of matching a [Pattern] against a value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    failures: Vec<MatchFailure>,
}

impl MatchResult {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[MatchFailure] {
        &self.failures
    }

    pub(crate) fn fail(&mut self, path: &[String], message: String) {
        let failure = MatchFailure::new(format!("/{}", path.join("/")), message);
        tracing::trace!(?failure, "mismatch");
        self.failures.push(failure);
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "  at {}: {}", failure.path, failure.message)?;
        }
        Ok(())
    }
}

impl Serialize for Matcher {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Matcher::Exact(value) => tagged(serializer, "$exact", value),
            Matcher::ObjectLike(fields) => tagged(serializer, "$objectLike", fields),
            Matcher::ObjectEquals(fields) => tagged(serializer, "$objectEquals", fields),
            Matcher::ArrayWith(elements) => tagged(serializer, "$arrayWith", elements),
            Matcher::ArrayContaining(elements) => tagged(serializer, "$arrayContaining", elements),
            Matcher::ArrayEquals(elements) => tagged(serializer, "$arrayEquals", elements),
            Matcher::StringLike(regex) => tagged(serializer, "$stringLike", regex.as_str()),
            Matcher::AnyValue => serializer.serialize_str("$anyValue"),
            Matcher::Absent => serializer.serialize_str("$absent"),
            Matcher::Not(pattern) => tagged(serializer, "$not", pattern),
            Matcher::SerializedJson(pattern) => tagged(serializer, "$serializedJson", pattern),
            Matcher::AllOf(patterns) => tagged(serializer, "$allOf", patterns),
        }
    }
}

fn tagged<S, T>(serializer: S, tag: &str, value: &T) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize + ?Sized,
{
    let mut ser = serializer.serialize_map(Some(1))?;
    ser.serialize_entry(tag, value)?;
    ser.end()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fields;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn object_like_allows_extra_keys() {
        let pattern = Pattern::object_like(fields! { "A" => 1 });

        assert!(pattern.matches(&json!({ "A": 1, "B": 2 })));
        assert!(!pattern.matches(&json!({ "B": 2 })));
        assert!(!pattern.matches(&json!("A")));
    }

    #[test]
    fn object_equals_rejects_extra_keys() {
        let pattern = Pattern::object_equals(fields! { "A" => 1 });

        assert!(pattern.matches(&json!({ "A": 1 })));

        let result = pattern.test(&json!({ "A": 1, "B": 2 }));
        assert_eq!(
            result.failures(),
            &[MatchFailure::new("/B".into(), "Unexpected key".into())]
        );
    }

    #[test]
    fn absent_keys() {
        let pattern = Pattern::object_like(fields! { "A" => Pattern::absent() });

        assert!(pattern.matches(&json!({ "B": 1 })));
        assert!(!pattern.matches(&json!({ "A": 1 })));
    }

    #[test]
    fn array_with_keeps_relative_order() {
        let pattern = Pattern::array_with(["a", "c"]);

        assert!(pattern.matches(&json!(["a", "b", "c"])));
        assert!(!pattern.matches(&json!(["c", "b", "a"])));
        assert!(!pattern.matches(&json!(["a"])));
    }

    #[test]
    fn array_containing_ignores_order() {
        let pattern = Pattern::array_containing(["a", "c"]);

        assert!(pattern.matches(&json!(["c", "b", "a"])));
        assert!(!pattern.matches(&json!(["a", "b"])));
    }

    #[test]
    fn array_containing_needs_an_element_per_pattern() {
        let twice = Pattern::array_containing(["Foo", "Foo"]);
        assert!(!twice.matches(&json!(["Foo"])));
        assert!(twice.matches(&json!(["Foo", "Bar", "Foo"])));

        let overlapping = Pattern::array_containing([Pattern::any_value(), "a".into()]);
        assert!(overlapping.matches(&json!(["a", "b"])));
        assert!(!overlapping.matches(&json!(["a"])));

        let result = twice.test(&json!(["Foo"]));
        assert_eq!(
            result.failures(),
            &[MatchFailure::new("/".into(), r#"Array does not contain "Foo""#.into())]
        );
    }

    #[test]
    fn array_containing_accepts_a_single_value() {
        assert!(Pattern::array_containing(["Role"]).matches(&json!("Role")));
        assert!(!Pattern::array_containing(["Role"]).matches(&json!("Other")));
        assert!(!Pattern::array_containing(["Role", "Policy"]).matches(&json!("Role")));
    }

    #[test]
    fn all_of() {
        let pattern = Pattern::all_of([
            Pattern::not(Pattern::object_like(fields! { "A" => 1 })),
            Pattern::object_like(fields! { "B" => 2 }),
        ]);

        assert!(pattern.matches(&json!({ "A": 3, "B": 2 })));
        assert!(!pattern.matches(&json!({ "A": 1, "B": 2 })));
        assert!(!pattern.matches(&json!({ "A": 3 })));
        assert_eq!(
            pattern.to_string(),
            r#"{"$allOf":[{"$not":{"$objectLike":{"A":1}}},{"$objectLike":{"B":2}}]}"#
        );
    }

    #[test]
    fn string_like() {
        let pattern = Pattern::string_like("^nodejs[0-9]+").unwrap();

        assert!(pattern.matches(&json!("nodejs18.x")));
        assert!(!pattern.matches(&json!("python3.12")));
        assert!(Pattern::string_like("*.example.com").is_err());
    }

    #[test]
    fn any_value_and_not() {
        assert!(Pattern::any_value().matches(&json!(false)));
        assert!(!Pattern::any_value().matches(&Value::Null));

        assert!(Pattern::not("a").matches(&json!("b")));
        assert!(!Pattern::not("a").matches(&json!("a")));
    }

    #[test]
    fn serialized_json() {
        let pattern = Pattern::serialized_json(Pattern::object_like(fields! {
            "service" => "SSM",
        }));

        assert!(pattern.matches(&json!(r#"{"service":"SSM","action":"getParameter"}"#)));
        assert!(!pattern.matches(&json!(r#"{"service":"S3"}"#)));
        assert!(!pattern.matches(&json!("not json")));
    }

    #[test]
    fn failures_carry_their_path() {
        let pattern = Pattern::from(json!({
            "Properties": { "Tags": [{ "Key": "Team" }] }
        }));

        let result = pattern.test(&json!({
            "Properties": { "Tags": [{ "Key": "Owner" }] }
        }));

        assert_eq!(
            result.to_string(),
            r#"  at /Properties/Tags/0/Key: Expected "Team" but received "Owner""#
        );
    }
}
