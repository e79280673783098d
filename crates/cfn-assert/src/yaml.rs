//! YAML templates
//!
//! CloudFormation YAML allows short-form intrinsic functions (`!Ref Bucket`, `!GetAtt Bucket.Arn`, ...).
//! They are expanded to their long JSON form so that YAML and JSON templates match the same patterns.
use serde_json::{Map, Number, Value};
use serde_yaml::value::TaggedValue;

pub(crate) fn to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(bool) => Value::Bool(bool),
        Yaml::Number(number) => {
            if let Some(int) = number.as_i64() {
                return int.into();
            }
            if let Some(uint) = number.as_u64() {
                return uint.into();
            }
            number
                .as_f64()
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number)
        }
        Yaml::String(string) => Value::String(string),
        Yaml::Sequence(sequence) => Value::Array(sequence.into_iter().map(to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (key_to_string(key), to_json(value)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => expand_short_form(*tagged),
    }
}

fn key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(string) => string,
        serde_yaml::Value::Bool(bool) => bool.to_string(),
        serde_yaml::Value::Number(number) => number.to_string(),
        other => format!("{other:?}"),
    }
}

fn expand_short_form(tagged: TaggedValue) -> Value {
    let tag = tagged.tag.to_string();
    let name = tag.trim_start_matches('!');
    let value = to_json(tagged.value);

    let (key, value) = match (name, value) {
        ("Ref", value) => ("Ref".to_string(), value),
        ("Condition", value) => ("Condition".to_string(), value),
        // `!GetAtt Resource.Attribute` splits on the first dot
        ("GetAtt", Value::String(path)) => {
            let arguments = match path.split_once('.') {
                Some((resource, attribute)) => vec![resource.into(), attribute.into()],
                None => vec![Value::String(path)],
            };
            ("Fn::GetAtt".to_string(), Value::Array(arguments))
        }
        (name, value) => (format!("Fn::{name}"), value),
    };

    tracing::trace!(%tag, %key, "expanded short-form intrinsic");
    Value::Object(Map::from_iter([(key, value)]))
}
