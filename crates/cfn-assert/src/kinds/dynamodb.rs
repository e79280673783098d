//! DynamoDB tables
use super::DynamoDbTable;
use crate::fields;
use crate::pattern::Pattern;
use crate::resource::Resource;

const KEYS: &str = "keys";
const ATTRIBUTES: &str = "attributes";

/// Type of a key attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributeType {
    #[default]
    String,
    Number,
    Binary,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "S",
            AttributeType::Number => "N",
            AttributeType::Binary => "B",
        }
    }
}

impl<'t> Resource<'t, DynamoDbTable> {
    pub fn with_table_name(self, name: &str) -> Self {
        self.with_property("TableName", name)
    }

    /// Expect `key` in the key schema, defined with `attribute_type`
    ///
    /// Keys add up in the order given (partition key first).
    pub fn with_key(mut self, key: &str, attribute_type: AttributeType) -> Self {
        let keys = self.accumulate(KEYS, Pattern::object_like(fields! { "AttributeName" => key }));
        let attributes = self.accumulate(
            ATTRIBUTES,
            Pattern::object_equals(fields! {
                "AttributeName" => key,
                "AttributeType" => attribute_type.as_str(),
            }),
        );

        self.with_property("KeySchema", Pattern::array_with(keys))
            .with_property("AttributeDefinitions", Pattern::array_containing(attributes))
    }
}
