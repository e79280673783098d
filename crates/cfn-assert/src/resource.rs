//! The resource matcher
//!
//! A [Resource] accumulates what is known about one resource of a template across chained setter
//! calls and resolves it against the template whenever a terminal operation asks for it.
//!
//! The accumulated `config` is a single object matched (as subset) against resource bodies.
//! It has three independent facets:
//! - properties, under the `Properties` key
//! - metadata, under the `Metadata` key
//! - root, every other top level key (`DeletionPolicy`, `DependsOn`, ...)
//!
//! Once the property or metadata facet is touched, its key holds an object-subset matcher and
//! later writes merge into it (last write per key wins).
//!
//! Nothing is cached: every terminal operation runs a fresh query, so setters called after an
//! assertion are honored by the next one.
use crate::error::{AssertionError, DebugContext, Failure};
use crate::intrinsic;
use crate::kinds::Any;
use crate::matcher::Matcher;
use crate::pattern::Pattern;
use crate::template::Template;
use indexmap::IndexMap;
use serde_json::Value;
use std::borrow::Cow;
use std::marker::PhantomData;

pub const PROPERTIES: &str = "Properties";
pub const METADATA: &str = "Metadata";
pub const DEPENDS_ON: &str = "DependsOn";

#[derive(Debug, Clone)]
pub struct Resource<'t, K = Any> {
    template: &'t Template,
    kind: Cow<'static, str>,
    config: IndexMap<String, Pattern>,
    partial_key: Option<String>,
    dependencies: Vec<String>,
    lists: IndexMap<&'static str, Vec<Pattern>>,
    marker: PhantomData<K>,
}

impl<'t, K> Resource<'t, K> {
    pub(crate) fn new(template: &'t Template, kind: impl Into<Cow<'static, str>>) -> Self {
        Self {
            template,
            kind: kind.into(),
            config: IndexMap::new(),
            partial_key: None,
            dependencies: Vec::new(),
            lists: IndexMap::new(),
            marker: PhantomData,
        }
    }

    /// The resource type tag, e.g. `AWS::S3::Bucket`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn template(&self) -> &'t Template {
        self.template
    }

    /// Everything known so far, as matched against resource bodies
    pub fn config(&self) -> Pattern {
        Matcher::ObjectLike(self.config.clone()).into()
    }

    fn shape(&self, value: Pattern) -> Pattern {
        value.shaped(self.template.string_match())
    }

    fn facet_mut(&mut self, facet: &str) -> &mut IndexMap<String, Pattern> {
        let slot = self
            .config
            .entry(facet.to_string())
            .or_insert_with(|| Matcher::ObjectLike(IndexMap::new()).into());
        accumulator(slot)
    }

    fn with_facet_value(mut self, facet: &str, key: String, value: Pattern) -> Self {
        tracing::trace!(kind=%self.kind, facet, %key, %value, "set");
        self.facet_mut(facet).insert(key, value);
        self
    }

    /// Expect property `key` to match `value`
    ///
    /// A plain string matches any string containing it (see [crate::template::StringMatch]),
    /// use [Pattern::exact] for exact strings. Matchers and structured values are stored as given.
    pub fn with_property(self, key: impl Into<String>, value: impl Into<Pattern>) -> Self {
        let value = self.shape(value.into());
        self.with_facet_value(PROPERTIES, key.into(), value)
    }

    /// Expect property `key` to be present, with any value
    pub fn with_property_present(self, key: impl Into<String>) -> Self {
        self.with_facet_value(PROPERTIES, key.into(), Pattern::any_value())
    }

    /// Expect the property nested at `path` to match `value`
    ///
    /// Intermediate objects are matched as subsets and merge with earlier writes to the same path.
    /// An empty `path` names no property, the matcher is returned unchanged.
    pub fn with_property_at(mut self, path: &[&str], value: impl Into<Pattern>) -> Self {
        let value = self.shape(value.into());
        let Some((last, parents)) = path.split_last() else {
            tracing::warn!(kind=%self.kind, %value, "empty property path ignored");
            return self;
        };

        tracing::trace!(kind=%self.kind, ?path, %value, "set nested");
        let mut fields = self.facet_mut(PROPERTIES);
        for parent in parents {
            let slot = fields
                .entry(parent.to_string())
                .or_insert_with(|| Matcher::ObjectLike(IndexMap::new()).into());
            fields = accumulator(slot);
        }
        fields.insert(last.to_string(), value);
        self
    }

    /// Expect metadata `key` to match `value`, shaped like [Resource::with_property]
    pub fn with_metadata(self, key: impl Into<String>, value: impl Into<Pattern>) -> Self {
        let value = self.shape(value.into());
        self.with_facet_value(METADATA, key.into(), value)
    }

    pub fn with_metadata_present(self, key: impl Into<String>) -> Self {
        self.with_facet_value(METADATA, key.into(), Pattern::any_value())
    }

    /// Expect top level key `key` to match `value`, shaped like [Resource::with_property]
    pub fn with_root_property(mut self, key: impl Into<String>, value: impl Into<Pattern>) -> Self {
        let key = key.into();
        let value = self.shape(value.into());
        tracing::trace!(kind=%self.kind, %key, %value, "set root");
        self.config.insert(key, value);
        self
    }

    pub fn with_root_property_present(self, key: impl Into<String>) -> Self {
        self.with_root_property(key, Pattern::any_value())
    }

    /// Only consider resources whose logical id contains `partial_key` (ignoring case)
    pub fn with_partial_key(mut self, partial_key: impl Into<String>) -> Self {
        self.partial_key = Some(partial_key.into());
        self
    }

    /// Appends `item` to the named list and returns the whole list
    ///
    /// Lists only grow. Setters use them to re-render a property from every item added so far.
    pub fn accumulate(&mut self, list: &'static str, item: Pattern) -> Vec<Pattern> {
        let items = self.lists.entry(list).or_default();
        items.push(item);
        items.clone()
    }

    /// Expect this resource to depend on `other`
    ///
    /// Dependencies add up, every one of them must be listed in `DependsOn` (in any order).
    pub fn depends_on<O>(mut self, other: &Resource<'_, O>) -> Result<Self, AssertionError> {
        self.dependencies.push(other.id()?);
        let dependencies: Vec<Pattern> = self.dependencies.iter().map(Pattern::from).collect();
        self.config
            .insert(DEPENDS_ON.to_string(), Pattern::array_containing(dependencies));
        Ok(self)
    }

    /// All resources of this type matching everything known so far
    pub fn find(&self) -> IndexMap<String, Value> {
        let mut found = self
            .template
            .find_resources(&self.kind, Some(&self.config()));

        if let Some(partial_key) = &self.partial_key {
            let partial_key = partial_key.to_lowercase();
            found.retain(|key, _| key.to_lowercase().contains(&partial_key));
        }

        tracing::debug!(kind=%self.kind, partial_key=?self.partial_key, count=found.len(), "find");
        found
    }

    /// All resources of this type
    pub fn find_similar_type(&self) -> IndexMap<String, Value> {
        self.template.find_resources(&self.kind, None)
    }

    fn resolve(&self) -> Result<(String, Value), AssertionError> {
        let mut found = self.find();
        if found.len() > 1 {
            let ids = found.keys().cloned().collect();
            return Err(self.failure(Failure::NotUnique { ids }));
        }

        found
            .pop()
            .ok_or_else(|| self.failure(Failure::NotFound))
    }

    /// The body of the one matching resource, with its logical id under `Id`
    pub fn definition(&self) -> Result<Value, AssertionError> {
        let (id, mut body) = self.resolve()?;
        if let Value::Object(fields) = &mut body {
            fields.insert("Id".to_string(), Value::String(id));
        }
        Ok(body)
    }

    /// Logical id of the one matching resource
    pub fn id(&self) -> Result<String, AssertionError> {
        self.resolve().map(|(id, _)| id)
    }

    /// Matches `{ "Fn::GetAtt": [<id>, "Arn"] }`
    pub fn arn(&self) -> Result<Pattern, AssertionError> {
        intrinsic::arn_of(self)
    }

    /// Matches `{ "Fn::GetAtt": [<id>, <attribute>] }`
    pub fn arn_attribute(&self, attribute: &str) -> Result<Pattern, AssertionError> {
        intrinsic::attribute_of(self, attribute)
    }

    /// Matches exactly `{ "Ref": <id> }`
    pub fn reference(&self) -> Result<Pattern, AssertionError> {
        Ok(Pattern::exact(serde_json::json!({ "Ref": self.id()? })))
    }

    pub fn count(&self) -> usize {
        self.find().len()
    }

    pub fn exists(&self) -> Result<(), AssertionError> {
        self.assert(self.count() > 0, Failure::DoesNotExist)
    }

    pub fn does_not_exist(&self) -> Result<(), AssertionError> {
        let found = self.find();
        self.assert(
            found.is_empty(),
            Failure::Exists {
                ids: found.keys().cloned().collect(),
            },
        )
    }

    pub fn count_is(&self, count: usize) -> Result<(), AssertionError> {
        let actual = self.count();
        self.assert(
            actual == count,
            Failure::CountMismatch {
                expected: count,
                actual,
            },
        )
    }

    pub fn to_json(&self) -> Result<Value, AssertionError> {
        self.definition()
    }

    pub fn debug_context(&self) -> DebugContext {
        DebugContext::new(self.config(), self.find_similar_type())
    }

    pub fn to_debug_string(&self) -> String {
        self.debug_context().to_string()
    }

    pub fn assert(&self, condition: bool, failure: Failure) -> Result<(), AssertionError> {
        if condition {
            return Ok(());
        }
        Err(self.failure(failure))
    }

    pub(crate) fn failure(&self, failure: Failure) -> AssertionError {
        tracing::debug!(kind=%self.kind, %failure, "assertion failed");
        AssertionError::new(failure, self.debug_context())
    }

    /// Expect the matching resource to carry tag `key`, with `value` if given
    ///
    /// Tags may be a list of `{ "Key", "Value" }` objects or a plain object.
    pub fn has_tag(&self, key: &str, value: Option<&str>) -> Result<&Self, AssertionError> {
        let definition = self.definition()?;
        let actual = definition
            .pointer("/Properties/Tags")
            .and_then(|tags| tag_value(tags, key));

        let Some(actual) = actual else {
            return Err(self.failure(Failure::TagMissing { key: key.into() }));
        };

        if let Some(expected) = value {
            self.assert(
                actual.as_str() == Some(expected),
                Failure::TagValueMismatch {
                    key: key.into(),
                    expected: expected.into(),
                    actual: actual.clone(),
                },
            )?;
        }

        Ok(self)
    }
}

fn tag_value<'v>(tags: &'v Value, key: &str) -> Option<&'v Value> {
    const NULL: &Value = &Value::Null;

    match tags {
        Value::Array(tags) => tags
            .iter()
            .find(|tag| tag.get("Key").and_then(Value::as_str) == Some(key))
            .map(|tag| tag.get("Value").unwrap_or(NULL)),
        Value::Object(tags) => tags.get(key),
        _ => None,
    }
}

/// Turns `slot` into an object-subset matcher and returns its fields
///
/// Fields of an object literal already in the slot are kept. Any other pattern stays in force
/// next to the new fields, as an [Matcher::AllOf] ending in them.
fn accumulator(slot: &mut Pattern) -> &mut IndexMap<String, Pattern> {
    *slot = match std::mem::replace(slot, Pattern::Literal(Value::Null)) {
        Pattern::Matcher(Matcher::ObjectLike(fields)) | Pattern::Object(fields) => {
            Matcher::ObjectLike(fields).into()
        }
        Pattern::Matcher(Matcher::AllOf(patterns))
            if matches!(patterns.last(), Some(Pattern::Matcher(Matcher::ObjectLike(_)))) =>
        {
            Matcher::AllOf(patterns).into()
        }
        constraint => Pattern::all_of([constraint, Matcher::ObjectLike(IndexMap::new()).into()]),
    };

    let fields = match slot {
        Pattern::Matcher(Matcher::AllOf(patterns)) => patterns.last_mut(),
        slot => Some(slot),
    };
    match fields {
        Some(Pattern::Matcher(Matcher::ObjectLike(fields))) => fields,
        _ => unreachable!("slot ends in an object matcher"),
    }
}
