//! a parsed CloudFormation template and the queries run against it
//!
//! [Template] holds
//! - the template document (an object with `Resources`, `Parameters`, `Outputs`, `Conditions`
//!   and `Mappings` sections)
//! - the region the template was synthesized for (if known)
//! - how resource builders treat plain strings ([StringMatch])
//! - the source path, when loaded from a file
//!
//! Query results keep the document order of the section they come from.
use crate::error::{LoadError, TemplateMismatch};
use crate::kinds::{Any, AnyRemovable, ResourceKind};
use crate::matcher::MatchResult;
use crate::pattern::Pattern;
use crate::resource::Resource;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// How resource builders treat a plain string handed to a setter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StringMatch {
    /// The actual string must contain the given one
    #[default]
    Partial,
    /// The actual string must equal the given one
    Exact,
}

#[derive(Debug, Clone)]
pub struct Template {
    document: Map<String, Value>,
    region: Option<String>,
    string_match: StringMatch,
    source: Option<PathBuf>,
}

/// Top level sections of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Resources,
    Parameters,
    Outputs,
    Conditions,
    Mappings,
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Resources => f.write_str("Resources"),
            Section::Parameters => f.write_str("Parameters"),
            Section::Outputs => f.write_str("Outputs"),
            Section::Conditions => f.write_str("Conditions"),
            Section::Mappings => f.write_str("Mappings"),
        }
    }
}

impl Template {
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        let Value::Object(document) = value else {
            return Err(LoadError::NotAnObject);
        };

        Ok(Self {
            document,
            region: None,
            string_match: StringMatch::default(),
            source: None,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Parses a YAML template, expanding short-form intrinsic functions
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LoadError> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(crate::yaml::to_json(value))
    }

    /// Loads a template file, `.yaml`/`.yml` files are read as YAML and everything else as JSON
    pub fn load_file(file_path: &Path) -> Result<Self, LoadError> {
        let file_path = file_path.canonicalize()?;
        tracing::info!(path=%file_path.display(), "loading template");

        let file_contents = std::fs::read_to_string(&file_path)?;
        let is_yaml = file_path
            .extension()
            .map_or(false, |extension| extension == "yaml" || extension == "yml");

        let mut template = if is_yaml {
            Self::from_yaml_str(&file_contents)?
        } else {
            Self::from_json_str(&file_contents)?
        };

        template.source = Some(file_path);
        Ok(template)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_string_match(mut self, string_match: StringMatch) -> Self {
        self.string_match = string_match;
        self
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn string_match(&self) -> StringMatch {
        self.string_match
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.document.clone())
    }

    fn section(&self, section: Section) -> impl Iterator<Item = (&String, &Value)> {
        self.document
            .get(&section.to_string())
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|entries| entries.iter())
    }

    fn resources_of_type<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = (&'a String, &'a Value)> {
        self.section(Section::Resources)
            .filter(move |(_, body)| body.get("Type").and_then(Value::as_str) == Some(kind))
    }

    /// All resources of type `kind` whose body matches `pattern`
    pub fn find_resources(&self, kind: &str, pattern: Option<&Pattern>) -> IndexMap<String, Value> {
        self.resources_of_type(kind)
            .filter(|(_, body)| pattern.map_or(true, |pattern| pattern.matches(body)))
            .map(|(key, body)| (key.clone(), body.clone()))
            .collect()
    }

    /// Entries of `section` named `logical_id` (or all of them for `"*"`) matching `pattern`
    pub fn find_in_section(
        &self,
        section: Section,
        logical_id: &str,
        pattern: Option<&Pattern>,
    ) -> IndexMap<String, Value> {
        self.section(section)
            .filter(|(key, _)| logical_id == "*" || key.as_str() == logical_id)
            .filter(|(_, body)| pattern.map_or(true, |pattern| pattern.matches(body)))
            .map(|(key, body)| (key.clone(), body.clone()))
            .collect()
    }

    pub fn find_parameters(&self, logical_id: &str, pattern: Option<&Pattern>) -> IndexMap<String, Value> {
        self.find_in_section(Section::Parameters, logical_id, pattern)
    }

    pub fn find_outputs(&self, logical_id: &str, pattern: Option<&Pattern>) -> IndexMap<String, Value> {
        self.find_in_section(Section::Outputs, logical_id, pattern)
    }

    pub fn find_conditions(&self, logical_id: &str, pattern: Option<&Pattern>) -> IndexMap<String, Value> {
        self.find_in_section(Section::Conditions, logical_id, pattern)
    }

    pub fn find_mappings(&self, logical_id: &str, pattern: Option<&Pattern>) -> IndexMap<String, Value> {
        self.find_in_section(Section::Mappings, logical_id, pattern)
    }

    pub fn resource_count_is(&self, kind: &str, count: usize) -> Result<(), TemplateMismatch> {
        let actual = self.resources_of_type(kind).count();
        if actual != count {
            return Err(TemplateMismatch::new(
                format!("Expected {count} resources of type {kind} but found {actual}"),
                None,
            ));
        }
        Ok(())
    }

    pub fn has_resource(&self, kind: &str, pattern: impl Into<Pattern>) -> Result<(), TemplateMismatch> {
        let pattern: Pattern = pattern.into();
        let candidates: Vec<_> = self.resources_of_type(kind).collect();
        expect_any_match(&pattern, candidates, || format!("resources with type {kind}"))
    }

    /// Like [Template::has_resource] with `pattern` applied to the resource `Properties`
    pub fn has_resource_properties(
        &self,
        kind: &str,
        pattern: impl Into<Pattern>,
    ) -> Result<(), TemplateMismatch> {
        let pattern: Pattern = pattern.into();
        self.has_resource(kind, Pattern::object_like([("Properties", pattern)]))
    }

    fn has_in_section(
        &self,
        section: Section,
        logical_id: &str,
        pattern: Pattern,
    ) -> Result<(), TemplateMismatch> {
        let candidates: Vec<_> = self
            .section(section)
            .filter(|(key, _)| logical_id == "*" || key.as_str() == logical_id)
            .collect();
        expect_any_match(&pattern, candidates, || {
            format!("{section} with logical id {logical_id}")
        })
    }

    pub fn has_parameter(&self, logical_id: &str, pattern: impl Into<Pattern>) -> Result<(), TemplateMismatch> {
        self.has_in_section(Section::Parameters, logical_id, pattern.into())
    }

    pub fn has_output(&self, logical_id: &str, pattern: impl Into<Pattern>) -> Result<(), TemplateMismatch> {
        self.has_in_section(Section::Outputs, logical_id, pattern.into())
    }

    pub fn has_condition(&self, logical_id: &str, pattern: impl Into<Pattern>) -> Result<(), TemplateMismatch> {
        self.has_in_section(Section::Conditions, logical_id, pattern.into())
    }

    pub fn has_mapping(&self, logical_id: &str, pattern: impl Into<Pattern>) -> Result<(), TemplateMismatch> {
        self.has_in_section(Section::Mappings, logical_id, pattern.into())
    }

    /// Matches the whole document against `pattern`
    pub fn template_matches(&self, pattern: impl Into<Pattern>) -> Result<(), TemplateMismatch> {
        let pattern: Pattern = pattern.into();
        let result = pattern.test(&self.to_json());
        if !result.is_success() {
            return Err(TemplateMismatch::new(
                "Template does not match as expected".to_string(),
                Some(result),
            ));
        }
        Ok(())
    }

    /// Resource matcher for an arbitrary resource type
    pub fn resource(&self, kind: impl Into<Cow<'static, str>>) -> Resource<'_, Any> {
        Resource::new(self, kind)
    }

    /// Resource matcher for an arbitrary resource type, with removal policy support
    pub fn removable_resource(&self, kind: impl Into<Cow<'static, str>>) -> Resource<'_, AnyRemovable> {
        Resource::new(self, kind)
    }

    /// Resource matcher for a known resource kind
    pub fn of<K: ResourceKind>(&self) -> Resource<'_, K> {
        Resource::new(self, K::TYPE)
    }
}

fn expect_any_match(
    pattern: &Pattern,
    candidates: Vec<(&String, &Value)>,
    describe: impl FnOnce() -> String,
) -> Result<(), TemplateMismatch> {
    let mut closest: Option<MatchResult> = None;

    for (key, body) in &candidates {
        let result = pattern.test(body);
        if result.is_success() {
            tracing::debug!(%key, "found match");
            return Ok(());
        }

        let is_closer = closest
            .as_ref()
            .map_or(true, |current| result.failures().len() < current.failures().len());
        if is_closer {
            closest = Some(result);
        }
    }

    Err(TemplateMismatch::new(
        format!(
            "Template has {} {}, but none match as expected.",
            candidates.len(),
            describe()
        ),
        closest,
    ))
}

impl TryFrom<Value> for Template {
    type Error = LoadError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Template::from_value(value)
    }
}

impl std::str::FromStr for Template {
    type Err = LoadError;

    /// JSON when the input starts with `{`, YAML otherwise
    fn from_str(template: &str) -> Result<Self, Self::Err> {
        if template.trim_start().starts_with('{') {
            Template::from_json_str(template)
        } else {
            Template::from_yaml_str(template)
        }
    }
}

/// Utility macro to create a [Template] from a JSON string
///
/// ```
/// # use cfn_assert::template;
/// let template = template!(r#"{ "Resources": {} }"#);
/// assert!(template.region().is_none());
/// ```
///
/// With a region
/// ```
/// # use cfn_assert::template;
/// let template = template!(r#"{ "Resources": {} }"#, region = "eu-central-1");
/// assert_eq!(template.region(), Some("eu-central-1"));
/// ```
///
/// # Panic
/// Panics on invalid input
///
/// ```should_panic
/// # use cfn_assert::template;
/// template!("[1, 2, 3]");
/// ```
#[macro_export]
macro_rules! template {
    { $json:expr } => {
        $crate::template::Template::from_json_str($json).expect("template must parse")
    };
    { $json:expr, region = $region:expr } => {
        $crate::template::Template::from_json_str($json)
            .expect("template must parse")
            .with_region($region)
    };
}
