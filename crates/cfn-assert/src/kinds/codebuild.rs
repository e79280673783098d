//! CodeBuild projects and source credentials
use super::{CodeBuildProject, CodeBuildSourceCredential, IamRole};
use crate::error::AssertionError;
use crate::fields;
use crate::pattern::Pattern;
use crate::resource::Resource;

const ENVIRONMENT_VARIABLES: &str = "environment";

pub const PLAINTEXT: &str = "PLAINTEXT";

/// A webhook event filter
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct TriggerEvent {
    /// e.g. `PUSH` or `PULL_REQUEST_CREATED`
    #[new(into)]
    pub event_type: String,
    #[new(default)]
    pub pattern: Option<String>,
}

impl TriggerEvent {
    /// Only events whose pattern contains `pattern`
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    fn to_pattern(&self) -> Pattern {
        let mut filter = fields! { "Type" => self.event_type.as_str() };
        if let Some(pattern) = &self.pattern {
            filter.insert("Pattern".to_string(), Pattern::partial(pattern));
        }
        Pattern::object_like(filter)
    }
}

/// Build output
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct Artifact {
    /// e.g. `S3`
    #[new(into)]
    pub artifact_type: String,
    #[new(default)]
    pub location: Option<Pattern>,
    #[new(default)]
    pub encryption: bool,
    #[new(default)]
    pub packaging: Option<String>,
}

impl Artifact {
    pub fn with_location(mut self, location: impl Into<Pattern>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_encryption(mut self) -> Self {
        self.encryption = true;
        self
    }

    /// e.g. `ZIP`, `NONE` when not set
    pub fn with_packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = Some(packaging.into());
        self
    }

    fn to_pattern(&self) -> Pattern {
        let mut artifact = fields! {
            "EncryptionDisabled" => !self.encryption,
            "Type" => self.artifact_type.as_str(),
            "Packaging" => self.packaging.as_deref().unwrap_or("NONE"),
        };
        if let Some(location) = &self.location {
            artifact.insert("Location".to_string(), location.clone());
        }
        Pattern::object_like(artifact)
    }
}

impl<'t> Resource<'t, CodeBuildProject> {
    pub fn with_service_role(self, role: &Resource<'_, IamRole>) -> Result<Self, AssertionError> {
        Ok(self.with_property("ServiceRole", role.arn()?))
    }

    /// Expect a source of `source_type` (e.g. `GITHUB`) whose location contains `location`
    pub fn with_source(self, source_type: &str, location: &str) -> Self {
        self.with_property(
            "Source",
            Pattern::object_like(fields! {
                "Location" => Pattern::partial(location),
                "Type" => source_type,
            }),
        )
    }

    /// Expect environment variable `name`, with `value` if given
    ///
    /// Variables add up in the order given. The type defaults to [PLAINTEXT].
    pub fn with_environment_variable(
        mut self,
        name: &str,
        value: Option<Pattern>,
        variable_type: Option<&str>,
    ) -> Self {
        let mut variable = fields! {
            "Name" => name,
            "Type" => variable_type.unwrap_or(PLAINTEXT),
        };
        if let Some(value) = value {
            variable.insert("Value".to_string(), value);
        }

        let variables = self.accumulate(ENVIRONMENT_VARIABLES, Pattern::object_like(variable));
        self.with_property(
            "Environment",
            Pattern::object_like(fields! { "EnvironmentVariables" => Pattern::array_with(variables) }),
        )
    }

    pub fn with_concurrent_build_limit(self, limit: u32) -> Self {
        self.with_property("ConcurrentBuildLimit", limit)
    }

    /// Expect a filter group with `events` (in this order), triggered by a webhook if `webhook`
    pub fn with_triggers(self, events: &[TriggerEvent], webhook: bool) -> Self {
        let filters: Vec<Pattern> = events.iter().map(TriggerEvent::to_pattern).collect();
        self.with_property(
            "Triggers",
            Pattern::object_like(fields! {
                "Webhook" => webhook,
                "FilterGroups" => Pattern::array_with([Pattern::array_with(filters)]),
            }),
        )
    }

    pub fn with_artifact(self, artifact: &Artifact) -> Self {
        self.with_property("Artifacts", artifact.to_pattern())
    }
}

impl<'t> Resource<'t, CodeBuildSourceCredential> {
    /// Expect credentials of `auth_type` for `server_type` with a token containing `token`
    pub fn with_credentials(self, auth_type: &str, server_type: &str, token: &str) -> Self {
        self.with_property("AuthType", Pattern::exact(auth_type))
            .with_property("ServerType", Pattern::exact(server_type))
            .with_property("Token", Pattern::partial(token))
    }

    pub fn with_github_token(self, token: &str) -> Self {
        self.with_credentials("PERSONAL_ACCESS_TOKEN", "GITHUB", token)
    }
}
