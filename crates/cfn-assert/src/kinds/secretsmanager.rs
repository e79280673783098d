//! Secrets Manager secrets
use super::Secret;
use crate::pattern::Pattern;
use crate::resource::Resource;

impl<'t> Resource<'t, Secret> {
    /// Expect a generated secret stored under `key`, from `template` if given
    ///
    /// A plain string `template` matches any generation template containing it.
    pub fn as_generated_secret_string(self, key: &str, template: Option<Pattern>) -> Self {
        let string_match = self.template().string_match();
        let mut generated = crate::fields! { "GenerateStringKey" => Pattern::partial(key) };
        if let Some(template) = template {
            generated.insert("SecretStringTemplate".to_string(), template.shaped(string_match));
        }

        self.with_property("GenerateSecretString", Pattern::object_like(generated))
    }

    pub fn with_secret_string(self, value: impl Into<Pattern>) -> Self {
        self.with_property("SecretString", value)
    }

    pub fn with_name(self, name: impl Into<Pattern>) -> Self {
        self.with_property("Name", name)
    }
}
