//! SSM parameters
use super::SsmParameter;
use crate::pattern::Pattern;
use crate::resource::Resource;

impl<'t> Resource<'t, SsmParameter> {
    /// Expect parameter type `parameter_type`, e.g. `String` or `StringList`
    pub fn of_type(self, parameter_type: &str) -> Self {
        self.with_property("Type", Pattern::exact(parameter_type))
    }

    pub fn with_value(self, value: impl Into<Pattern>) -> Self {
        self.with_property("Value", value)
    }
}
