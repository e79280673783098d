//! CloudWatch log groups
use super::LogGroup;
use crate::resource::Resource;

impl<'t> Resource<'t, LogGroup> {
    pub fn with_retention_days(self, days: u32) -> Self {
        self.with_property("RetentionInDays", days)
    }
}
