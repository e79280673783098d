//! Removal policies of resources that support them
use crate::kinds::Removable;
use crate::pattern::Pattern;
use crate::resource::Resource;

pub const DELETION_POLICY: &str = "DeletionPolicy";
pub const UPDATE_REPLACE_POLICY: &str = "UpdateReplacePolicy";

/// What happens to the physical resource when it leaves the stack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemovalPolicy {
    Retain,
    Snapshot,
    #[default]
    Destroy,
}

impl RemovalPolicy {
    /// The policy as written in templates
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalPolicy::Retain => "Retain",
            RemovalPolicy::Snapshot => "Snapshot",
            RemovalPolicy::Destroy => "Delete",
        }
    }
}

impl std::fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'t, K: Removable> Resource<'t, K> {
    /// Expect both `DeletionPolicy` and `UpdateReplacePolicy` to be `policy`
    pub fn with_removal_policy(self, policy: RemovalPolicy) -> Self {
        self.with_root_property(DELETION_POLICY, Pattern::partial(policy.as_str()))
            .with_root_property(UPDATE_REPLACE_POLICY, Pattern::partial(policy.as_str()))
    }
}
