use std::collections::HashSet;

use async_trait::async_trait;

/// Scope that grants write access to endpoint settings.
pub const ENDPOINTS_MANAGE: &str = "Endpoints|MANAGE";

#[async_trait]
pub trait PermissionCheck: Send + Sync {
    async fn can_access(&self, scope: &str) -> bool;
}

/// Fixed set of granted scopes, usually read from configuration.
#[derive(Debug, Clone, Default)]
pub struct ScopeSet {
    granted: HashSet<String>,
}

impl ScopeSet {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            granted: scopes.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl PermissionCheck for ScopeSet {
    async fn can_access(&self, scope: &str) -> bool {
        self.granted.contains(scope)
    }
}
