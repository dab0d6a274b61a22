//! Role repository trait (port)

use async_trait::async_trait;

use crate::domain::RoleAssignment;
use crate::error::QueryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Role rows for a user, newest first. Adapters may limit the result to
    /// the newest row; callers still pick the max `created_at` themselves.
    async fn find_latest_assignments(&self, user_id: &str) -> Result<Vec<RoleAssignment>, QueryError>;
}
