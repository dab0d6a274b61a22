//! Clinic repository trait (port)

use async_trait::async_trait;

use crate::domain::{ClinicProjection, ClinicRow, TenantId};
use crate::error::QueryError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClinicRepository: Send + Sync {
    /// A missing row must be reported as `QueryErrorKind::NotFound`.
    async fn fetch_clinic(&self, id: &TenantId, projection: ClinicProjection) -> Result<ClinicRow, QueryError>;

    /// All clinics, newest first.
    async fn list_clinics(&self, projection: ClinicProjection) -> Result<Vec<ClinicRow>, QueryError>;
}
