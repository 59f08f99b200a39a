//! Persistence seam for quotations.
//!
//! Storage itself belongs to the hosting application; the engine talks to it
//! through [`QuotationStore`]. [`InMemoryStore`] keeps everything in process.

use async_trait::async_trait;
use chrono::Utc;
use service_core::error::AppError;
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{Quotation, QuotationStatus, QuotationVersion};

#[async_trait]
pub trait QuotationStore: Send + Sync {
    /// All quotations of a client in creation order.
    async fn list_client_quotations(&self, client_id: Uuid) -> Result<Vec<Quotation>, AppError>;

    async fn get_quotation(&self, quotation_id: Uuid) -> Result<Option<Quotation>, AppError>;

    async fn insert_quotation(&self, quotation: &Quotation) -> Result<(), AppError>;

    /// Append a version. When the version is final, the marker is cleared on
    /// every other version of the quotation.
    async fn append_version(
        &self,
        quotation_id: Uuid,
        version: &QuotationVersion,
    ) -> Result<Option<Quotation>, AppError>;

    /// Move the final marker to `version_id`.
    async fn set_final_version(
        &self,
        quotation_id: Uuid,
        version_id: Uuid,
    ) -> Result<Option<Quotation>, AppError>;

    async fn update_status(
        &self,
        quotation_id: Uuid,
        status: QuotationStatus,
    ) -> Result<Option<Quotation>, AppError>;
}

/// Process-local store. Quotations are kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    quotations: RwLock<Vec<Quotation>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn mark_final(quotation: &mut Quotation, version_id: Uuid) {
    for version in quotation.versions.iter_mut() {
        version.is_final = version.version_id == version_id;
    }
}

#[async_trait]
impl QuotationStore for InMemoryStore {
    #[instrument(skip(self), fields(client_id = %client_id))]
    async fn list_client_quotations(&self, client_id: Uuid) -> Result<Vec<Quotation>, AppError> {
        let quotations = self.quotations.read().await;
        Ok(quotations
            .iter()
            .filter(|q| q.client_id == client_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self), fields(quotation_id = %quotation_id))]
    async fn get_quotation(&self, quotation_id: Uuid) -> Result<Option<Quotation>, AppError> {
        let quotations = self.quotations.read().await;
        Ok(quotations
            .iter()
            .find(|q| q.quotation_id == quotation_id)
            .cloned())
    }

    #[instrument(skip(self, quotation), fields(quotation_id = %quotation.quotation_id))]
    async fn insert_quotation(&self, quotation: &Quotation) -> Result<(), AppError> {
        let mut quotations = self.quotations.write().await;

        if quotations
            .iter()
            .any(|q| q.quotation_id == quotation.quotation_id)
        {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Quotation {} already exists",
                quotation.quotation_id
            )));
        }

        quotations.push(quotation.clone());
        info!(client_id = %quotation.client_id, "Quotation stored");

        Ok(())
    }

    #[instrument(skip(self, version), fields(quotation_id = %quotation_id, version = %version.version))]
    async fn append_version(
        &self,
        quotation_id: Uuid,
        version: &QuotationVersion,
    ) -> Result<Option<Quotation>, AppError> {
        let mut quotations = self.quotations.write().await;
        let Some(quotation) = quotations
            .iter_mut()
            .find(|q| q.quotation_id == quotation_id)
        else {
            return Ok(None);
        };

        quotation.versions.push(version.clone());
        if version.is_final {
            mark_final(quotation, version.version_id);
        }
        quotation.updated_utc = Utc::now();

        Ok(Some(quotation.clone()))
    }

    #[instrument(skip(self), fields(quotation_id = %quotation_id, version_id = %version_id))]
    async fn set_final_version(
        &self,
        quotation_id: Uuid,
        version_id: Uuid,
    ) -> Result<Option<Quotation>, AppError> {
        let mut quotations = self.quotations.write().await;
        let Some(quotation) = quotations
            .iter_mut()
            .find(|q| q.quotation_id == quotation_id)
        else {
            return Ok(None);
        };

        if quotation.version(version_id).is_none() {
            return Ok(None);
        }

        mark_final(quotation, version_id);
        quotation.updated_utc = Utc::now();

        Ok(Some(quotation.clone()))
    }

    #[instrument(skip(self), fields(quotation_id = %quotation_id, status = %status))]
    async fn update_status(
        &self,
        quotation_id: Uuid,
        status: QuotationStatus,
    ) -> Result<Option<Quotation>, AppError> {
        let mut quotations = self.quotations.write().await;
        let Some(quotation) = quotations
            .iter_mut()
            .find(|q| q.quotation_id == quotation_id)
        else {
            return Ok(None);
        };

        quotation.status = status;
        quotation.updated_utc = Utc::now();

        Ok(Some(quotation.clone()))
    }
}
