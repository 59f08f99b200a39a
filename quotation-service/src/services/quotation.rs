//! Quotation boundary operations.
//!
//! Prices request lines against a caller-supplied catalog snapshot, rolls
//! them up, assigns version labels and persists through a [`QuotationStore`].

use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::prelude::ToPrimitive;
use service_core::error::AppError;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::QuotationError;
use crate::models::{
    AddVersionRequest, Catalog, CreateQuotationRequest, Quotation, QuotationLine,
    QuotationStatus, QuotationVersion, SystemConfiguration,
};
use crate::services::aggregate::aggregate;
use crate::services::bom::{generate_bom_report, BomReport};
use crate::services::metrics::{
    BOMS_GENERATED_TOTAL, BOS_CATEGORY_MISSING_TOTAL, ERRORS_TOTAL, QUOTATIONS_TOTAL,
    QUOTED_AMOUNT_TOTAL, VERSIONS_TOTAL,
};
use crate::services::pricing::price_requests;
use crate::services::store::QuotationStore;
use crate::services::versioning::next_version_label;

type ClientLocks = DashMap<Uuid, Arc<Mutex<()>>>;

pub struct QuotationService<S: QuotationStore> {
    store: Arc<S>,
    currency: String,
    client_locks: ClientLocks,
}

/// Held for the duration of a per-client operation. On drop the client's
/// map entry is removed once no other task holds or waits on it.
struct ClientLockGuard<'a> {
    locks: &'a ClientLocks,
    client_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ClientLockGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks
            .remove_if(&self.client_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

fn reject(err: QuotationError) -> AppError {
    ERRORS_TOTAL.with_label_values(&[err.kind()]).inc();
    warn!(error = %err, kind = err.kind(), "Quotation request rejected");
    err.into()
}

impl<S: QuotationStore> QuotationService<S> {
    pub fn new(store: Arc<S>, currency: impl Into<String>) -> Self {
        Self {
            store,
            currency: currency.into(),
            client_locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serializes numbering and status changes per client, so the scan of
    /// closed quotations and the insert that depends on it see one state.
    async fn lock_client(&self, client_id: Uuid) -> ClientLockGuard<'_> {
        let lock = self
            .client_locks
            .entry(client_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        ClientLockGuard {
            locks: &self.client_locks,
            client_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    fn build_version(
        quotation_id: Uuid,
        label: String,
        brand: Option<String>,
        is_final: bool,
        lines: Vec<QuotationLine>,
    ) -> Result<QuotationVersion, QuotationError> {
        let totals = aggregate(&lines)?;
        Ok(QuotationVersion {
            version_id: Uuid::new_v4(),
            quotation_id,
            version: label,
            brand,
            is_final,
            lines,
            totals,
            created_utc: Utc::now(),
        })
    }

    fn record_version(&self, version: &QuotationVersion) {
        VERSIONS_TOTAL
            .with_label_values(&[if version.is_final { "true" } else { "false" }])
            .inc();
        QUOTED_AMOUNT_TOTAL
            .with_label_values(&[self.currency.as_str()])
            .inc_by(version.totals.grand_total.to_f64().unwrap_or(0.0).max(0.0));
    }

    /// Generate a BOM for a system, with its sizing and skipped categories.
    #[instrument(skip(self, catalog, config), fields(capacity_kw = %config.system_capacity_kw))]
    pub fn generate_bom_report(
        &self,
        catalog: &Catalog,
        config: &SystemConfiguration,
    ) -> Result<BomReport, AppError> {
        let report = generate_bom_report(config, catalog).map_err(|e| {
            BOMS_GENERATED_TOTAL.with_label_values(&["rejected"]).inc();
            reject(e)
        })?;

        BOMS_GENERATED_TOTAL.with_label_values(&["generated"]).inc();
        for category in &report.missing_categories {
            BOS_CATEGORY_MISSING_TOTAL
                .with_label_values(&[category.as_str()])
                .inc();
        }

        info!(
            modules = report.sizing.number_of_modules,
            actual_kw = %report.sizing.actual_kw,
            lines = report.lines.len(),
            "BOM generated"
        );

        Ok(report)
    }

    pub fn generate_bom(
        &self,
        catalog: &Catalog,
        config: &SystemConfiguration,
    ) -> Result<Vec<QuotationLine>, AppError> {
        self.generate_bom_report(catalog, config)
            .map(|report| report.lines)
    }

    /// Create a quotation with its first version. Without an explicit label
    /// the version is numbered from the client's closed quotations.
    #[instrument(skip(self, catalog, request), fields(client_id = %request.client_id))]
    pub async fn create_quotation(
        &self,
        catalog: &Catalog,
        request: CreateQuotationRequest,
    ) -> Result<Quotation, AppError> {
        request
            .validate()
            .map_err(|e| reject(QuotationError::from(e)))?;
        let lines = price_requests(catalog, &request.items).map_err(reject)?;

        let _guard = self.lock_client(request.client_id).await;

        let history = self
            .store
            .list_client_quotations(request.client_id)
            .await?;
        let label = next_version_label(&history, request.version.as_deref());

        let quotation_id = Uuid::new_v4();
        let version = Self::build_version(quotation_id, label, request.brand, false, lines)
            .map_err(reject)?;
        let now = Utc::now();
        let quotation = Quotation {
            quotation_id,
            client_id: request.client_id,
            title: request.title,
            status: QuotationStatus::Draft,
            currency: self.currency.clone(),
            versions: vec![version],
            created_utc: now,
            updated_utc: now,
        };

        self.store.insert_quotation(&quotation).await?;

        QUOTATIONS_TOTAL.with_label_values(&["created"]).inc();
        self.record_version(&quotation.versions[0]);
        info!(
            quotation_id = %quotation.quotation_id,
            version = %quotation.versions[0].version,
            grand_total = %quotation.versions[0].totals.grand_total,
            "Quotation created"
        );

        Ok(quotation)
    }

    /// Generate a BOM and save it as a new quotation.
    #[instrument(skip(self, catalog, config), fields(client_id = %client_id))]
    pub async fn create_quotation_from_bom(
        &self,
        catalog: &Catalog,
        client_id: Uuid,
        title: String,
        config: &SystemConfiguration,
        brand: Option<String>,
    ) -> Result<Quotation, AppError> {
        let lines = self.generate_bom(catalog, config)?;
        let request = CreateQuotationRequest {
            client_id,
            title,
            items: lines.iter().map(QuotationLine::to_request).collect(),
            version: None,
            brand,
        };

        self.create_quotation(catalog, request).await
    }

    async fn open_quotation(&self, quotation_id: Uuid) -> Result<Quotation, AppError> {
        let quotation = self
            .store
            .get_quotation(quotation_id)
            .await?
            .ok_or_else(|| reject(QuotationError::QuotationNotFound(quotation_id)))?;

        if quotation.status.is_closed() {
            return Err(reject(QuotationError::QuotationClosed {
                quotation_id,
                status: quotation.status.to_string(),
            }));
        }

        Ok(quotation)
    }

    /// Add a caller-labelled version to an open quotation.
    #[instrument(skip(self, catalog, request), fields(quotation_id = %request.quotation_id, version = %request.version))]
    pub async fn add_version(
        &self,
        catalog: &Catalog,
        request: AddVersionRequest,
    ) -> Result<Quotation, AppError> {
        request
            .validate()
            .map_err(|e| reject(QuotationError::from(e)))?;
        let lines = price_requests(catalog, &request.items).map_err(reject)?;

        let client_id = self.get_quotation(request.quotation_id).await?.client_id;
        let _guard = self.lock_client(client_id).await;
        self.open_quotation(request.quotation_id).await?;

        let version = Self::build_version(
            request.quotation_id,
            request.version,
            request.brand,
            request.is_final,
            lines,
        )
        .map_err(reject)?;

        let updated = self
            .store
            .append_version(request.quotation_id, &version)
            .await?
            .ok_or_else(|| reject(QuotationError::QuotationNotFound(request.quotation_id)))?;

        self.record_version(&version);
        info!(
            version_id = %version.version_id,
            is_final = version.is_final,
            grand_total = %version.totals.grand_total,
            "Quotation version added"
        );

        Ok(updated)
    }

    /// Flag one version as final, clearing the flag elsewhere.
    #[instrument(skip(self), fields(quotation_id = %quotation_id, version_id = %version_id))]
    pub async fn mark_final(
        &self,
        quotation_id: Uuid,
        version_id: Uuid,
    ) -> Result<Quotation, AppError> {
        let client_id = self.get_quotation(quotation_id).await?.client_id;
        let _guard = self.lock_client(client_id).await;

        let quotation = self.open_quotation(quotation_id).await?;
        if quotation.version(version_id).is_none() {
            return Err(reject(QuotationError::VersionNotFound {
                quotation_id,
                version_id,
            }));
        }

        let updated = self
            .store
            .set_final_version(quotation_id, version_id)
            .await?
            .ok_or_else(|| {
                reject(QuotationError::VersionNotFound {
                    quotation_id,
                    version_id,
                })
            })?;

        info!("Final version set");
        Ok(updated)
    }

    /// Close a quotation as won or lost, or reopen it as a draft.
    #[instrument(skip(self), fields(quotation_id = %quotation_id, status = %status))]
    pub async fn set_status(
        &self,
        quotation_id: Uuid,
        status: QuotationStatus,
    ) -> Result<Quotation, AppError> {
        let client_id = self.get_quotation(quotation_id).await?.client_id;
        let _guard = self.lock_client(client_id).await;
        let quotation = self.get_quotation(quotation_id).await?;

        let updated = self
            .store
            .update_status(quotation_id, status)
            .await?
            .ok_or_else(|| reject(QuotationError::QuotationNotFound(quotation_id)))?;

        let event = match (quotation.status, status) {
            (_, QuotationStatus::Won) => "won",
            (_, QuotationStatus::Lost) => "lost",
            (previous, QuotationStatus::Draft) if previous.is_closed() => "reopened",
            (_, QuotationStatus::Draft) => "unchanged",
        };
        QUOTATIONS_TOTAL.with_label_values(&[event]).inc();
        info!(previous = %quotation.status, "Quotation status updated");

        Ok(updated)
    }

    pub async fn get_quotation(&self, quotation_id: Uuid) -> Result<Quotation, AppError> {
        self.store
            .get_quotation(quotation_id)
            .await?
            .ok_or_else(|| reject(QuotationError::QuotationNotFound(quotation_id)))
    }

    pub async fn list_client_quotations(&self, client_id: Uuid) -> Result<Vec<Quotation>, AppError> {
        self.store.list_client_quotations(client_id).await
    }
}
