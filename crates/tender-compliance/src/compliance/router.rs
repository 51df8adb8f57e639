//! JSON endpoints over the compliance engine.
//!
//! The router only shapes requests; every number comes from the same
//! functions the CLI calls.

use super::calendar::{month_grid, CalendarRecord, DayKey};
use super::conformity::{document_conformity, tender_conformity, TenderConformitySummary};
use super::domain::{ComplianceDocument, TenderChecklistItem};
use super::status::{ClassificationThresholds, DocumentAssessment, ReportScope};
use super::summary::{assess_all, summarize, summarize_by_owner, ComplianceSummary, OwnerSummary};
use crate::config::ClassificationConfig;
use crate::error::AppError;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub fn compliance_router(config: Arc<ClassificationConfig>) -> Router {
    Router::new()
        .route("/api/v1/documents/summary", post(document_summary_handler))
        .route("/api/v1/tenders/conformity", post(conformity_handler))
        .route("/api/v1/calendar", post(calendar_handler))
        .with_state(config)
}

#[derive(Debug, Deserialize)]
pub struct DocumentSummaryRequest {
    pub documents: Vec<ComplianceDocument>,
    /// Reference date; the server's local date when absent.
    #[serde(default)]
    pub today: Option<NaiveDate>,
    #[serde(default)]
    pub scope: ReportScope,
    /// Overrides the configured window for `scope`.
    #[serde(default)]
    pub window_days: Option<i64>,
    #[serde(default)]
    pub missing_expiry_expired_when_required: Option<bool>,
    #[serde(default)]
    pub group_by_owner: bool,
    #[serde(default)]
    pub include_assessments: bool,
}

impl DocumentSummaryRequest {
    fn thresholds(&self, config: &ClassificationConfig) -> ClassificationThresholds {
        let reference_date = self.today.unwrap_or_else(|| Local::now().date_naive());
        let mut thresholds = config.thresholds_for(self.scope, reference_date);
        if let Some(days) = self.window_days {
            thresholds.window_days = days;
        }
        if let Some(enabled) = self.missing_expiry_expired_when_required {
            thresholds.missing_expiry_means_expired_when_required = enabled;
        }
        thresholds
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentSummaryResponse {
    pub scope: ReportScope,
    pub summary: ComplianceSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owners: Option<Vec<OwnerSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessments: Option<Vec<DocumentAssessment>>,
}

pub async fn document_summary_handler(
    State(config): State<Arc<ClassificationConfig>>,
    Json(request): Json<DocumentSummaryRequest>,
) -> Result<Json<DocumentSummaryResponse>, AppError> {
    let thresholds = request.thresholds(&config);
    let summary = summarize(&request.documents, &thresholds)?;
    let owners = if request.group_by_owner {
        Some(summarize_by_owner(&request.documents, &thresholds)?)
    } else {
        None
    };
    let assessments = if request.include_assessments {
        Some(assess_all(&request.documents, &thresholds)?)
    } else {
        None
    };

    info!(
        scope = request.scope.label(),
        %thresholds,
        total = summary.total,
        expired = summary.expired_count,
        "summarized compliance documents"
    );

    Ok(Json(DocumentSummaryResponse {
        scope: request.scope,
        summary,
        owners,
        assessments,
    }))
}

/// Either an explicit checklist or a document list; not both.
#[derive(Debug, Default, Deserialize)]
pub struct ConformityRequest {
    #[serde(default)]
    pub items: Option<Vec<TenderChecklistItem>>,
    #[serde(default)]
    pub documents: Option<Vec<ComplianceDocument>>,
}

pub async fn conformity_handler(
    Json(request): Json<ConformityRequest>,
) -> Result<Json<TenderConformitySummary>, AppError> {
    let summary = match (request.items, request.documents) {
        (Some(_), Some(_)) => {
            return Err(AppError::invalid_request(
                "send either items or documents, not both",
            ))
        }
        (Some(items), None) => tender_conformity(&items),
        (None, Some(documents)) => document_conformity(&documents),
        (None, None) => tender_conformity(&[]),
    };

    info!(
        required = summary.total_required,
        coverage = summary.coverage_percent,
        signatures = summary.signature_percent,
        "computed tender conformity"
    );

    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
pub struct CalendarRequest {
    /// Any day of the month to display.
    pub month: NaiveDate,
    #[serde(default)]
    pub records: Vec<CalendarRecord>,
    #[serde(default)]
    pub documents: Vec<ComplianceDocument>,
}

#[derive(Debug, Serialize)]
pub struct CalendarDayView {
    pub date: DayKey,
    pub in_month: bool,
    pub records: Vec<CalendarRecord>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub month: NaiveDate,
    pub record_count: usize,
    pub days: Vec<CalendarDayView>,
}

pub async fn calendar_handler(Json(request): Json<CalendarRequest>) -> Json<CalendarResponse> {
    let CalendarRequest {
        month,
        mut records,
        documents,
    } = request;
    records.extend(documents.iter().map(CalendarRecord::from));

    let grid = month_grid(&records, month);
    let record_count = grid.record_count();
    info!(
        month = %grid.month,
        submitted = records.len(),
        placed = record_count,
        "built calendar grid"
    );

    Json(CalendarResponse {
        month: grid.month,
        record_count,
        days: grid
            .days
            .into_iter()
            .map(|day| CalendarDayView {
                date: day.key,
                in_month: day.in_month,
                records: day.records.into_iter().cloned().collect(),
            })
            .collect(),
    })
}
