//! Document lifecycle and compliance classification.
//!
//! Raw records are reduced to calendar days by [`dates::normalize`], classified
//! one by one with [`status::classify`], then folded into KPI counters with
//! [`summary::summarize`] or checklist coverage with
//! [`conformity::tender_conformity`]. [`calendar`] reuses the same
//! normalization to place tenders and documents on a month grid, and
//! [`router`] exposes all of it as JSON endpoints.

pub mod calendar;
pub mod conformity;
pub mod dates;
pub mod domain;
pub mod import;
pub mod router;
pub mod status;
pub mod summary;

#[cfg(test)]
mod tests;

pub use calendar::{
    index_by_day, month_grid, select_date, CalendarDay, CalendarGrid, CalendarRecord, DateField,
    Dated, DayKey, RecordKind, GRID_DAYS,
};
pub use conformity::{document_conformity, tender_conformity, TenderConformitySummary};
pub use dates::{normalize, DateLike};
pub use domain::{ComplianceDocument, DocumentId, DocumentOwner, TenderChecklistItem};
pub use import::{ChecklistImporter, DocumentImporter, ImportError};
pub use router::compliance_router;
pub use status::{
    assess, classify, classify_expiry, ClassificationThresholds, DocumentAssessment,
    DocumentStatus, ReportScope, ThresholdError, DASHBOARD_WINDOW_DAYS, DETAIL_WINDOW_DAYS,
};
pub use summary::{assess_all, summarize, summarize_by_owner, ComplianceSummary, OwnerSummary};
