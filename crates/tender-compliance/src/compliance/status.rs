use super::domain::{ComplianceDocument, DocumentId};
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Heads-up horizon used by dashboard KPIs.
pub const DASHBOARD_WINDOW_DAYS: i64 = 30;
/// Needs-attention horizon used by company and tender detail views.
pub const DETAIL_WINDOW_DAYS: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Valid,
    ExpiringSoon,
    Expired,
}

impl DocumentStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Valid, Self::ExpiringSoon, Self::Expired]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::ExpiringSoon => "Expiring Soon",
            Self::Expired => "Expired",
        }
    }

    /// Display hint for dashboards; rendering is up to the caller.
    pub const fn tone(self) -> &'static str {
        match self {
            Self::Valid => "green",
            Self::ExpiringSoon => "yellow",
            Self::Expired => "red",
        }
    }

    pub const fn needs_attention(self) -> bool {
        !matches!(self, Self::Valid)
    }
}

/// Which call-site horizon a report is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportScope {
    #[default]
    Dashboard,
    Detail,
}

impl ReportScope {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Detail => "Detail",
        }
    }
}

impl FromStr for ReportScope {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dashboard" | "home" => Ok(Self::Dashboard),
            "detail" | "company" | "tender" => Ok(Self::Detail),
            other => Err(format!(
                "unknown report scope '{other}' (expected dashboard or detail)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThresholdError {
    #[error("expiring-soon window must not be negative (found {days} days)")]
    NegativeWindow { days: i64 },
}

/// Reference clock and horizon for one classification pass.
///
/// The reference date is captured once so every document in a summary is
/// compared against the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    pub reference_date: NaiveDate,
    pub window_days: i64,
    #[serde(default)]
    pub missing_expiry_means_expired_when_required: bool,
}

impl ClassificationThresholds {
    pub fn new(reference_date: NaiveDate, window_days: i64) -> Self {
        Self {
            reference_date,
            window_days,
            missing_expiry_means_expired_when_required: false,
        }
    }

    pub fn dashboard(reference_date: NaiveDate) -> Self {
        Self::new(reference_date, DASHBOARD_WINDOW_DAYS)
    }

    pub fn detail(reference_date: NaiveDate) -> Self {
        Self::new(reference_date, DETAIL_WINDOW_DAYS)
    }

    pub fn today(window_days: i64) -> Self {
        Self::new(Local::now().date_naive(), window_days)
    }

    pub fn with_missing_expiry_expired_when_required(mut self, enabled: bool) -> Self {
        self.missing_expiry_means_expired_when_required = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        if self.window_days < 0 {
            return Err(ThresholdError::NegativeWindow {
                days: self.window_days,
            });
        }
        Ok(())
    }

    /// Last day (inclusive) of the expiring-soon band, `None` when there is no band.
    pub fn window_end(&self) -> Option<NaiveDate> {
        let days = u64::try_from(self.window_days).ok()?;
        Some(
            self.reference_date
                .checked_add_days(Days::new(days))
                .unwrap_or(NaiveDate::MAX),
        )
    }
}

impl fmt::Display for ClassificationThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (+{} days)",
            self.reference_date.format("%Y-%m-%d"),
            self.window_days
        )
    }
}

/// Classify an already normalized expiry date.
pub fn classify_expiry(
    expires_on: Option<NaiveDate>,
    required: bool,
    thresholds: &ClassificationThresholds,
) -> DocumentStatus {
    let Some(expires_on) = expires_on else {
        return if required && thresholds.missing_expiry_means_expired_when_required {
            DocumentStatus::Expired
        } else {
            DocumentStatus::Valid
        };
    };

    if expires_on < thresholds.reference_date {
        return DocumentStatus::Expired;
    }

    match thresholds.window_end() {
        Some(end) if expires_on <= end => DocumentStatus::ExpiringSoon,
        _ => DocumentStatus::Valid,
    }
}

pub fn classify(
    document: &ComplianceDocument,
    thresholds: &ClassificationThresholds,
) -> DocumentStatus {
    classify_expiry(document.expires_on(), document.required, thresholds)
}

/// Per-document verdict handed to detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentAssessment {
    pub id: DocumentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: DocumentStatus,
    pub status_label: &'static str,
    pub expires_on: Option<NaiveDate>,
    pub days_until_expiry: Option<i64>,
    pub version: u32,
}

pub fn assess(
    document: &ComplianceDocument,
    thresholds: &ClassificationThresholds,
) -> DocumentAssessment {
    let expires_on = document.expires_on();
    let status = classify_expiry(expires_on, document.required, thresholds);

    DocumentAssessment {
        id: document.id.clone(),
        name: document.name.clone(),
        status,
        status_label: status.label(),
        expires_on,
        days_until_expiry: expires_on
            .map(|date| date.signed_duration_since(thresholds.reference_date).num_days()),
        version: document.version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 12).expect("valid date")
    }

    fn days_from_reference(days: i64) -> Option<NaiveDate> {
        Some(reference() + chrono::Duration::days(days))
    }

    #[test]
    fn same_day_expiry_is_expiring_soon_for_any_non_negative_window() {
        for window in [0, 1, 15, 30] {
            let thresholds = ClassificationThresholds::new(reference(), window);
            assert_eq!(
                classify_expiry(Some(reference()), false, &thresholds),
                DocumentStatus::ExpiringSoon,
                "window {window}"
            );
        }
    }

    #[test]
    fn minute_precision_timestamps_still_expire() {
        let thresholds = ClassificationThresholds::detail(reference());
        let document = ComplianceDocument::new("cnd-federal")
            .required(true)
            .with_expiry("2025-09-10T08:15Z");
        assert_eq!(classify(&document, &thresholds), DocumentStatus::Expired);
    }

    #[test]
    fn window_upper_bound_is_inclusive() {
        let thresholds = ClassificationThresholds::detail(reference());
        assert_eq!(
            classify_expiry(days_from_reference(15), false, &thresholds),
            DocumentStatus::ExpiringSoon
        );
        assert_eq!(
            classify_expiry(days_from_reference(16), false, &thresholds),
            DocumentStatus::Valid
        );
        assert_eq!(
            classify_expiry(days_from_reference(-1), false, &thresholds),
            DocumentStatus::Expired
        );
    }

    #[test]
    fn dashboard_and_detail_windows_stay_distinct() {
        let expires = days_from_reference(20);
        assert_eq!(
            classify_expiry(expires, false, &ClassificationThresholds::dashboard(reference())),
            DocumentStatus::ExpiringSoon
        );
        assert_eq!(
            classify_expiry(expires, false, &ClassificationThresholds::detail(reference())),
            DocumentStatus::Valid
        );
    }

    #[test]
    fn negative_window_has_no_expiring_soon_band() {
        let thresholds = ClassificationThresholds::new(reference(), -5);
        assert!(thresholds.window_end().is_none());
        assert_eq!(
            classify_expiry(Some(reference()), false, &thresholds),
            DocumentStatus::Valid
        );
        assert_eq!(
            classify_expiry(days_from_reference(-1), false, &thresholds),
            DocumentStatus::Expired
        );
        assert_eq!(
            thresholds.validate(),
            Err(ThresholdError::NegativeWindow { days: -5 })
        );
    }

    #[test]
    fn huge_window_saturates_instead_of_panicking() {
        let thresholds = ClassificationThresholds::new(reference(), i64::MAX);
        assert_eq!(thresholds.window_end(), Some(NaiveDate::MAX));
        assert_eq!(
            classify_expiry(days_from_reference(10_000), false, &thresholds),
            DocumentStatus::ExpiringSoon
        );
    }

    #[test]
    fn missing_expiry_policy_is_explicit() {
        let lenient = ClassificationThresholds::detail(reference());
        let strict = lenient.with_missing_expiry_expired_when_required(true);

        assert_eq!(classify_expiry(None, true, &lenient), DocumentStatus::Valid);
        assert_eq!(classify_expiry(None, true, &strict), DocumentStatus::Expired);
        assert_eq!(classify_expiry(None, false, &strict), DocumentStatus::Valid);
    }

    #[test]
    fn unparseable_expiry_counts_as_missing() {
        let thresholds = ClassificationThresholds::detail(reference())
            .with_missing_expiry_expired_when_required(true);
        let garbage = ComplianceDocument::new("balanco")
            .required(true)
            .with_expiry("sem validade");
        let optional = ComplianceDocument::new("atestado").with_expiry("sem validade");

        assert_eq!(classify(&garbage, &thresholds), DocumentStatus::Expired);
        assert_eq!(classify(&optional, &thresholds), DocumentStatus::Valid);
    }

    #[test]
    fn classification_is_repeatable() {
        let thresholds = ClassificationThresholds::detail(reference());
        let document = ComplianceDocument::new("cnd").with_expiry("2025-09-15T00:00:00Z");

        let first = classify(&document, &thresholds);
        let second = classify(&document, &thresholds);
        assert_eq!(first, second);
        assert_eq!(first, DocumentStatus::ExpiringSoon);
    }

    #[test]
    fn assessment_reports_days_until_expiry() {
        let thresholds = ClassificationThresholds::detail(reference());
        let document = ComplianceDocument::new("fgts")
            .with_name("Certificado FGTS")
            .with_expiry("10/09/2025");

        let assessment = assess(&document, &thresholds);
        assert_eq!(assessment.status, DocumentStatus::Expired);
        assert_eq!(assessment.status_label, "Expired");
        assert_eq!(assessment.days_until_expiry, Some(-2));
        assert_eq!(assessment.name.as_deref(), Some("Certificado FGTS"));
    }

    #[test]
    fn report_scope_parses_call_site_names() {
        assert_eq!("dashboard".parse::<ReportScope>(), Ok(ReportScope::Dashboard));
        assert_eq!(" Tender ".parse::<ReportScope>(), Ok(ReportScope::Detail));
        assert!("weekly".parse::<ReportScope>().is_err());
    }
}
