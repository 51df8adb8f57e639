use super::domain::{ComplianceDocument, DocumentOwner};
use super::status::{
    assess, ClassificationThresholds, DocumentAssessment, DocumentStatus, ThresholdError,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// KPI counters for one collection of documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceSummary {
    pub reference_date: NaiveDate,
    pub window_days: i64,
    pub total: usize,
    pub valid_count: usize,
    pub expiring_soon_count: usize,
    pub expired_count: usize,
    /// Expired and expiring documents, soonest expiry first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attention: Vec<DocumentAssessment>,
}

impl ComplianceSummary {
    fn empty(thresholds: &ClassificationThresholds) -> Self {
        Self {
            reference_date: thresholds.reference_date,
            window_days: thresholds.window_days,
            total: 0,
            valid_count: 0,
            expiring_soon_count: 0,
            expired_count: 0,
            attention: Vec::new(),
        }
    }

    pub fn count_for(&self, status: DocumentStatus) -> usize {
        match status {
            DocumentStatus::Valid => self.valid_count,
            DocumentStatus::ExpiringSoon => self.expiring_soon_count,
            DocumentStatus::Expired => self.expired_count,
        }
    }

    pub fn is_partitioned(&self) -> bool {
        self.valid_count + self.expiring_soon_count + self.expired_count == self.total
    }

    fn record(&mut self, assessment: DocumentAssessment) {
        self.total += 1;
        match assessment.status {
            DocumentStatus::Valid => self.valid_count += 1,
            DocumentStatus::ExpiringSoon => self.expiring_soon_count += 1,
            DocumentStatus::Expired => self.expired_count += 1,
        }

        if assessment.status.needs_attention() {
            self.attention.push(assessment);
        }
    }
}

/// Summary for the documents of a single company or tender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<DocumentOwner>,
    pub summary: ComplianceSummary,
}

/// Classify every document against one reference date and tally the results.
pub fn summarize(
    documents: &[ComplianceDocument],
    thresholds: &ClassificationThresholds,
) -> Result<ComplianceSummary, ThresholdError> {
    check_thresholds(thresholds)?;
    Ok(tally(documents.iter(), thresholds))
}

/// Same as [`summarize`], grouped by owner. Documents without an owner form
/// their own group, listed first.
pub fn summarize_by_owner(
    documents: &[ComplianceDocument],
    thresholds: &ClassificationThresholds,
) -> Result<Vec<OwnerSummary>, ThresholdError> {
    check_thresholds(thresholds)?;

    let mut groups: BTreeMap<Option<&DocumentOwner>, Vec<&ComplianceDocument>> = BTreeMap::new();
    for document in documents {
        groups
            .entry(document.owner.as_ref())
            .or_default()
            .push(document);
    }

    Ok(groups
        .into_iter()
        .map(|(owner, documents)| OwnerSummary {
            owner: owner.cloned(),
            summary: tally(documents.into_iter(), thresholds),
        })
        .collect())
}

pub fn assess_all(
    documents: &[ComplianceDocument],
    thresholds: &ClassificationThresholds,
) -> Result<Vec<DocumentAssessment>, ThresholdError> {
    check_thresholds(thresholds)?;
    Ok(documents
        .iter()
        .map(|document| assess(document, thresholds))
        .collect())
}

fn check_thresholds(thresholds: &ClassificationThresholds) -> Result<(), ThresholdError> {
    thresholds.validate().map_err(|err| {
        warn!(
            window_days = thresholds.window_days,
            reference_date = %thresholds.reference_date,
            "rejecting compliance thresholds"
        );
        err
    })
}

fn tally<'a, I>(documents: I, thresholds: &ClassificationThresholds) -> ComplianceSummary
where
    I: Iterator<Item = &'a ComplianceDocument>,
{
    let mut summary = ComplianceSummary::empty(thresholds);
    for document in documents {
        summary.record(assess(document, thresholds));
    }

    // Stable: documents with the same expiry keep their input order, and
    // required documents with no expiry on record sort first.
    summary
        .attention
        .sort_by(|a, b| a.expires_on.cmp(&b.expires_on));

    debug!(
        total = summary.total,
        expired = summary.expired_count,
        expiring_soon = summary.expiring_soon_count,
        %thresholds,
        "summarized compliance documents"
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 12).expect("valid date")
    }

    #[test]
    fn empty_collection_yields_zero_counts() {
        let summary = summarize(&[], &ClassificationThresholds::dashboard(reference()))
            .expect("valid thresholds");
        assert_eq!(summary.total, 0);
        assert_eq!(summary.valid_count, 0);
        assert_eq!(summary.expiring_soon_count, 0);
        assert_eq!(summary.expired_count, 0);
        assert!(summary.attention.is_empty());
        assert!(summary.is_partitioned());
    }

    #[test]
    fn negative_window_is_rejected_once_at_the_boundary() {
        let documents = vec![
            ComplianceDocument::new("a").with_expiry("2025-09-10"),
            ComplianceDocument::new("b").with_expiry("2025-09-13"),
        ];
        let thresholds = ClassificationThresholds::new(reference(), -1);

        assert_eq!(
            summarize(&documents, &thresholds),
            Err(ThresholdError::NegativeWindow { days: -1 })
        );
        assert!(summarize_by_owner(&documents, &thresholds).is_err());
        assert!(assess_all(&documents, &thresholds).is_err());
    }

    #[test]
    fn attention_list_is_ordered_by_expiry() {
        let documents = vec![
            ComplianceDocument::new("late").with_expiry("2025-09-20"),
            ComplianceDocument::new("fine").with_expiry("2026-01-01"),
            ComplianceDocument::new("early").with_expiry("2025-09-01"),
            ComplianceDocument::new("middle").with_expiry("12/09/2025"),
        ];

        let summary = summarize(&documents, &ClassificationThresholds::detail(reference()))
            .expect("valid thresholds");
        let order: Vec<&str> = summary
            .attention
            .iter()
            .map(|assessment| assessment.id.0.as_str())
            .collect();
        assert_eq!(order, vec!["early", "middle", "late"]);
    }

    #[test]
    fn groups_by_owner() {
        let acme = DocumentOwner::Company("acme".into());
        let tender = DocumentOwner::Tender("pe-042-2025".into());
        let documents = vec![
            ComplianceDocument::new("cnd")
                .with_owner(acme.clone())
                .with_expiry("2025-09-01"),
            ComplianceDocument::new("edital")
                .with_owner(tender.clone())
                .with_expiry("2025-12-01"),
            ComplianceDocument::new("fgts")
                .with_owner(acme.clone())
                .with_expiry("2025-09-14"),
            ComplianceDocument::new("loose"),
        ];

        let groups = summarize_by_owner(&documents, &ClassificationThresholds::detail(reference()))
            .expect("valid thresholds");

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].owner, None);
        assert_eq!(groups[0].summary.valid_count, 1);

        let company = groups
            .iter()
            .find(|group| group.owner.as_ref() == Some(&acme))
            .expect("company group");
        assert_eq!(company.summary.total, 2);
        assert_eq!(company.summary.expired_count, 1);
        assert_eq!(company.summary.expiring_soon_count, 1);

        let tender_group = groups
            .iter()
            .find(|group| group.owner.as_ref() == Some(&tender))
            .expect("tender group");
        assert_eq!(tender_group.summary.valid_count, 1);
    }
}
