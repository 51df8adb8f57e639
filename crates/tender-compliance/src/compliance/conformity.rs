use super::domain::{ComplianceDocument, TenderChecklistItem};
use serde::Serialize;

/// Completeness and signature coverage of a tender checklist.
///
/// This axis is independent of expiry status; consumers combine the two if
/// they need to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenderConformitySummary {
    pub total_required: usize,
    pub total_submitted: usize,
    pub total_signed: usize,
    pub coverage_percent: f64,
    pub signature_percent: f64,
    /// Required items not yet submitted, in checklist order.
    pub pending: Vec<TenderChecklistItem>,
    /// Required items submitted but still unsigned, in checklist order.
    pub awaiting_signature: Vec<TenderChecklistItem>,
}

impl TenderConformitySummary {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty() && self.awaiting_signature.is_empty()
    }
}

pub fn tender_conformity(items: &[TenderChecklistItem]) -> TenderConformitySummary {
    let mut total_required = 0;
    let mut total_submitted = 0;
    let mut total_signed = 0;
    let mut pending = Vec::new();
    let mut awaiting_signature = Vec::new();

    for item in items.iter().filter(|item| item.required) {
        total_required += 1;
        if item.submitted {
            total_submitted += 1;
        } else {
            pending.push(item.clone());
        }
        if item.signed {
            total_signed += 1;
        } else if item.submitted {
            awaiting_signature.push(item.clone());
        }
    }

    TenderConformitySummary {
        total_required,
        total_submitted,
        total_signed,
        coverage_percent: percent(total_submitted, total_required),
        signature_percent: percent(total_signed, total_required),
        pending,
        awaiting_signature,
    }
}

pub fn document_conformity(documents: &[ComplianceDocument]) -> TenderConformitySummary {
    let items: Vec<TenderChecklistItem> = documents.iter().map(TenderChecklistItem::from).collect();
    tender_conformity(&items)
}

/// Percentage rounded to one decimal; `0.0` when there is nothing to cover.
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }

    let tenths = (part as f64 * 1000.0 / whole as f64).round();
    (tenths / 10.0).clamp(0.0, 100.0)
}
