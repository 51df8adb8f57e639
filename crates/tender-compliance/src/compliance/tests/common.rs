use chrono::NaiveDate;

use crate::compliance::dates::DateLike;
use crate::compliance::domain::{ComplianceDocument, DocumentOwner, TenderChecklistItem};
use crate::compliance::status::ClassificationThresholds;

pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 12).expect("valid date")
}

pub(super) fn detail_thresholds() -> ClassificationThresholds {
    ClassificationThresholds::detail(reference_date())
}

pub(super) fn company() -> DocumentOwner {
    DocumentOwner::Company("construtora-horizonte".to_string())
}

pub(super) fn document(id: &str, expires_at: Option<&str>) -> ComplianceDocument {
    let document = ComplianceDocument::new(id).with_owner(company());
    match expires_at {
        Some(raw) => document.with_expiry(DateLike::from(raw)),
        None => document,
    }
}

/// Five documents around 2025-09-12 covering every branch of the classifier.
pub(super) fn boundary_documents() -> Vec<ComplianceDocument> {
    vec![
        document("cnd-federal", Some("2025-09-10")),
        document("cnd-estadual", Some("2025-09-15")),
        document("fgts", Some("2025-09-27")),
        document("trabalhista", Some("2025-09-28")),
        document("contrato-social", None),
    ]
}

/// Ten required checklist items: seven submitted, four of those signed.
pub(super) fn ten_item_checklist() -> Vec<TenderChecklistItem> {
    (1..=10)
        .map(|index| {
            let submitted = index <= 7;
            let signed = index <= 4;
            let mut item =
                TenderChecklistItem::new(format!("item-{index:02}"), true, submitted, signed);
            item.name = Some(format!("Documento {index}"));
            item
        })
        .collect()
}
