//! CSV imports for document registers and tender checklists.
//!
//! Document header: `id,owner_kind,owner_id,name,required,submitted,signed,issue_date,expires_at`.
//! Checklist header: `id,name,required,submitted,signed`. Only `id` is
//! mandatory; empty cells are treated as absent.

mod parser;

use super::domain::{ComplianceDocument, TenderChecklistItem};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}

pub struct DocumentImporter;

impl DocumentImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ComplianceDocument>, ImportError> {
        let path = path.as_ref();
        let documents = Self::from_reader(File::open(path)?)?;
        info!(path = %path.display(), count = documents.len(), "imported compliance documents");
        Ok(documents)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ComplianceDocument>, ImportError> {
        parser::parse_documents(reader)
    }
}

pub struct ChecklistImporter;

impl ChecklistImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<TenderChecklistItem>, ImportError> {
        let path = path.as_ref();
        let items = Self::from_reader(File::open(path)?)?;
        info!(path = %path.display(), count = items.len(), "imported tender checklist");
        Ok(items)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<TenderChecklistItem>, ImportError> {
        parser::parse_checklist(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::dates::DateLike;
    use crate::compliance::domain::DocumentOwner;
    use std::io::Cursor;

    #[test]
    fn imports_documents_with_raw_dates() {
        let csv = "id,owner_kind,owner_id,name,required,submitted,signed,issue_date,expires_at\n\
cnd-federal,company,acme,CND Federal,sim,,,01/03/2025,10/09/2025\n\
edital,tender,pe-042,Edital,true,1,0,,\n";

        let documents = DocumentImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert_eq!(documents.len(), 2);

        let cnd = &documents[0];
        assert_eq!(cnd.owner, Some(DocumentOwner::Company("acme".into())));
        assert!(cnd.required);
        assert!(!cnd.submitted);
        assert_eq!(cnd.expires_at, Some(DateLike::from("10/09/2025")));

        let edital = &documents[1];
        assert_eq!(edital.owner, Some(DocumentOwner::Tender("pe-042".into())));
        assert!(edital.submitted);
        assert!(!edital.signed);
        assert!(edital.expires_at.is_none());
    }

    #[test]
    fn missing_optional_columns_default() {
        let csv = "id,expires_at\nalvara,2025-12-31\n";
        let documents = DocumentImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert_eq!(documents.len(), 1);
        assert!(!documents[0].required);
        assert!(documents[0].owner.is_none());
    }

    #[test]
    fn rejects_unknown_owner_kind_with_line_number() {
        let csv = "id,owner_kind,owner_id\nok,company,acme\nbad,supplier,xyz\n";
        match DocumentImporter::from_reader(Cursor::new(csv)) {
            Err(ImportError::InvalidRow { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("supplier"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn rejects_half_specified_owner() {
        let csv = "id,owner_kind,owner_id\ncnd,company,\n";
        assert!(matches!(
            DocumentImporter::from_reader(Cursor::new(csv)),
            Err(ImportError::InvalidRow { line: 2, .. })
        ));
    }

    #[test]
    fn row_errors_point_past_blank_lines() {
        let csv = "id,owner_kind,owner_id\nok,company,acme\n\n\nbad,supplier,xyz\n";
        match DocumentImporter::from_reader(Cursor::new(csv)) {
            Err(ImportError::InvalidRow { line, .. }) => assert_eq!(line, 5),
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn flags_in_rows_accept_portuguese_values() {
        let csv = "id,required,submitted,signed\ncnd,Sim,não,0\n";
        let documents = DocumentImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert!(documents[0].required);
        assert!(!documents[0].submitted && !documents[0].signed);
    }

    #[test]
    fn imports_checklist() {
        let csv = "id,name,required,submitted,signed\nproposta,Proposta comercial,1,1,1\natestado,,1,0,0\n";
        let items = ChecklistImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name.as_deref(), Some("Proposta comercial"));
        assert!(items[1].required && !items[1].submitted);
    }

    #[test]
    fn from_path_propagates_io_errors() {
        match DocumentImporter::from_path("./does-not-exist.csv") {
            Err(ImportError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
