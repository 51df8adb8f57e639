use super::ImportError;
use crate::compliance::dates::DateLike;
use crate::compliance::domain::{ComplianceDocument, DocumentOwner, TenderChecklistItem};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_documents<R: Read>(reader: R) -> Result<Vec<ComplianceDocument>, ImportError> {
    read_rows::<_, DocumentRow>(reader)?
        .into_iter()
        .map(|(line, row)| row.into_document(line))
        .collect()
}

pub(crate) fn parse_checklist<R: Read>(
    reader: R,
) -> Result<Vec<TenderChecklistItem>, ImportError> {
    read_rows::<_, ChecklistRow>(reader)?
        .into_iter()
        .map(|(line, row)| row.into_item(line))
        .collect()
}

/// Deserialize every data row together with the line it starts on.
fn read_rows<R: Read, T: DeserializeOwned>(mut reader: R) -> Result<Vec<(u64, T)>, ImportError> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input.as_slice());
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record_line(&input, record.position());
        rows.push((line, record.deserialize(Some(&headers))?));
    }

    Ok(rows)
}

// A record's position is taken before the reader skips blank lines, so the
// skipped terminators are counted here.
fn record_line(input: &[u8], position: Option<&csv::Position>) -> u64 {
    let Some(position) = position else {
        return 0;
    };

    let start = usize::try_from(position.byte())
        .unwrap_or(input.len())
        .min(input.len());
    let skipped = input[start..]
        .iter()
        .take_while(|byte| matches!(**byte, b'\r' | b'\n'))
        .filter(|byte| **byte == b'\n')
        .count();

    position.line() + skipped as u64
}

#[derive(Debug, Deserialize)]
struct DocumentRow {
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    owner_kind: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    owner_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    required: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    submitted: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    signed: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    issue_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    expires_at: Option<String>,
}

impl DocumentRow {
    fn into_document(self, line: u64) -> Result<ComplianceDocument, ImportError> {
        if self.id.is_empty() {
            return Err(invalid(line, "document id is empty"));
        }

        let owner = parse_owner(self.owner_kind.as_deref(), self.owner_id, line)?;
        let mut document = ComplianceDocument::new(self.id);
        document.owner = owner;
        document.name = self.name;
        document.required = parse_flag(self.required.as_deref(), "required", line)?;
        document.submitted = parse_flag(self.submitted.as_deref(), "submitted", line)?;
        document.signed = parse_flag(self.signed.as_deref(), "signed", line)?;
        // Dates stay raw; normalization belongs to the engine.
        document.issue_date = self.issue_date.map(DateLike::Text);
        document.expires_at = self.expires_at.map(DateLike::Text);
        Ok(document)
    }
}

#[derive(Debug, Deserialize)]
struct ChecklistRow {
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    required: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    submitted: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    signed: Option<String>,
}

impl ChecklistRow {
    fn into_item(self, line: u64) -> Result<TenderChecklistItem, ImportError> {
        if self.id.is_empty() {
            return Err(invalid(line, "checklist item id is empty"));
        }

        let mut item = TenderChecklistItem::new(
            self.id,
            parse_flag(self.required.as_deref(), "required", line)?,
            parse_flag(self.submitted.as_deref(), "submitted", line)?,
            parse_flag(self.signed.as_deref(), "signed", line)?,
        );
        item.name = self.name;
        Ok(item)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_owner(
    kind: Option<&str>,
    id: Option<String>,
    line: u64,
) -> Result<Option<DocumentOwner>, ImportError> {
    let (kind, id) = match (kind, id) {
        (None, None) => return Ok(None),
        (Some(kind), Some(id)) => (kind, id),
        _ => return Err(invalid(line, "owner_kind and owner_id must be given together")),
    };

    match kind.to_ascii_lowercase().as_str() {
        "company" | "empresa" => Ok(Some(DocumentOwner::Company(id))),
        "tender" | "licitacao" | "licitação" => Ok(Some(DocumentOwner::Tender(id))),
        other => Err(invalid(line, format!("unknown owner kind '{other}'"))),
    }
}

fn parse_flag(value: Option<&str>, column: &str, line: u64) -> Result<bool, ImportError> {
    let Some(value) = value else {
        return Ok(false);
    };

    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "sim" | "s" | "x" => Ok(true),
        "false" | "0" | "no" | "n" | "não" | "nao" => Ok(false),
        other => Err(invalid(
            line,
            format!("column {column} expects a boolean, found '{other}'"),
        )),
    }
}

fn invalid(line: u64, reason: impl Into<String>) -> ImportError {
    ImportError::InvalidRow {
        line,
        reason: reason.into(),
    }
}
