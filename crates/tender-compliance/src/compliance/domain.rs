use super::dates::DateLike;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The company or tender a document belongs to; never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DocumentOwner {
    Company(String),
    Tender(String),
}

impl DocumentOwner {
    pub const fn kind_label(&self) -> &'static str {
        match self {
            Self::Company(_) => "Company",
            Self::Tender(_) => "Tender",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Company(id) | Self::Tender(id) => id,
        }
    }
}

impl fmt::Display for DocumentOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind_label(), self.id())
    }
}

/// A dated compliance artifact as supplied by the document provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceDocument {
    pub id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<DocumentOwner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub submitted: bool,
    #[serde(default)]
    pub signed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<DateLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateLike>,
    #[serde(default = "initial_version")]
    pub version: u32,
}

fn initial_version() -> u32 {
    1
}

impl ComplianceDocument {
    pub fn new(id: impl Into<DocumentId>) -> Self {
        Self {
            id: id.into(),
            owner: None,
            name: None,
            required: false,
            submitted: false,
            signed: false,
            issue_date: None,
            expires_at: None,
            version: initial_version(),
        }
    }

    pub fn with_owner(mut self, owner: DocumentOwner) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_expiry(mut self, expires_at: impl Into<DateLike>) -> Self {
        self.expires_at = Some(expires_at.into());
        self
    }

    pub fn with_issue_date(mut self, issue_date: impl Into<DateLike>) -> Self {
        self.issue_date = Some(issue_date.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Record a re-upload: the new file may carry a new expiry date.
    pub fn reupload(&mut self, expires_at: Option<DateLike>) {
        self.expires_at = expires_at;
        self.version = self.version.saturating_add(1);
    }

    pub fn expires_on(&self) -> Option<NaiveDate> {
        self.expires_at.as_ref().and_then(DateLike::normalize)
    }

    pub fn issued_on(&self) -> Option<NaiveDate> {
        self.issue_date.as_ref().and_then(DateLike::normalize)
    }
}

/// One line of a tender's document checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderChecklistItem {
    pub id: DocumentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub submitted: bool,
    #[serde(default)]
    pub signed: bool,
}

impl TenderChecklistItem {
    pub fn new(id: impl Into<DocumentId>, required: bool, submitted: bool, signed: bool) -> Self {
        Self {
            id: id.into(),
            name: None,
            required,
            submitted,
            signed,
        }
    }
}

impl From<&ComplianceDocument> for TenderChecklistItem {
    fn from(document: &ComplianceDocument) -> Self {
        Self {
            id: document.id.clone(),
            name: document.name.clone(),
            required: document.required,
            submitted: document.submitted,
            signed: document.signed,
        }
    }
}
