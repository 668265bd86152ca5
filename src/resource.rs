//! The per-resource adapter contract shared by every CRUD screen.
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::sanitize::{self, CharFilter};

/// Inline messages a screen shows when an operation fails.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub fetch: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

/// A record of a remote collection. Identity is `id()` alone.
pub trait Resource: DeserializeOwned + Serialize + Clone + fmt::Debug + Send + Sync + 'static {
    type Id: fmt::Display + fmt::Debug + Clone + PartialEq + FromStr + Send + Sync + 'static;

    /// Collection path relative to the API base, without slashes.
    const PATH: &'static str;
    const LIST_REQUIRES_AUTH: bool = false;
    const MESSAGES: Messages;

    fn id(&self) -> Self::Id;

    /// Label shown in the delete confirmation.
    fn display_name(&self) -> String;

    fn list_path() -> String {
        format!("{}/", Self::PATH)
    }

    fn item_path(id: &Self::Id) -> String {
        format!("{}/{}", Self::PATH, id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateVerb {
    Put,
    Patch,
}

impl UpdateVerb {
    pub fn method(self) -> Method {
        match self {
            UpdateVerb::Put => Method::PUT,
            UpdateVerb::Patch => Method::PATCH,
        }
    }
}

/// Form mapping for a resource that can be created and edited.
pub trait Editable: Resource {
    const FIELDS: &'static [FieldRule];
    /// Multipart file field; resources without one are sent as JSON.
    const ATTACHMENT_FIELD: Option<&'static str> = None;
    const UPDATE_VERB: UpdateVerb = UpdateVerb::Put;

    fn create_path() -> String {
        Self::list_path()
    }

    /// Editable fields of `self`, string-coerced. Secret fields are blanked by
    /// the form session whatever this returns.
    fn to_draft(&self) -> FormDraft;

    /// Screen-specific checks run before any request is made.
    fn validate(draft: &FormDraft, creating: bool) -> Result<(), &'static str>;

    fn to_payload(draft: &FormDraft) -> Result<Map<String, Value>, &'static str>;

    fn field(name: &str) -> Option<&'static FieldRule> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }

    fn blank_draft() -> FormDraft {
        let mut draft = FormDraft::default();
        for rule in Self::FIELDS {
            draft.set(rule.name, rule.default);
        }
        draft
    }
}

/// Input rule for one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub filter: CharFilter,
    pub max_len: Option<usize>,
    pub secret: bool,
    pub default: &'static str,
}

impl FieldRule {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            filter: CharFilter::Any,
            max_len: None,
            secret: false,
            default: "",
        }
    }

    pub const fn digits(name: &'static str) -> Self {
        Self {
            filter: CharFilter::Digits,
            ..Self::text(name)
        }
    }

    pub const fn letters(name: &'static str) -> Self {
        Self {
            filter: CharFilter::Letters,
            ..Self::text(name)
        }
    }

    pub const fn max_len(self, n: usize) -> Self {
        Self {
            max_len: Some(n),
            ..self
        }
    }

    /// Never pre-filled when editing.
    pub const fn secret(self) -> Self {
        Self {
            secret: true,
            ..self
        }
    }

    pub fn apply(&self, raw: &str) -> String {
        sanitize::clean(raw, self.filter, self.max_len)
    }
}

/// In-progress form values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft(BTreeMap<String, String>);

impl FormDraft {
    /// Missing fields read as empty.
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_string(), value.into());
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_blank(&self, name: &str) -> bool {
        self.get(name).trim().is_empty()
    }

    /// Parse a digits-only field as a non-negative integer.
    pub fn parse_count(&self, name: &str) -> Option<i64> {
        self.get(name).trim().parse::<i64>().ok().filter(|n| *n >= 0)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormDraft {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut draft = FormDraft::default();
        for (k, v) in pairs {
            draft.set(k, v);
        }
        draft
    }
}
