//! Data models for contacts
//!
//! `Contact` is the record as the remote store holds it. `Draft` is raw
//! input text from the create form or an edit row; it only becomes a
//! `NewContact` (the request body) after validation.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// A contact record as returned by the remote store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    /// Identifier assigned by the store on creation
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Display name
    pub name: String,
    /// Phone number, free-form
    pub phone: String,
}

impl Contact {
    pub fn new(id: impl Into<String>, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
        }
    }
}

/// Request body for create and update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
}

/// Unvalidated name/phone input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub phone: String,
}

impl Draft {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Pre-fill a draft from a committed record
    pub fn from_contact(contact: &Contact) -> Self {
        Self::new(contact.name.clone(), contact.phone.clone())
    }

    /// Trim both fields and require them to be non-empty
    pub fn validate(&self) -> Result<NewContact, ValidationError> {
        let name = self.name.trim();
        let phone = self.phone.trim();

        if name.is_empty() || phone.is_empty() {
            return Err(ValidationError::MissingFields {
                name: name.is_empty(),
                phone: phone.is_empty(),
            });
        }

        Ok(NewContact {
            name: name.to_string(),
            phone: phone.to_string(),
        })
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.phone.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.phone.is_empty()
    }
}

/// Accept ids sent either as JSON strings or numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
