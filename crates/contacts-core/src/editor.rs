//! Inline editing
//!
//! Each row moves `Display -> Editing -> Display`. Leaving `Editing`
//! happens on a successful save (`commit`) or on `cancel`. A failed
//! validation or a failed update keeps the row in `Editing` with the
//! user's input intact.

use crate::error::{RowError, ValidationError};
use crate::models::{Contact, Draft, NewContact};
use crate::rows::{ContactRow, RowIndex, RowState};

/// Why a save could not be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveError {
    Row(RowError),
    Invalid(ValidationError),
}

impl From<RowError> for SaveError {
    fn from(e: RowError) -> Self {
        SaveError::Row(e)
    }
}

impl From<ValidationError> for SaveError {
    fn from(e: ValidationError) -> Self {
        SaveError::Invalid(e)
    }
}

/// Switch a row to edit mode, pre-filled with its committed values
pub fn begin_edit(row: &mut ContactRow) -> Result<(), RowError> {
    if row.is_editing() {
        return Err(RowError::AlreadyEditing(row.row_id()));
    }
    row.state = RowState::Editing(Draft::from_contact(&row.contact));
    Ok(())
}

/// Mutable access to the edit inputs
pub fn draft_mut(row: &mut ContactRow) -> Result<&mut Draft, RowError> {
    let row_id = row.row_id();
    match &mut row.state {
        RowState::Editing(draft) => Ok(draft),
        RowState::Display => Err(RowError::NotEditing(row_id)),
    }
}

/// Validate the edit inputs into an update body
///
/// The row is left untouched either way.
pub fn prepare_save(row: &ContactRow) -> Result<NewContact, SaveError> {
    match &row.state {
        RowState::Editing(draft) => Ok(draft.validate()?),
        RowState::Display => Err(RowError::NotEditing(row.row_id()).into()),
    }
}

/// Apply the store's response to a save
///
/// The row keeps its id; name and phone come from `updated`.
pub fn commit(row: &mut ContactRow, updated: Contact) {
    refresh(row, updated);
    row.state = RowState::Display;
}

/// Replace the committed record without touching the edit state
pub fn refresh(row: &mut ContactRow, updated: Contact) {
    let contact = Contact {
        id: row.contact.id.clone(),
        name: updated.name,
        phone: updated.phone,
    };
    row.index = RowIndex::from_contact(&contact);
    row.contact = contact;
}

/// Drop the edit inputs and show the committed values again
pub fn cancel(row: &mut ContactRow) -> Result<(), RowError> {
    if !row.is_editing() {
        return Err(RowError::NotEditing(row.row_id()));
    }
    row.state = RowState::Display;
    Ok(())
}
