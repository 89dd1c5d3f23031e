//! Rendered contact list
//!
//! The list is an in-memory collection of row view-models. Front ends draw
//! it through `ContactRow::view()` and never keep state of their own.
//!
//! ## Ordering
//!
//! Rows are append-only: `mount` always adds at the end and nothing ever
//! re-sorts. The initial load mounts records in the order the store sent
//! them.
//!
//! ## Search index
//!
//! Each row carries a `RowIndex` (id, lower-cased name, raw phone). It is
//! derived only from records returned by the store, never from local input.

use std::fmt;

use crate::models::{Contact, Draft};

/// Message shown when the list has no rows at all
pub const EMPTY_MESSAGE: &str = "No contacts yet. Add your first contact above!";

/// Message shown when rows exist but none match the search term
pub const NO_MATCHES_MESSAGE: &str = "No contacts found matching your search.";

/// Handle to a mounted row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Denormalized attributes used by the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIndex {
    pub id: String,
    /// Lower-cased name
    pub name: String,
    pub phone: String,
}

impl RowIndex {
    pub fn from_contact(contact: &Contact) -> Self {
        Self {
            id: contact.id.clone(),
            name: contact.name.to_lowercase(),
            phone: contact.phone.clone(),
        }
    }
}

/// Display or edit mode of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    Display,
    Editing(Draft),
}

/// What a front end should draw for a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowView<'a> {
    Display { name: &'a str, phone: &'a str },
    Editing { name: &'a str, phone: &'a str },
}

/// A mounted contact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    row_id: RowId,
    pub(crate) contact: Contact,
    pub(crate) index: RowIndex,
    pub(crate) state: RowState,
    pub(crate) visible: bool,
}

impl ContactRow {
    fn new(row_id: RowId, contact: Contact) -> Self {
        let index = RowIndex::from_contact(&contact);
        Self {
            row_id,
            contact,
            index,
            state: RowState::Display,
            visible: true,
        }
    }

    pub fn row_id(&self) -> RowId {
        self.row_id
    }

    /// Last state confirmed by the store
    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn index(&self) -> &RowIndex {
        &self.index
    }

    pub fn state(&self) -> &RowState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, RowState::Editing(_))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Project the row for drawing
    ///
    /// Display mode shows the committed record verbatim; edit mode shows
    /// the current input values.
    pub fn view(&self) -> RowView<'_> {
        match &self.state {
            RowState::Display => RowView::Display {
                name: &self.contact.name,
                phone: &self.contact.phone,
            },
            RowState::Editing(draft) => RowView::Editing {
                name: &draft.name,
                phone: &draft.phone,
            },
        }
    }
}

/// Placeholder shown in place of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Hidden,
    /// No contacts at all
    Empty,
    /// Contacts exist but the search hides all of them
    NoMatches,
}

impl Placeholder {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Placeholder::Hidden => None,
            Placeholder::Empty => Some(EMPTY_MESSAGE),
            Placeholder::NoMatches => Some(NO_MATCHES_MESSAGE),
        }
    }
}

/// The rendered contact list
#[derive(Debug, Clone)]
pub struct ContactList {
    rows: Vec<ContactRow>,
    next_row_id: u64,
    pub(crate) placeholder: Placeholder,
}

impl Default for ContactList {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactList {
    /// An empty list showing the empty-state placeholder
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_row_id: 1,
            placeholder: Placeholder::Empty,
        }
    }

    /// Append a row for `contact` and hide the placeholder
    pub fn mount(&mut self, contact: Contact) -> RowId {
        let row_id = RowId(self.next_row_id);
        self.next_row_id += 1;

        self.rows.push(ContactRow::new(row_id, contact));
        self.placeholder = Placeholder::Hidden;
        row_id
    }

    /// Remove a row, showing the empty-state placeholder if none are left
    pub fn unmount(&mut self, row_id: RowId) -> Option<ContactRow> {
        let pos = self.rows.iter().position(|r| r.row_id == row_id)?;
        let row = self.rows.remove(pos);

        if self.rows.is_empty() {
            self.placeholder = Placeholder::Empty;
        }
        Some(row)
    }

    /// Drop every row
    pub fn clear(&mut self) {
        self.rows.clear();
        self.placeholder = Placeholder::Empty;
    }

    pub fn row(&self, row_id: RowId) -> Option<&ContactRow> {
        self.rows.iter().find(|r| r.row_id == row_id)
    }

    pub fn row_mut(&mut self, row_id: RowId) -> Option<&mut ContactRow> {
        self.rows.iter_mut().find(|r| r.row_id == row_id)
    }

    /// Find the row showing the contact with this store id
    pub fn find_by_contact_id(&self, id: &str) -> Option<&ContactRow> {
        self.rows.iter().find(|r| r.index.id == id)
    }

    pub fn rows(&self) -> &[ContactRow] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [ContactRow] {
        &mut self.rows
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &ContactRow> {
        self.rows.iter().filter(|r| r.visible)
    }

    pub fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Contact {
        Contact::new("7", "Ada", "123")
    }

    #[test]
    fn test_new_list_shows_empty_placeholder() {
        let list = ContactList::new();
        assert!(list.is_empty());
        assert_eq!(list.placeholder(), Placeholder::Empty);
        assert_eq!(list.placeholder().message(), Some(EMPTY_MESSAGE));
    }

    #[test]
    fn test_mount_stores_index() {
        let mut list = ContactList::new();
        let row_id = list.mount(ada());

        assert_eq!(list.len(), 1);
        assert_eq!(list.placeholder(), Placeholder::Hidden);

        let row = list.row(row_id).unwrap();
        assert_eq!(row.index().id, "7");
        assert_eq!(row.index().name, "ada");
        assert_eq!(row.index().phone, "123");
        assert!(row.is_visible());
        assert!(!row.is_editing());
    }

    #[test]
    fn test_mount_appends_in_order() {
        let mut list = ContactList::new();
        list.mount(Contact::new("3", "Carol", "3"));
        list.mount(Contact::new("1", "Ada", "1"));
        list.mount(Contact::new("2", "Bob", "2"));

        let names: Vec<_> = list.rows().iter().map(|r| r.contact().name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Ada", "Bob"]);
    }

    #[test]
    fn test_row_ids_are_unique() {
        let mut list = ContactList::new();
        let a = list.mount(ada());
        let b = list.mount(ada());
        assert_ne!(a, b);
    }

    #[test]
    fn test_unmount_last_row_shows_empty() {
        let mut list = ContactList::new();
        let row_id = list.mount(ada());

        let removed = list.unmount(row_id).unwrap();
        assert_eq!(removed.contact().id, "7");
        assert_eq!(list.placeholder(), Placeholder::Empty);
    }

    #[test]
    fn test_unmount_one_of_several_keeps_placeholder_hidden() {
        let mut list = ContactList::new();
        let a = list.mount(ada());
        list.mount(Contact::new("8", "Bob", "555"));

        list.unmount(a);
        assert_eq!(list.len(), 1);
        assert_eq!(list.placeholder(), Placeholder::Hidden);
    }

    #[test]
    fn test_unmount_unknown_row() {
        let mut list = ContactList::new();
        list.mount(ada());
        assert!(list.unmount(RowId::from_raw(99)).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_view_uses_committed_record() {
        let mut list = ContactList::new();
        let row_id = list.mount(Contact::new("1", "Ada Lovelace", "123"));

        assert_eq!(
            list.row(row_id).unwrap().view(),
            RowView::Display {
                name: "Ada Lovelace",
                phone: "123"
            }
        );
    }

    #[test]
    fn test_find_by_contact_id() {
        let mut list = ContactList::new();
        list.mount(ada());
        let bob = list.mount(Contact::new("8", "Bob", "555"));

        assert_eq!(list.find_by_contact_id("8").unwrap().row_id(), bob);
        assert!(list.find_by_contact_id("9").is_none());
    }
}
