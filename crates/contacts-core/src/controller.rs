//! Contact synchronization controller
//!
//! Keeps the rendered list consistent with the remote store.
//!
//! ## Flow
//!
//! User actions arrive as `Command`s. `handle` applies everything that can
//! be decided locally (validation, edit state, search) and returns at most
//! one `Request`. The request is sent to the store, which produces a
//! `Completion`; `complete` then reconciles the list. Visible state only
//! changes after the store confirms, and a failure leaves it untouched.
//!
//! Front ends that must stay responsive (the TUI) send requests on a
//! spawned task and feed completions back in; one-shot callers use
//! `dispatch`, which does all three steps in sequence.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Arc::new(RestContactStore::from_config(&config)?);
//! let mut controller = Controller::new(store);
//! controller.dispatch(Command::Load).await;
//!
//! *controller.form_mut() = Draft::new("Ada", "123");
//! controller.dispatch(Command::SubmitForm).await;
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::editor::{self, SaveError};
use crate::error::FetchError;
use crate::filter;
use crate::models::{Contact, Draft, NewContact};
use crate::remote::ContactStore;
use crate::rows::{ContactList, RowId};

pub const ADDED_MESSAGE: &str = "Contact added successfully";
pub const UPDATED_MESSAGE: &str = "Contact updated successfully";
pub const DELETED_MESSAGE: &str = "Contact deleted successfully";
pub const CREATE_FAILED_MESSAGE: &str = "Network error. Please check your connection.";
pub const REQUEST_FAILED_MESSAGE: &str = "Network error. Please try again";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load contacts. Please try again";
pub const CONFIRM_DELETE_MESSAGE: &str = "Are you sure you want to delete this contact?";

/// A user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch every contact and rebuild the list
    Load,
    /// Create a contact from the form
    SubmitForm,
    /// Ask for confirmation before deleting a row
    RequestDelete(RowId),
    ConfirmDelete,
    CancelDelete,
    BeginEdit(RowId),
    Save(RowId),
    Cancel(RowId),
    /// Search text changed
    Search(String),
}

/// A store call to make on behalf of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Create(NewContact),
    Update {
        row_id: RowId,
        id: String,
        body: NewContact,
    },
    Remove {
        row_id: RowId,
        id: String,
    },
}

impl Request {
    /// Perform the store call
    pub async fn send(self, store: &dyn ContactStore) -> Completion {
        match self {
            Request::List => Completion::Loaded(store.list_all().await),
            Request::Create(body) => Completion::Created(store.create(&body).await),
            Request::Update { row_id, id, body } => {
                let result = store.update(&id, &body).await;
                Completion::Updated { row_id, id, result }
            }
            Request::Remove { row_id, id } => {
                let result = store.remove(&id).await;
                Completion::Removed { row_id, id, result }
            }
        }
    }
}

/// The store's answer to a `Request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Loaded(Result<Vec<Contact>, FetchError>),
    Created(Result<Contact, FetchError>),
    Updated {
        row_id: RowId,
        id: String,
        result: Result<Contact, FetchError>,
    },
    Removed {
        row_id: RowId,
        id: String,
        result: Result<(), FetchError>,
    },
}

/// A store-confirmed change, kept while a reload is outstanding
#[derive(Debug, Clone)]
enum Confirmed {
    Created(Contact),
    Updated(Contact),
    Removed(String),
}

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
    Error,
}

/// A message the user must acknowledge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// A delete waiting for a yes/no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub row_id: RowId,
    pub message: &'static str,
}

/// Owns the rendered list, the create form and the search term
pub struct Controller {
    store: Arc<dyn ContactStore>,
    list: ContactList,
    form: Draft,
    search: String,
    pending_delete: Option<RowId>,
    notices: VecDeque<Notice>,
    /// List requests sent but not yet answered
    loads_in_flight: usize,
    /// Changes confirmed while a list request was outstanding
    since_load: Vec<Confirmed>,
}

impl Controller {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self {
            store,
            list: ContactList::new(),
            form: Draft::default(),
            search: String::new(),
            pending_delete: None,
            notices: VecDeque::new(),
            loads_in_flight: 0,
            since_load: Vec::new(),
        }
    }

    /// The store, for sending requests off the main task
    pub fn store(&self) -> Arc<dyn ContactStore> {
        Arc::clone(&self.store)
    }

    pub fn list(&self) -> &ContactList {
        &self.list
    }

    /// The create form
    pub fn form(&self) -> &Draft {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Draft {
        &mut self.form
    }

    /// Edit inputs of a row, if it is being edited
    pub fn draft_mut(&mut self, row_id: RowId) -> Option<&mut Draft> {
        let row = self.list.row_mut(row_id)?;
        editor::draft_mut(row).ok()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn pending_confirmation(&self) -> Option<Confirmation> {
        self.pending_delete.map(|row_id| Confirmation {
            row_id,
            message: CONFIRM_DELETE_MESSAGE,
        })
    }

    /// Pop the oldest unacknowledged notice
    pub fn next_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }

    pub fn peek_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Run a command to completion, awaiting the store if needed
    pub async fn dispatch(&mut self, command: Command) {
        if let Some(request) = self.handle(command) {
            let store = self.store();
            let completion = request.send(&*store).await;
            self.complete(completion);
        }
    }

    /// Apply the local part of a command
    pub fn handle(&mut self, command: Command) -> Option<Request> {
        debug!("Handling {:?}", command);

        match command {
            Command::Load => {
                self.loads_in_flight += 1;
                Some(Request::List)
            }

            Command::SubmitForm => match self.form.validate() {
                Ok(body) => Some(Request::Create(body)),
                Err(e) => {
                    self.notify(Level::Warning, e.to_string());
                    None
                }
            },

            Command::RequestDelete(row_id) => {
                if self.list.row(row_id).is_some() {
                    self.pending_delete = Some(row_id);
                } else {
                    warn!("Delete requested for unknown row {}", row_id);
                }
                None
            }

            Command::ConfirmDelete => {
                let row_id = self.pending_delete.take()?;
                let row = self.list.row(row_id)?;
                Some(Request::Remove {
                    row_id,
                    id: row.contact().id.clone(),
                })
            }

            Command::CancelDelete => {
                self.pending_delete = None;
                None
            }

            Command::BeginEdit(row_id) => {
                let result = match self.list.row_mut(row_id) {
                    Some(row) => editor::begin_edit(row),
                    None => Err(crate::error::RowError::UnknownRow(row_id)),
                };
                if let Err(e) = result {
                    debug!("Ignoring edit: {}", e);
                }
                None
            }

            Command::Save(row_id) => {
                let row = self.list.row(row_id)?;
                match editor::prepare_save(row) {
                    Ok(body) => Some(Request::Update {
                        row_id,
                        id: row.contact().id.clone(),
                        body,
                    }),
                    Err(SaveError::Invalid(e)) => {
                        self.notify(Level::Warning, e.to_string());
                        None
                    }
                    Err(SaveError::Row(e)) => {
                        debug!("Ignoring save: {}", e);
                        None
                    }
                }
            }

            Command::Cancel(row_id) => {
                if let Some(row) = self.list.row_mut(row_id) {
                    if let Err(e) = editor::cancel(row) {
                        debug!("Ignoring cancel: {}", e);
                    }
                }
                None
            }

            Command::Search(term) => {
                self.search = term;
                let summary = filter::apply(&mut self.list, &self.search);
                debug!(
                    "Search {:?} shows {} of {} contacts",
                    self.search, summary.visible, summary.total
                );
                None
            }
        }
    }

    /// Reconcile the list with the store's answer
    pub fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Loaded(result) => {
                self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
                match result {
                    Ok(contacts) => {
                        info!("Loaded {} contacts", contacts.len());
                        self.pending_delete = None;
                        self.list.clear();
                        for contact in contacts {
                            self.list.mount(contact);
                        }
                        self.replay_confirmed();
                        self.refilter();
                    }
                    Err(e) => {
                        error!("Error fetching contacts: {}", e);
                        self.notify(Level::Error, LOAD_FAILED_MESSAGE);
                    }
                }
                if self.loads_in_flight == 0 {
                    self.since_load.clear();
                }
            }

            Completion::Created(Ok(contact)) => {
                info!("Created contact {}", contact.id);
                self.remember(Confirmed::Created(contact.clone()));
                self.form.clear();
                self.upsert(contact);
                self.refilter();
                self.notify(Level::Success, ADDED_MESSAGE);
            }
            Completion::Created(Err(e)) => {
                error!("Error adding contact: {}", e);
                self.notify(Level::Error, CREATE_FAILED_MESSAGE);
            }

            Completion::Updated { row_id, id, result } => match result {
                Ok(contact) => {
                    self.remember(Confirmed::Updated(Contact {
                        id: id.clone(),
                        ..contact.clone()
                    }));
                    if let Some(row) = self.list.row_mut(row_id) {
                        editor::commit(row, contact);
                    } else if let Some(row_id) = self.row_for(&id) {
                        // The row was rebuilt by a reload; keep any new draft
                        debug!("Update for {} landed on reloaded row {}", id, row_id);
                        if let Some(row) = self.list.row_mut(row_id) {
                            editor::refresh(row, contact);
                        }
                    } else {
                        warn!("Update finished for contact {} which is gone", id);
                        return;
                    }
                    info!("Updated contact {}", id);
                    self.refilter();
                    self.notify(Level::Success, UPDATED_MESSAGE);
                }
                Err(e) => {
                    error!("Error updating contact: {}", e);
                    self.notify(Level::Error, REQUEST_FAILED_MESSAGE);
                }
            },

            Completion::Removed { row_id, id, result } => match result {
                Ok(()) => {
                    self.remember(Confirmed::Removed(id.clone()));
                    let row_id = if self.list.row(row_id).is_some() {
                        row_id
                    } else if let Some(row_id) = self.row_for(&id) {
                        row_id
                    } else {
                        warn!("Delete finished for contact {} which is gone", id);
                        return;
                    };
                    self.list.unmount(row_id);
                    info!("Deleted contact {}", id);
                    self.refilter();
                    self.notify(Level::Success, DELETED_MESSAGE);
                }
                Err(e) => {
                    error!("Error deleting contact: {}", e);
                    self.notify(Level::Error, REQUEST_FAILED_MESSAGE);
                }
            },
        }
    }

    fn row_for(&self, id: &str) -> Option<RowId> {
        self.list.find_by_contact_id(id).map(|row| row.row_id())
    }

    /// Mount a contact, or refresh its row if a reload already brought it in
    fn upsert(&mut self, contact: Contact) {
        match self.row_for(&contact.id) {
            Some(row_id) => {
                if let Some(row) = self.list.row_mut(row_id) {
                    editor::refresh(row, contact);
                }
            }
            None => {
                self.list.mount(contact);
            }
        }
    }

    fn remember(&mut self, change: Confirmed) {
        if self.loads_in_flight > 0 {
            self.since_load.push(change);
        }
    }

    /// Re-apply changes the reload's snapshot may predate
    fn replay_confirmed(&mut self) {
        for change in self.since_load.clone() {
            match change {
                Confirmed::Created(contact) => self.upsert(contact),
                Confirmed::Updated(contact) => {
                    if let Some(row_id) = self.row_for(&contact.id) {
                        if let Some(row) = self.list.row_mut(row_id) {
                            editor::refresh(row, contact);
                        }
                    }
                }
                Confirmed::Removed(id) => {
                    if let Some(row_id) = self.row_for(&id) {
                        self.list.unmount(row_id);
                    }
                }
            }
        }
    }

    /// Keep an active search applied after the list changes
    fn refilter(&mut self) {
        if !filter::normalize_term(&self.search).is_empty() {
            filter::apply(&mut self.list, &self.search);
        }
    }

    fn notify(&mut self, level: Level, message: impl Into<String>) {
        self.notices.push_back(Notice::new(level, message));
    }
}
