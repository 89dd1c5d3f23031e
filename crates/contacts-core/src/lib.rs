//! Contacts Core Library
//!
//! This crate provides the core functionality for contacts, a client for a
//! contact list kept in a remote REST store.
//!
//! # Architecture
//!
//! - **Remote store**: Source of truth, reached through `ContactStore`
//! - **Contact list**: In-memory rows projected from the store's responses
//!
//! Front ends only draw the list and turn key presses into `Command`s.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let store = Arc::new(RestContactStore::from_config(&config)?);
//! let mut controller = Controller::new(store);
//!
//! // Load the list
//! controller.dispatch(Command::Load).await;
//!
//! // Search it
//! controller.dispatch(Command::Search("ada".into())).await;
//! ```
//!
//! # Modules
//!
//! - `controller`: Commands, store requests and their completions (main entry point)
//! - `remote`: The REST contact store
//! - `rows`: Rendered list and row view-models
//! - `editor`: Per-row inline edit state machine
//! - `filter`: Client-side search
//! - `models`: Contact records and input drafts
//! - `config`: Application configuration

pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod filter;
pub mod models;
pub mod remote;
pub mod rows;

pub use config::Config;
pub use controller::{Command, Completion, Confirmation, Controller, Level, Notice, Request};
pub use error::{FetchError, Operation, RowError, ValidationError};
pub use models::{Contact, Draft, NewContact};
pub use remote::{ContactStore, RestContactStore};
pub use rows::{ContactList, ContactRow, Placeholder, RowId, RowView};
