//! Contact command handlers
//!
//! Each handler drives the same `Controller` the TUI uses, one command at
//! a time, and turns its notices into output.

use anyhow::{bail, Result};

use contacts_core::{Command, ContactList, Controller, Draft, Level, RowId};

use crate::output::Output;
use crate::prompt::confirm;

/// List all contacts
pub async fn list(controller: &mut Controller, output: &Output) -> Result<()> {
    load(controller, output).await?;
    output.print_list(controller.list());
    Ok(())
}

/// Create a contact
pub async fn add(
    controller: &mut Controller,
    name: String,
    phone: String,
    output: &Output,
) -> Result<()> {
    *controller.form_mut() = Draft::new(name, phone);
    controller.dispatch(Command::SubmitForm).await;
    report(controller, output)?;

    if let Some(row) = controller.list().rows().last() {
        output.print_contact(row.contact());
    }
    Ok(())
}

/// Edit a contact; omitted fields keep their current value
pub async fn edit(
    controller: &mut Controller,
    id: String,
    name: Option<String>,
    phone: Option<String>,
    output: &Output,
) -> Result<()> {
    if name.is_none() && phone.is_none() {
        bail!("Nothing to change. Pass --name and/or --phone.");
    }

    load(controller, output).await?;
    let row_id = resolve_row(controller.list(), &id)?;

    controller.dispatch(Command::BeginEdit(row_id)).await;
    if let Some(draft) = controller.draft_mut(row_id) {
        if let Some(name) = name {
            draft.name = name;
        }
        if let Some(phone) = phone {
            draft.phone = phone;
        }
    }
    controller.dispatch(Command::Save(row_id)).await;
    report(controller, output)?;

    if let Some(row) = controller.list().row(row_id) {
        output.print_contact(row.contact());
    }
    Ok(())
}

/// Delete a contact after confirmation
pub async fn delete(
    controller: &mut Controller,
    id: String,
    yes: bool,
    output: &Output,
) -> Result<()> {
    load(controller, output).await?;
    let row_id = resolve_row(controller.list(), &id)?;

    controller.dispatch(Command::RequestDelete(row_id)).await;
    let Some(confirmation) = controller.pending_confirmation() else {
        bail!("Contact not found: {}", id);
    };

    if !yes && output.should_prompt() {
        if let Some(row) = controller.list().row(row_id) {
            println!("Delete contact: {} - {}", row.contact().id, row.contact().name);
        }
        if !confirm(confirmation.message)? {
            controller.dispatch(Command::CancelDelete).await;
            output.message("Cancelled.");
            return Ok(());
        }
    }

    controller.dispatch(Command::ConfirmDelete).await;
    report(controller, output)?;

    if !output.is_json() && controller.list().is_empty() {
        if let Some(message) = controller.list().placeholder().message() {
            output.message(message);
        }
    }
    Ok(())
}

/// Search contacts by name or phone
pub async fn search(controller: &mut Controller, term: String, output: &Output) -> Result<()> {
    load(controller, output).await?;
    controller.dispatch(Command::Search(term)).await;
    output.print_list(controller.list());
    Ok(())
}

async fn load(controller: &mut Controller, output: &Output) -> Result<()> {
    controller.dispatch(Command::Load).await;
    report(controller, output)
}

/// Print queued notices; fail on the first warning or error
fn report(controller: &mut Controller, output: &Output) -> Result<()> {
    let mut failure = None;

    for notice in controller.take_notices() {
        match notice.level {
            Level::Success => output.success(&notice.message),
            Level::Warning | Level::Error => {
                if failure.is_none() {
                    failure = Some(notice.message);
                }
            }
        }
    }

    match failure {
        Some(message) => bail!(message),
        None => Ok(()),
    }
}

/// Resolve a contact id (full id or unique prefix) to a row
fn resolve_row(list: &ContactList, id: &str) -> Result<RowId> {
    if let Some(row) = list.find_by_contact_id(id) {
        return Ok(row.row_id());
    }

    let matches: Vec<_> = list
        .rows()
        .iter()
        .filter(|r| r.contact().id.starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No contact found matching: {}", id),
        1 => Ok(matches[0].row_id()),
        _ => {
            eprintln!("Multiple contacts match '{}':", id);
            for row in &matches {
                eprintln!("  {} - {}", row.contact().id, row.contact().name);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
