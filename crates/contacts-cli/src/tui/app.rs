//! Application state and logic

use std::collections::HashSet;

use tracing::debug;

use contacts_core::{Command, Completion, Controller, ContactRow, Request, RowId};

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Contact list navigation (and inline editing)
    List,
    /// The add-contact form
    Form,
    /// The search box
    Search,
}

/// An input field of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Phone,
}

impl Field {
    pub fn toggle(self) -> Self {
        match self {
            Field::Name => Field::Phone,
            Field::Phone => Field::Name,
        }
    }
}

/// Application state
pub struct App {
    /// Owns the list, the form and the search term
    pub controller: Controller,
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current focus
    pub focus: Focus,
    /// Active field of the add form
    pub form_field: Field,
    /// Active field of the row being edited
    pub edit_field: Field,
    /// Selected index into the visible rows
    pub selected: usize,
    /// Row currently being edited inline
    pub editing: Option<RowId>,
    /// Number of store requests still running
    pub in_flight: usize,
    /// Rows with an update waiting on the store
    pub saving: HashSet<RowId>,
    /// Whether help overlay is visible
    pub show_help: bool,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            should_quit: false,
            focus: Focus::List,
            form_field: Field::Name,
            edit_field: Field::Name,
            selected: 0,
            editing: None,
            in_flight: 0,
            saving: HashSet::new(),
            show_help: false,
        }
    }

    /// Apply a command locally, returning the store call to make
    pub fn handle(&mut self, command: Command) -> Option<Request> {
        let begin = match command {
            Command::BeginEdit(row_id) => Some(row_id),
            _ => None,
        };

        if let Command::Save(row_id) = command {
            if self.saving.contains(&row_id) {
                debug!("Save for {} already in flight", row_id);
                return None;
            }
        }

        let request = self.controller.handle(command);

        if let Some(Request::Update { row_id, .. }) = &request {
            self.saving.insert(*row_id);
        }

        if let Some(row_id) = begin {
            if self.row_is_editing(row_id) {
                self.editing = Some(row_id);
                self.edit_field = Field::Name;
            }
        }
        self.sync();

        if request.is_some() {
            self.in_flight += 1;
        }
        request
    }

    /// Feed a finished store call back into the controller
    pub fn complete(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let Completion::Updated { row_id, .. } = &completion {
            self.saving.remove(row_id);
        }
        self.controller.complete(completion);
        self.sync();
    }

    /// Rows currently shown
    pub fn visible_rows(&self) -> Vec<&ContactRow> {
        self.controller.list().visible_rows().collect()
    }

    /// Row under the cursor
    pub fn selected_row(&self) -> Option<RowId> {
        self.controller
            .list()
            .visible_rows()
            .nth(self.selected)
            .map(|row| row.row_id())
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let count = self.controller.list().visible_rows().count();
        if self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn move_to_first(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_last(&mut self) {
        let count = self.controller.list().visible_rows().count();
        self.selected = count.saturating_sub(1);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Whether a notice or confirmation is waiting for a key
    pub fn has_modal(&self) -> bool {
        self.controller.pending_confirmation().is_some() || self.controller.peek_notice().is_some()
    }

    pub fn enter_form(&mut self) {
        self.focus = Focus::Form;
        self.form_field = Field::Name;
    }

    pub fn enter_search(&mut self) {
        self.focus = Focus::Search;
    }

    pub fn exit_input_mode(&mut self) {
        self.focus = Focus::List;
    }

    /// Search term with one more character typed
    pub fn search_with(&self, c: char) -> String {
        let mut term = self.controller.search().to_string();
        term.push(c);
        term
    }

    /// Search term with the last character removed
    pub fn search_without_last(&self) -> String {
        let mut term = self.controller.search().to_string();
        term.pop();
        term
    }

    /// Type into the form or the row being edited
    pub fn insert_char(&mut self, c: char) {
        if let Some(input) = self.active_input() {
            input.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(input) = self.active_input() {
            input.pop();
        }
    }

    fn active_input(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Form => {
                let form = self.controller.form_mut();
                Some(match self.form_field {
                    Field::Name => &mut form.name,
                    Field::Phone => &mut form.phone,
                })
            }
            Focus::List => {
                let row_id = self.editing?;
                let field = self.edit_field;
                let draft = self.controller.draft_mut(row_id)?;
                Some(match field {
                    Field::Name => &mut draft.name,
                    Field::Phone => &mut draft.phone,
                })
            }
            Focus::Search => None,
        }
    }

    fn row_is_editing(&self, row_id: RowId) -> bool {
        self.controller
            .list()
            .row(row_id)
            .is_some_and(|row| row.is_editing())
    }

    /// Drop stale edit state and keep the cursor on a visible row
    fn sync(&mut self) {
        if let Some(row_id) = self.editing {
            if !self.row_is_editing(row_id) {
                self.editing = None;
            }
        }

        let count = self.controller.list().visible_rows().count();
        if self.selected >= count {
            self.selected = count.saturating_sub(1);
        }
    }
}
