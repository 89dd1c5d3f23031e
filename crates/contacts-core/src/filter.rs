//! Client-side search over mounted rows
//!
//! Matching is a case-insensitive substring test on the row's stored
//! name, or a substring test on its stored phone. No store round trip.

use crate::rows::{ContactList, Placeholder, RowIndex};

/// Counts after a filter pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub total: usize,
    pub visible: usize,
}

/// Lower-case and trim a search term
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Does a row match an already normalized term
pub fn matches(index: &RowIndex, term: &str) -> bool {
    term.is_empty() || index.name.contains(term) || index.phone.contains(term)
}

/// Recompute visibility of every row and the placeholder
pub fn apply(list: &mut ContactList, term: &str) -> FilterSummary {
    let term = normalize_term(term);

    let mut visible = 0;
    for row in list.rows_mut() {
        row.visible = matches(&row.index, &term);
        if row.visible {
            visible += 1;
        }
    }

    let total = list.len();
    list.placeholder = if total == 0 {
        Placeholder::Empty
    } else if visible == 0 {
        Placeholder::NoMatches
    } else {
        Placeholder::Hidden
    };

    FilterSummary { total, visible }
}
