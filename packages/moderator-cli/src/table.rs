//! Generic queue table state: selection, row mapping, and the in-flight
//! dispatch discipline.

use mealboard_client::{QueuedAlias, QueuedReview};
use mealboard_types::ModerationStatus;
use std::collections::HashSet;

/// Maps one queue entity kind onto table rows.
pub trait QueueRow: Clone {
    fn title() -> &'static str;
    fn columns() -> &'static [&'static str];
    fn id(&self) -> i64;
    fn status(&self) -> ModerationStatus;
    /// Display string for notifications (item name, proposed alias).
    fn subject(&self) -> String;
    fn cells(&self) -> Vec<String>;
}

impl QueueRow for QueuedReview {
    fn title() -> &'static str {
        "Reviews awaiting moderation"
    }

    fn columns() -> &'static [&'static str] {
        &["Id", "Item", "Commons", "Stars", "Served", "Reviewer", "Comments"]
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> ModerationStatus {
        self.status
    }

    fn subject(&self) -> String {
        self.item.name.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.item.name.clone(),
            self.item.dining_commons_code.clone(),
            "*".repeat(self.items_stars.max(0) as usize),
            self.date_item_served.to_string(),
            self.reviewer_alias
                .clone()
                .unwrap_or_else(|| self.reviewer_email.clone()),
            self.reviewer_comments.clone().unwrap_or_default(),
        ]
    }
}

impl QueueRow for QueuedAlias {
    fn title() -> &'static str {
        "Alias proposals awaiting moderation"
    }

    fn columns() -> &'static [&'static str] {
        &["Id", "Proposed alias", "Current alias", "Email", "Proposed at"]
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> ModerationStatus {
        self.status
    }

    fn subject(&self) -> String {
        self.proposed_alias.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.proposed_alias.clone(),
            self.alias.clone().unwrap_or_default(),
            self.email.clone(),
            self.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

/// Table state for one queue. Tolerates empty queues; selection is clamped
/// on every refresh.
pub struct QueueTable<R: QueueRow> {
    rows: Vec<R>,
    selected: usize,
    in_flight: HashSet<i64>,
}

impl<R: QueueRow> Default for QueueTable<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            selected: 0,
            in_flight: HashSet::new(),
        }
    }
}

impl<R: QueueRow> QueueTable<R> {
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.rows.is_empty() {
            None
        } else {
            Some(self.selected.min(self.rows.len() - 1))
        }
    }

    pub fn selected_row(&self) -> Option<&R> {
        self.selected_index().map(|i| &self.rows[i])
    }

    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    pub fn select_next(&mut self) {
        if !self.rows.is_empty() && self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn is_in_flight(&self, id: i64) -> bool {
        self.in_flight.contains(&id)
    }

    /// A row can be dispatched only while awaiting review and with no
    /// decision already on the wire for it.
    pub fn can_dispatch(&self, row: &R) -> bool {
        row.status().is_awaiting() && !self.is_in_flight(row.id())
    }

    /// Claim the selected row for dispatch. Returns the row only when it is
    /// actually dispatchable, and marks its id in-flight.
    pub fn begin_dispatch(&mut self) -> Option<R> {
        let row = self.selected_row()?.clone();
        if !self.can_dispatch(&row) {
            return None;
        }
        self.in_flight.insert(row.id());
        Some(row)
    }

    /// A dispatch settled (success or failure); the id may be tried again.
    pub fn settle(&mut self, id: i64) {
        self.in_flight.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn alias_row(id: i64, status: ModerationStatus) -> QueuedAlias {
        QueuedAlias {
            id,
            user_id: 100 + id,
            email: format!("user{id}@example.edu"),
            alias: None,
            proposed_alias: format!("alias-{id}"),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_table_has_no_selection_and_never_panics() {
        let mut table: QueueTable<QueuedAlias> = QueueTable::default();
        assert!(table.selected_row().is_none());
        table.select_next();
        table.select_prev();
        assert!(table.begin_dispatch().is_none());
    }

    #[test]
    fn selection_moves_and_clamps_on_refresh() {
        let mut table = QueueTable::default();
        table.set_rows(vec![
            alias_row(1, ModerationStatus::AwaitingReview),
            alias_row(2, ModerationStatus::AwaitingReview),
            alias_row(3, ModerationStatus::AwaitingReview),
        ]);
        table.select_next();
        table.select_next();
        assert_eq!(table.selected_row().unwrap().id, 3);
        table.select_next();
        assert_eq!(table.selected_row().unwrap().id, 3);

        // The decided row disappears; selection clamps to the new tail.
        table.set_rows(vec![alias_row(1, ModerationStatus::AwaitingReview)]);
        assert_eq!(table.selected_row().unwrap().id, 1);
    }

    #[test]
    fn at_most_one_in_flight_dispatch_per_id() {
        let mut table = QueueTable::default();
        table.set_rows(vec![alias_row(1, ModerationStatus::AwaitingReview)]);

        let claimed = table.begin_dispatch();
        assert!(claimed.is_some());
        assert!(table.is_in_flight(1));

        // Same row again while in flight: refused.
        assert!(table.begin_dispatch().is_none());

        table.settle(1);
        assert!(table.begin_dispatch().is_some());
    }

    #[test]
    fn terminal_rows_are_not_dispatchable() {
        let mut table = QueueTable::default();
        table.set_rows(vec![alias_row(1, ModerationStatus::Rejected)]);
        assert!(!table.can_dispatch(&table.rows()[0].clone()));
        assert!(table.begin_dispatch().is_none());
    }
}
