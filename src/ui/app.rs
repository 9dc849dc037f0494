use anyhow::Result;
use std::path::Path;
use tracing::warn;

use super::util::ListCursor;
use crate::db::ProjectStore;
use crate::editor::{BudgetManager, EditError, ItemField, SyncPolicy, UpdateSink};
use crate::models::{BudgetItem, ItemId, Project};
use crate::transfer::{self, BudgetCsv};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Items,
    Summary,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Items, Self::Summary]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Items => write!(f, "Items"),
            Self::Summary => write!(f, "Summary"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    RemoveItem { id: ItemId, name: String },
    SwitchProject { id: String },
    Quit,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    /// Shared buffer for `:` commands and cell edits.
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    pub(crate) manager: BudgetManager,
    pub(crate) cursor: ListCursor,
    pub(crate) field_index: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(manager: BudgetManager) -> Self {
        Self {
            running: true,
            screen: Screen::Items,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            manager,
            cursor: ListCursor::default(),
            field_index: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Reload the project list from the store, keeping selection and draft.
    pub(crate) fn refresh(&mut self, store: &dyn ProjectStore) -> Result<()> {
        self.manager.set_projects(store.list_projects()?);
        self.clamp_cursor();
        Ok(())
    }

    pub(crate) fn project(&self) -> Option<&Project> {
        self.manager.selected_project()
    }

    pub(crate) fn items(&self) -> &[BudgetItem] {
        self.manager.items()
    }

    pub(crate) fn selected_item(&self) -> Option<&BudgetItem> {
        self.items().get(self.cursor.index)
    }

    pub(crate) fn selected_field(&self) -> ItemField {
        let fields = ItemField::all();
        fields[self.field_index.min(fields.len() - 1)]
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn report(&mut self, err: &EditError) {
        warn!(error = %err, "edit failed");
        self.set_status(format!("Error: {err}"));
    }

    // ── Cursor ────────────────────────────────────────────────

    pub(crate) fn move_down(&mut self) {
        let len = self.items().len();
        self.cursor.down(len, self.visible_rows);
    }

    pub(crate) fn move_up(&mut self) {
        self.cursor.up();
    }

    pub(crate) fn move_left(&mut self) {
        self.field_index = self.field_index.saturating_sub(1);
    }

    pub(crate) fn move_right(&mut self) {
        if self.field_index + 1 < ItemField::all().len() {
            self.field_index += 1;
        }
    }

    pub(crate) fn goto_top(&mut self) {
        self.cursor.top();
    }

    pub(crate) fn goto_bottom(&mut self) {
        let len = self.items().len();
        self.cursor.bottom(len, self.visible_rows);
    }

    pub(crate) fn clamp_cursor(&mut self) {
        let len = self.items().len();
        self.cursor.clamp(len, self.visible_rows);
    }

    // ── Editing ───────────────────────────────────────────────

    /// Enter on a cell: category cells cycle in place, others open the edit box.
    pub(crate) fn begin_edit(&mut self, sink: &mut dyn UpdateSink) {
        let field = self.selected_field();
        if field == ItemField::Category {
            self.cycle_category(sink, true);
            return;
        }
        let Some(text) = self.selected_item().map(|item| field.current_text(item)) else {
            self.set_status("No item selected. Press a to add one");
            return;
        };
        if !self.manager.can_edit() {
            self.set_status(format!("{} role is read-only", self.manager.role()));
            return;
        }
        self.command_input = text;
        self.input_mode = InputMode::Editing;
    }

    /// Step the selected item's category forward or back. Only acts on the
    /// category column.
    pub(crate) fn cycle_category(&mut self, sink: &mut dyn UpdateSink, forward: bool) {
        if self.selected_field() != ItemField::Category {
            return;
        }
        let Some(item) = self.selected_item() else {
            self.set_status("No item selected. Press a to add one");
            return;
        };
        let id = item.id.clone();
        let category = if forward {
            item.category.next()
        } else {
            item.category.prev()
        };
        self.apply_value(sink, &id, ItemField::Category, category.key());
    }

    /// Commit the edit box to the selected cell.
    pub(crate) fn finish_edit(&mut self, sink: &mut dyn UpdateSink) {
        let raw = std::mem::take(&mut self.command_input);
        self.input_mode = InputMode::Normal;
        let Some(id) = self.selected_item().map(|i| i.id.clone()) else {
            return;
        };
        let field = self.selected_field();
        self.apply_value(sink, &id, field, &raw);
    }

    pub(crate) fn cancel_edit(&mut self) {
        self.command_input.clear();
        self.input_mode = InputMode::Normal;
        self.set_status("Edit cancelled");
    }

    /// Parse `raw` for `field` and apply it. Failures land in the status bar.
    pub(crate) fn apply_value(
        &mut self,
        sink: &mut dyn UpdateSink,
        id: &ItemId,
        field: ItemField,
        raw: &str,
    ) {
        let result = self
            .manager
            .authorize("update")
            .and_then(|()| field.parse_input(raw))
            .and_then(|value| self.manager.update_field(sink, id, value));
        match result {
            Ok(()) => {
                let shown = self
                    .items()
                    .iter()
                    .find(|i| &i.id == id)
                    .map(|i| field.current_text(i))
                    .unwrap_or_default();
                self.set_status(format!("{} = {shown}", field.label()));
            }
            Err(e) => self.report(&e),
        }
    }

    pub(crate) fn add_item(&mut self, sink: &mut dyn UpdateSink) {
        match self.manager.add_item(sink) {
            Ok(Some(_)) => {
                self.goto_bottom();
                self.field_index = ItemField::all()
                    .iter()
                    .position(|f| *f == ItemField::Name)
                    .unwrap_or(0);
                self.set_status("Added item");
            }
            Ok(None) => self.set_status("No project selected"),
            Err(e) => self.report(&e),
        }
    }

    /// Ask before removing the item under the cursor.
    pub(crate) fn request_remove(&mut self) {
        if !self.manager.can_edit() {
            self.set_status(format!("{} role is read-only", self.manager.role()));
            return;
        }
        let Some(item) = self.selected_item() else {
            self.set_status("No item to remove");
            return;
        };
        let name = if item.name.is_empty() {
            "(unnamed)".to_string()
        } else {
            item.name.clone()
        };
        let id = item.id.clone();
        self.confirm(
            format!("Remove '{name}'?"),
            PendingAction::RemoveItem { id, name },
        );
    }

    pub(crate) fn commit(&mut self, sink: &mut dyn UpdateSink) {
        let was_dirty = self.manager.is_dirty();
        match self.manager.commit(sink) {
            Ok(()) if self.project().is_none() => self.set_status("No project selected"),
            Ok(()) if was_dirty || self.manager.policy() == SyncPolicy::Live => {
                self.set_status("Saved")
            }
            Ok(()) => self.set_status("Saved (no changes)"),
            Err(e) => self.report(&e),
        }
    }

    pub(crate) fn discard(&mut self) {
        if self.manager.discard() {
            self.clamp_cursor();
            self.set_status("Changes discarded");
        } else {
            self.set_status("Nothing to discard");
        }
    }

    pub(crate) fn import_csv(&mut self, sink: &mut dyn UpdateSink, path: &Path) {
        let items = match BudgetCsv::read(path) {
            Ok(items) => items,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "import failed");
                self.set_status(format!("Import failed: {e:#}"));
                return;
            }
        };
        match self.manager.import_items(sink, items) {
            Ok(0) => self.set_status(format!("No items found in {}", path.display())),
            Ok(count) => {
                self.goto_bottom();
                self.set_status(format!("Imported {count} items from {}", path.display()));
            }
            Err(e) => self.report(&e),
        }
    }

    pub(crate) fn export(&mut self, path: &Path) {
        let Some(project) = self.project() else {
            self.set_status("No project selected");
            return;
        };
        match transfer::export_project(project, path) {
            Ok(_) => self.set_status(format!("Exported to {}", path.display())),
            Err(e) => self.set_status(format!("Export failed: {e:#}")),
        }
    }

    // ── Projects ──────────────────────────────────────────────

    /// Move to the project `step` away, asking first if a draft would be lost.
    pub(crate) fn request_switch(&mut self, step: isize) {
        if self.manager.is_dirty() {
            if let Some(id) = self.manager.neighbour_id(step) {
                self.request_select(id);
            }
            return;
        }
        if step < 0 {
            self.manager.select_prev();
        } else {
            self.manager.select_next();
        }
        self.show_selected();
    }

    pub(crate) fn request_select(&mut self, id: String) {
        if self.manager.selected_id() == Some(id.as_str()) {
            return;
        }
        if self.manager.is_dirty() {
            self.confirm(
                "Discard uncommitted changes and switch project?".into(),
                PendingAction::SwitchProject { id },
            );
        } else {
            self.select_project(&id);
        }
    }

    fn select_project(&mut self, id: &str) {
        self.manager.select(id);
        self.show_selected();
    }

    fn show_selected(&mut self) {
        self.cursor.top();
        let name = self
            .project()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        self.set_status(format!("Project: {name}"));
    }

    pub(crate) fn request_quit(&mut self) {
        if self.manager.is_dirty() {
            self.confirm("Quit without saving changes?".into(), PendingAction::Quit);
        } else {
            self.running = false;
        }
    }

    // ── Confirmation ──────────────────────────────────────────

    fn confirm(&mut self, message: String, action: PendingAction) {
        self.confirm_message = message;
        self.pending_action = Some(action);
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn accept_pending(&mut self, sink: &mut dyn UpdateSink) {
        if let Some(action) = self.pending_action.take() {
            match action {
                PendingAction::RemoveItem { id, name } => {
                    match self.manager.remove_item(sink, &id) {
                        Ok(true) => {
                            self.clamp_cursor();
                            self.set_status(format!("Removed: {name}"));
                        }
                        Ok(false) => self.set_status("Item no longer exists"),
                        Err(e) => self.report(&e),
                    }
                }
                PendingAction::SwitchProject { id } => {
                    self.manager.discard();
                    self.select_project(&id);
                }
                PendingAction::Quit => self.running = false,
            }
        }
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
    }

    pub(crate) fn reject_pending(&mut self) {
        self.pending_action = None;
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
        self.set_status("Cancelled");
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod app_tests;
