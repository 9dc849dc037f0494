mod error;
mod field;
mod sink;
mod totals;

pub(crate) use error::EditError;
pub(crate) use field::{parse_amount, FieldValue, ItemField};
#[cfg(test)]
pub(crate) use sink::ProjectList;
pub(crate) use sink::UpdateSink;
pub(crate) use totals::{aggregate_total, CategoryTotals};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::models::{BudgetItem, ItemId, Project, Role};

/// When edits reach the update sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SyncPolicy {
    /// Every edit is forwarded immediately; commit re-sends the current project.
    Live,
    /// Edits accumulate in a draft; only commit forwards it.
    #[default]
    Draft,
}

impl SyncPolicy {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Draft => "draft",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "live" => Some(Self::Live),
            "draft" => Some(Self::Draft),
            _ => None,
        }
    }
}

impl std::fmt::Display for SyncPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget line-item editor for one selected project at a time.
///
/// The caller owns the project list and is the system of record: every
/// mutation builds a new `Project` value and hands it to an [`UpdateSink`]
/// (immediately under [`SyncPolicy::Live`], on [`BudgetManager::commit`]
/// under [`SyncPolicy::Draft`]). The editor keeps only the list snapshot it
/// was given, the selection, and the uncommitted draft.
pub(crate) struct BudgetManager {
    projects: Vec<Project>,
    selected: Option<String>,
    role: Role,
    policy: SyncPolicy,
    draft: Option<Project>,
}

impl BudgetManager {
    pub(crate) fn new(projects: Vec<Project>, role: Role, policy: SyncPolicy) -> Self {
        let selected = projects.first().map(|p| p.id.clone());
        Self {
            projects,
            selected,
            role,
            policy,
            draft: None,
        }
    }

    pub(crate) fn role(&self) -> Role {
        self.role
    }

    pub(crate) fn policy(&self) -> SyncPolicy {
        self.policy
    }

    pub(crate) fn can_edit(&self) -> bool {
        self.role.can_edit_budget()
    }

    pub(crate) fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Re-supply the caller's project list. The selection is kept; a draft
    /// survives only while its project is still in the list.
    pub(crate) fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        if let Some(draft) = &self.draft {
            if !self.projects.iter().any(|p| p.id == draft.id) {
                debug!(project = %draft.id, "dropping draft for vanished project");
                self.draft = None;
            }
        }
    }

    // ── Selection ─────────────────────────────────────────────

    pub(crate) fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a project by ID. An unknown ID leaves nothing selected, which
    /// turns every editing operation into a no-op. Drops any draft.
    pub(crate) fn select(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            return;
        }
        if self.draft.take().is_some() {
            debug!(project = ?self.selected, "draft dropped on project switch");
        }
        self.selected = Some(id.to_string());
    }

    pub(crate) fn select_next(&mut self) {
        if let Some(id) = self.neighbour_id(1) {
            self.select(&id);
        }
    }

    pub(crate) fn select_prev(&mut self) {
        if let Some(id) = self.neighbour_id(-1) {
            self.select(&id);
        }
    }

    /// ID of the project `step` places away from the selection, wrapping.
    pub(crate) fn neighbour_id(&self, step: isize) -> Option<String> {
        if self.projects.is_empty() {
            return None;
        }
        let len = self.projects.len() as isize;
        let current = self
            .selected
            .as_deref()
            .and_then(|id| self.projects.iter().position(|p| p.id == id))
            .map(|i| i as isize)
            .unwrap_or(if step > 0 { -1 } else { 0 });
        let next = (current + step).rem_euclid(len) as usize;
        Some(self.projects[next].id.clone())
    }

    /// The project being shown: the draft if one exists, else the caller's copy.
    pub(crate) fn selected_project(&self) -> Option<&Project> {
        if let Some(draft) = &self.draft {
            return Some(draft);
        }
        let id = self.selected.as_deref()?;
        self.projects.iter().find(|p| p.id == id)
    }

    pub(crate) fn items(&self) -> &[BudgetItem] {
        self.selected_project()
            .map(|p| p.budget_items.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn total(&self) -> Decimal {
        aggregate_total(self.items())
    }

    pub(crate) fn category_totals(&self) -> CategoryTotals {
        CategoryTotals::from_items(self.items())
    }

    /// True while a draft holds edits that have not been committed.
    pub(crate) fn is_dirty(&self) -> bool {
        self.draft.is_some()
    }

    // ── Mutations ─────────────────────────────────────────────

    pub(crate) fn update_field(
        &mut self,
        sink: &mut dyn UpdateSink,
        item_id: &ItemId,
        value: FieldValue,
    ) -> Result<(), EditError> {
        self.authorize("update")?;
        value.validate()?;
        let Some(project) = self.selected_project() else {
            return Ok(());
        };
        let Some(pos) = project.budget_items.iter().position(|i| &i.id == item_id) else {
            debug!(item = %item_id, "update ignored: no such item");
            return Ok(());
        };

        let field = value.field();
        let mut items = project.budget_items.clone();
        let updated = value.apply_to(&items[pos])?;
        items[pos] = updated;
        debug!(item = %item_id, %field, "item field updated");
        self.apply(sink, items)
    }

    /// Append a default item and return its ID, or `None` with nothing selected.
    pub(crate) fn add_item(&mut self, sink: &mut dyn UpdateSink) -> Result<Option<ItemId>, EditError> {
        self.authorize("add")?;
        let Some(project) = self.selected_project() else {
            return Ok(None);
        };
        let item = BudgetItem::new(ItemId::generate());
        let id = item.id.clone();
        let mut items = project.budget_items.clone();
        items.push(item);
        debug!(item = %id, "item added");
        self.apply(sink, items)?;
        Ok(Some(id))
    }

    /// Remove an item. Returns whether anything was removed.
    pub(crate) fn remove_item(
        &mut self,
        sink: &mut dyn UpdateSink,
        item_id: &ItemId,
    ) -> Result<bool, EditError> {
        self.authorize("remove")?;
        let Some(project) = self.selected_project() else {
            return Ok(false);
        };
        if !project.budget_items.iter().any(|i| &i.id == item_id) {
            debug!(item = %item_id, "remove ignored: no such item");
            return Ok(false);
        }
        let items: Vec<BudgetItem> = project
            .budget_items
            .iter()
            .filter(|i| &i.id != item_id)
            .cloned()
            .collect();
        debug!(item = %item_id, "item removed");
        self.apply(sink, items)?;
        Ok(true)
    }

    /// Append a batch of items in a single replacement. Totals are recomputed
    /// and IDs already present in the project are replaced by fresh ones.
    pub(crate) fn import_items(
        &mut self,
        sink: &mut dyn UpdateSink,
        incoming: Vec<BudgetItem>,
    ) -> Result<usize, EditError> {
        self.authorize("import")?;
        let Some(project) = self.selected_project() else {
            return Ok(0);
        };
        if incoming.is_empty() {
            return Ok(0);
        }
        let mut items = project.budget_items.clone();
        let count = incoming.len();
        for mut item in incoming {
            FieldValue::Quantity(item.quantity).validate()?;
            FieldValue::UnitPrice(item.unit_price).validate()?;
            item.total_price = item.computed_total().ok_or_else(|| {
                EditError::invalid(ItemField::UnitPrice, "total price is not exactly representable")
            })?;
            if items.iter().any(|i| i.id == item.id) {
                item.id = ItemId::generate();
            }
            items.push(item);
        }
        info!(count, "items imported");
        self.apply(sink, items)?;
        Ok(count)
    }

    /// Send the selected project, as currently shown, to the sink.
    pub(crate) fn commit(&mut self, sink: &mut dyn UpdateSink) -> Result<(), EditError> {
        self.authorize("commit")?;
        let Some(project) = self.selected_project().cloned() else {
            return Ok(());
        };
        let id = project.id.clone();
        sink.update_project(project.clone())?;
        self.replace_snapshot(project);
        self.draft = None;
        info!(project = %id, "budget committed");
        Ok(())
    }

    /// Throw away uncommitted draft edits.
    pub(crate) fn discard(&mut self) -> bool {
        let had_draft = self.draft.take().is_some();
        if had_draft {
            info!(project = ?self.selected, "draft discarded");
        }
        had_draft
    }

    pub(crate) fn authorize(&self, action: &'static str) -> Result<(), EditError> {
        if self.role.can_edit_budget() {
            return Ok(());
        }
        warn!(role = %self.role, action, "budget edit refused");
        Err(EditError::Unauthorized {
            role: self.role,
            action,
        })
    }

    /// Route a new item sequence for the selected project according to the policy.
    fn apply(&mut self, sink: &mut dyn UpdateSink, items: Vec<BudgetItem>) -> Result<(), EditError> {
        let Some(base) = self.selected_project() else {
            return Ok(());
        };
        let next = Project {
            budget_items: items,
            ..base.clone()
        };
        match self.policy {
            SyncPolicy::Live => {
                sink.update_project(next.clone())?;
                self.replace_snapshot(next);
            }
            SyncPolicy::Draft => {
                if next != *base {
                    self.draft = Some(next);
                }
            }
        }
        Ok(())
    }

    fn replace_snapshot(&mut self, project: Project) {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => self.projects.push(project),
        }
    }
}
