use anyhow::Result;

use crate::models::Project;

/// Receives the full replacement project produced by an editor operation.
pub(crate) trait UpdateSink {
    fn update_project(&mut self, project: Project) -> Result<()>;
}

/// An in-memory system of record: replaces a project with the same ID, or
/// appends it when the ID is new.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ProjectList {
    projects: Vec<Project>,
}

#[cfg(test)]
impl ProjectList {
    pub(crate) fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub(crate) fn projects(&self) -> &[Project] {
        &self.projects
    }
}

#[cfg(test)]
impl UpdateSink for ProjectList {
    fn update_project(&mut self, project: Project) -> Result<()> {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => self.projects.push(project),
        }
        Ok(())
    }
}
