//! Project identity and the project-directory collaborator.

use crate::topic::slugify;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one project as supplied by the project store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// Stable project identifier.
    pub id: String,
    /// Display name; the topic slug is derived from it.
    pub name: String,
}

impl ProjectRef {
    /// Create a project reference with a fresh random id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }

    /// Create a project reference with a known id.
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Topic slug for this project.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

/// Enumeration of every project known to the store. Persistence of project
/// records is external; this is the read surface the sync layer needs.
pub trait ProjectDirectory {
    /// All known projects, active or not.
    fn list_projects(&self) -> Vec<ProjectRef>;
}

/// Directory backed by a plain list, for hosts that already hold their
/// projects in memory and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjects {
    projects: Vec<ProjectRef>,
}

impl InMemoryProjects {
    /// Create a directory over the given projects.
    pub fn new(projects: Vec<ProjectRef>) -> Self {
        Self { projects }
    }

    /// Add a project to the directory.
    pub fn add(&mut self, project: ProjectRef) {
        self.projects.push(project);
    }
}

impl ProjectDirectory for InMemoryProjects {
    fn list_projects(&self) -> Vec<ProjectRef> {
        self.projects.clone()
    }
}
