//! Registry opened once per pipeline run.

use std::cell::Cell;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use lca_model::FlowRole;

use crate::error::RegistryError;
use crate::registry::{FlowRegistry, InMemoryRegistry, RegistryEntry, RegistryMatch, read_registry};

/// A registry loaded from a CSV export, scoped to one run.
///
/// The session counts lookups and logs its closing when dropped, whether the
/// run finished or failed.
#[derive(Debug)]
pub struct RegistrySession {
    path: PathBuf,
    registry: InMemoryRegistry,
    lookups: Cell<usize>,
    misses: Cell<usize>,
    opened_at: Instant,
}

impl RegistrySession {
    pub fn open(path: &Path) -> Result<Self, RegistryError> {
        let file = File::open(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = InMemoryRegistry::new(read_registry(file)?)?;
        debug!(path = %path.display(), entries = registry.len(), "opened registry session");
        Ok(Self {
            path: path.to_path_buf(),
            registry,
            lookups: Cell::new(0),
            misses: Cell::new(0),
            opened_at: Instant::now(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn registry(&self) -> &InMemoryRegistry {
        &self.registry
    }

    pub fn search(&self, keywords: &str) -> Vec<&RegistryEntry> {
        self.registry.search(keywords)
    }

    /// Lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl FlowRegistry for RegistrySession {
    fn lookup(&self, flow_name: &str, role: FlowRole) -> Option<RegistryMatch> {
        self.lookups.set(self.lookups.get() + 1);
        let hit = self.registry.lookup(flow_name, role);
        if hit.is_none() {
            self.misses.set(self.misses.get() + 1);
        }
        hit
    }

    fn suggest(&self, flow_name: &str, role: FlowRole) -> Vec<String> {
        self.registry.suggest(flow_name, role)
    }
}

impl Drop for RegistrySession {
    fn drop(&mut self) {
        debug!(
            path = %self.path.display(),
            lookups = self.lookups.get(),
            misses = self.misses.get(),
            duration_ms = self.opened_at.elapsed().as_millis(),
            "closed registry session"
        );
    }
}
