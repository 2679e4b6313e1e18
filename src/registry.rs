//! Launcher set and swallowed-window bookkeeping

use std::collections::HashMap;

/// App ids allowed to be swallowed by their children
#[derive(Debug, Clone, Default)]
pub struct LauncherSet {
    app_ids: Vec<String>,
}

impl LauncherSet {
    pub fn new(app_ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            app_ids: app_ids.into_iter().collect(),
        }
    }

    /// Windows without any app id are never launchers
    pub fn contains(&self, app_id: Option<&str>) -> bool {
        app_id.is_some_and(|id| self.app_ids.iter().any(|launcher| launcher == id))
    }

    pub fn is_empty(&self) -> bool {
        self.app_ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.app_ids.iter().map(String::as_str)
    }
}

/// A launcher window hidden behind a child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    pub id: i64,
    pub app_id: String,
}

impl Launcher {
    /// Mark left on the launcher's tiling slot so it can be moved back
    pub fn mark(&self) -> String {
        format!("_nomz_{}", self.id)
    }
}

/// Live child → launcher pairs, keyed by the child's container id
#[derive(Debug, Default)]
pub struct SwallowRegistry {
    swallowed: HashMap<i64, Launcher>,
}

impl SwallowRegistry {
    pub fn record(&mut self, child: i64, launcher: Launcher) {
        self.swallowed.insert(child, launcher);
    }

    pub fn lookup(&self, child: i64) -> Option<&Launcher> {
        self.swallowed.get(&child)
    }

    pub fn remove(&mut self, child: i64) -> Option<Launcher> {
        self.swallowed.remove(&child)
    }

    /// Whether `launcher` is currently hidden behind some child
    pub fn launcher_in_use(&self, launcher: i64) -> bool {
        self.swallowed.values().any(|l| l.id == launcher)
    }

    pub fn len(&self) -> usize {
        self.swallowed.len()
    }
}
