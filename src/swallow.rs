//! Swallow / unswallow engines
//!
//! A new window whose process descends from a launcher window sitting in the
//! same container takes the launcher's tiling slot. The launcher is marked,
//! floated and pushed off-screen. When the child closes, the launcher is
//! pulled back to its mark and focused.
//!
//! Every step is a single window manager command. The first rejected command
//! aborts the sequence; nothing already applied is undone.

use nomz_ipc::Node;
use tracing::{debug, info};

use crate::error::SwallowError;
use crate::ipc::{CommandRunner, WindowTreeQuery};
use crate::proc::ProcFs;
use crate::registry::{Launcher, LauncherSet, SwallowRegistry};

pub type Result<T> = std::result::Result<T, SwallowError>;

/// Child and launcher container ids a command sequence acts on
#[derive(Debug, Clone, Copy)]
struct Pair {
    child: i64,
    launcher: i64,
}

/// Swallowing state: configured launchers plus live pairs
pub struct Swallower {
    launchers: LauncherSet,
    registry: SwallowRegistry,
    procfs: ProcFs,
}

impl Swallower {
    pub fn new(launchers: LauncherSet, procfs: ProcFs) -> Self {
        Self {
            launchers,
            registry: SwallowRegistry::default(),
            procfs,
        }
    }

    pub fn registry(&self) -> &SwallowRegistry {
        &self.registry
    }

    /// Handle a freshly mapped window
    pub async fn on_new_window<W>(&mut self, wm: &mut W, window: &Node) -> Result<()>
    where
        W: WindowTreeQuery + CommandRunner,
    {
        if self.launchers.contains(window.app_id()) {
            return Ok(());
        }

        let tree = wm.get_tree().await?;
        let Some(launcher) = self.find_launcher(&tree, window) else {
            return Ok(());
        };

        let hidden = Launcher {
            id: launcher.id,
            app_id: launcher.app_id().unwrap_or_default().to_string(),
        };
        info!(
            child = window.id,
            child_app = window.app_id().unwrap_or_default(),
            launcher = hidden.id,
            launcher_app = %hidden.app_id,
            "swallowing launcher"
        );

        let pair = Pair {
            child: window.id,
            launcher: hidden.id,
        };
        let (width, height) = (launcher.geometry.width, launcher.geometry.height);
        run(wm, pair, pair.child, format!("swap container with con_id {}", hidden.id)).await?;
        run(wm, pair, hidden.id, format!("mark --add {}", hidden.mark())).await?;
        run(wm, pair, hidden.id, "floating enable".into()).await?;
        run(
            wm,
            pair,
            hidden.id,
            format!("move position {} px {} px", -width * 2, -height * 2),
        )
        .await?;

        self.registry.record(window.id, hidden);
        Ok(())
    }

    /// Handle a closed window, restoring its launcher if it swallowed one
    pub async fn on_window_close<W>(&mut self, wm: &mut W, window: &Node) -> Result<()>
    where
        W: CommandRunner,
    {
        let Some(launcher) = self.registry.lookup(window.id).cloned() else {
            return Ok(());
        };

        info!(
            child = window.id,
            launcher = launcher.id,
            launcher_app = %launcher.app_id,
            "restoring launcher"
        );

        let result = restore(wm, window.id, &launcher).await;
        // Dropped whether or not restoring worked
        self.registry.remove(window.id);
        result
    }

    /// Nearest ancestor process owning a launcher window in the child's container.
    ///
    /// Per ancestor only the first window in breadth-first order is
    /// considered. The walk stops at the first launcher found; if that
    /// launcher is already hidden behind another child, nothing is swallowed.
    fn find_launcher<'t>(&self, tree: &'t Node, window: &Node) -> Option<&'t Node> {
        let container = tree
            .find_by_id(window.id)
            .and_then(|node| tree.parent_of(node.id));
        let Some(container) = container else {
            debug!(window = window.id, "window left the tree before matching");
            return None;
        };
        let pid = window.pid?;

        let candidate = self
            .procfs
            .ancestry(pid)
            .filter_map(|ancestor| container.find_by_pid(ancestor).into_iter().next())
            .find(|candidate| self.launchers.contains(candidate.app_id()))?;

        if self.registry.launcher_in_use(candidate.id) {
            debug!(
                window = window.id,
                launcher = candidate.id,
                "nearest launcher already swallowed"
            );
            return None;
        }
        Some(candidate)
    }
}

async fn restore<W: CommandRunner>(wm: &mut W, child: i64, launcher: &Launcher) -> Result<()> {
    let pair = Pair {
        child,
        launcher: launcher.id,
    };
    run(wm, pair, launcher.id, "floating disable".into()).await?;
    run(wm, pair, launcher.id, format!("move container to mark {}", launcher.mark())).await?;
    run(wm, pair, launcher.id, "focus".into()).await
}

/// Run one command, turning any unsuccessful reply into an error
async fn run<W: CommandRunner>(wm: &mut W, pair: Pair, target: i64, command: String) -> Result<()> {
    for outcome in wm.run_command(target, &command).await? {
        if !outcome.success {
            return Err(SwallowError::CommandRejected {
                child: pair.child,
                launcher: pair.launcher,
                target,
                command,
                error: outcome.error.unwrap_or_default(),
            });
        }
    }
    Ok(())
}
