//! In-memory window manager for engine and dispatcher tests

use std::collections::VecDeque;

use nomz_ipc::{CommandOutcome, Node, Result, WindowChange, WindowEvent};

use crate::ipc::{CommandRunner, EventSource, WindowTreeQuery};

pub fn window(id: i64, pid: u32, app_id: &str) -> Node {
    Node {
        id,
        pid: Some(pid),
        app_id: Some(app_id.into()),
        ..Node::default()
    }
}

pub fn workspace(nodes: Vec<Node>) -> Node {
    Node {
        id: 3,
        nodes,
        ..Node::default()
    }
}

pub fn root(workspace: Node) -> Node {
    Node {
        id: 1,
        nodes: vec![workspace],
        ..Node::default()
    }
}

pub fn event(change: WindowChange, container: Node) -> WindowEvent {
    WindowEvent { change, container }
}

/// Records every command; rejects the ones matching `rejected`
pub struct FakeWm {
    pub tree: Node,
    pub commands: Vec<(i64, String)>,
    pub tree_queries: usize,
    rejected: Vec<(String, String)>,
}

impl FakeWm {
    pub fn new(workspace: Node) -> Self {
        Self {
            tree: root(workspace),
            commands: Vec::new(),
            tree_queries: 0,
            rejected: Vec::new(),
        }
    }

    /// Reject commands starting with `prefix`, replying with `error`
    pub fn reject(&mut self, prefix: &str, error: &str) {
        self.rejected.push((prefix.into(), error.into()));
    }
}

impl WindowTreeQuery for FakeWm {
    async fn get_tree(&mut self) -> Result<Node> {
        self.tree_queries += 1;
        Ok(self.tree.clone())
    }
}

impl CommandRunner for FakeWm {
    async fn run_command(&mut self, target: i64, command: &str) -> Result<Vec<CommandOutcome>> {
        self.commands.push((target, command.to_string()));
        let error = self
            .rejected
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, error)| error.clone());
        Ok(vec![CommandOutcome {
            success: error.is_none(),
            error,
        }])
    }
}

/// Replays queued events, then reports the stream as closed
#[derive(Default)]
pub struct FakeEvents {
    pub queue: VecDeque<Result<WindowEvent>>,
}

impl FakeEvents {
    pub fn new(events: impl IntoIterator<Item = WindowEvent>) -> Self {
        Self {
            queue: events.into_iter().map(Ok).collect(),
        }
    }
}

impl EventSource for FakeEvents {
    async fn next_event(&mut self) -> Result<Option<WindowEvent>> {
        self.queue.pop_front().transpose()
    }
}
