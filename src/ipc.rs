//! Window manager capabilities used by the engines
//!
//! The engines only see these traits; `nomz_ipc` provides the socket-backed
//! implementations and tests provide in-memory ones.

use nomz_ipc::{CommandOutcome, Connection, EventStream, Node, Result, WindowEvent};

/// Fetch the current layout tree
pub trait WindowTreeQuery {
    async fn get_tree(&mut self) -> Result<Node>;
}

/// Run a command against one container
pub trait CommandRunner {
    async fn run_command(&mut self, target: i64, command: &str) -> Result<Vec<CommandOutcome>>;
}

/// Stream of window notifications; `None` when the window manager goes away
pub trait EventSource {
    async fn next_event(&mut self) -> Result<Option<WindowEvent>>;
}

impl WindowTreeQuery for Connection {
    async fn get_tree(&mut self) -> Result<Node> {
        Connection::get_tree(self).await
    }
}

impl CommandRunner for Connection {
    async fn run_command(&mut self, target: i64, command: &str) -> Result<Vec<CommandOutcome>> {
        Connection::run_command(self, target, command).await
    }
}

impl EventSource for EventStream {
    async fn next_event(&mut self) -> Result<Option<WindowEvent>> {
        EventStream::next_event(self).await
    }
}
