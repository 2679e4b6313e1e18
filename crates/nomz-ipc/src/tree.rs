//! Layout tree as returned by GET_TREE

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Rectangle in layout coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// X11 properties, only present on Xwayland (sway) or i3 windows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowProperties {
    #[serde(default)]
    pub class: Option<String>,
}

/// A container, window, workspace or output in the layout tree
///
/// The tree is an owned value fetched fresh per event; parents are found by
/// searching from the root rather than through back-references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    #[serde(default)]
    pub pid: Option<u32>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub window_properties: Option<WindowProperties>,
    #[serde(default)]
    pub geometry: Rect,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub floating_nodes: Vec<Node>,
}

impl Node {
    /// Application identifier: Wayland `app_id`, else the X11 window class
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref().or_else(|| {
            self.window_properties
                .as_ref()
                .and_then(|props| props.class.as_deref())
        })
    }

    fn children(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().chain(self.floating_nodes.iter())
    }

    /// Breadth-first walk over all descendants (excluding `self`).
    ///
    /// Each level visits tiled children before floating children, in the
    /// order the window manager reported them. This order decides which
    /// window wins when several share a pid.
    pub fn descendants(&self) -> impl Iterator<Item = &Node> {
        let mut queue: VecDeque<&Node> = self.children().collect();
        std::iter::from_fn(move || {
            let node = queue.pop_front()?;
            queue.extend(node.children());
            Some(node)
        })
    }

    /// Find a node by container id, including `self`
    pub fn find_by_id(&self, id: i64) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.descendants().find(|node| node.id == id)
    }

    /// All descendants owned by `pid`, in breadth-first order
    pub fn find_by_pid(&self, pid: u32) -> Vec<&Node> {
        self.descendants()
            .filter(|node| node.pid == Some(pid))
            .collect()
    }

    /// The container directly holding `id`
    pub fn parent_of(&self, id: i64) -> Option<&Node> {
        if self.children().any(|child| child.id == id) {
            return Some(self);
        }
        self.descendants()
            .find(|node| node.children().any(|child| child.id == id))
    }
}

/// One entry of a RUN_COMMAND reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}
