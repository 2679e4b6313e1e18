//! Process ancestry
//!
//! Walks the parent chain of a process through procfs. Processes exit all the
//! time while we look at them, so a missing or unreadable record simply ends
//! the walk.

use std::fs;
use std::path::{Path, PathBuf};

/// Layout of the per-process status record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatFormat {
    /// Linux `/proc/<pid>/stat`: `pid (comm) state ppid ...`
    Linux,
    /// BSD procfs `/proc/<pid>/status`: `comm pid ppid ...`
    Bsd,
}

impl StatFormat {
    fn file_name(self) -> &'static str {
        match self {
            StatFormat::Linux => "stat",
            StatFormat::Bsd => "status",
        }
    }

    fn parse_ppid(self, record: &str) -> Option<u32> {
        match self {
            // comm may contain spaces and parentheses; it always ends at the last ')'
            StatFormat::Linux => {
                let (_, rest) = record.rsplit_once(')')?;
                rest.split_whitespace().nth(1)?.parse().ok()
            }
            StatFormat::Bsd => record.split_whitespace().nth(2)?.parse().ok(),
        }
    }
}

/// Handle on a procfs mount
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
    format: StatFormat,
}

impl ProcFs {
    /// Open `root`, detecting the record format from our own entry
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let own_stat = root.join(std::process::id().to_string()).join("stat");
        let format = if fs::File::open(own_stat).is_ok() {
            StatFormat::Linux
        } else {
            StatFormat::Bsd
        };
        Self::with_format(root, format)
    }

    pub fn with_format(root: impl Into<PathBuf>, format: StatFormat) -> Self {
        Self {
            root: root.into(),
            format,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn format(&self) -> StatFormat {
        self.format
    }

    /// Parent pid of `pid`, or `None` if the record is gone or malformed
    pub fn parent_of(&self, pid: u32) -> Option<u32> {
        let path = self
            .root
            .join(pid.to_string())
            .join(self.format.file_name());
        let record = fs::read_to_string(path).ok()?;
        self.format.parse_ppid(&record)
    }

    /// Lazily walk from `pid` up through its ancestors
    pub fn ancestry(&self, pid: u32) -> Ancestry<'_> {
        Ancestry {
            procfs: self,
            next: (pid != 0).then_some(pid),
            last: None,
        }
    }
}

/// Iterator over a process and its ancestors, nearest first.
///
/// The parent of the last yielded pid is only read when the next item is
/// requested.
#[derive(Debug)]
pub struct Ancestry<'a> {
    procfs: &'a ProcFs,
    next: Option<u32>,
    last: Option<u32>,
}

impl Iterator for Ancestry<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if let Some(last) = self.last.take() {
            self.next = self
                .procfs
                .parent_of(last)
                .filter(|&ppid| ppid != 0 && ppid != last);
        }

        let pid = self.next.take()?;
        self.last = Some(pid);
        Some(pid)
    }
}
