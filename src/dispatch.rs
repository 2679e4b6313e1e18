//! Event dispatch loop
//!
//! Pulls one window event at a time and runs its handler to completion
//! before asking for the next one.

use nomz_ipc::{IpcError, WindowChange, WindowEvent};
use tracing::{debug, error, info, warn};

use crate::ipc::{CommandRunner, EventSource, WindowTreeQuery};
use crate::swallow::Swallower;

/// Which handler an event goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Swallow,
    Unswallow,
    Ignore,
}

pub fn route(event: &WindowEvent) -> Route {
    match event.change {
        WindowChange::New => Route::Swallow,
        WindowChange::Close => Route::Unswallow,
        _ => Route::Ignore,
    }
}

/// Owns the event source, the command connection and all swallowing state
pub struct Dispatcher<E, W> {
    events: E,
    wm: W,
    swallower: Swallower,
}

impl<E, W> Dispatcher<E, W>
where
    E: EventSource,
    W: WindowTreeQuery + CommandRunner,
{
    pub fn new(events: E, wm: W, swallower: Swallower) -> Self {
        Self {
            events,
            wm,
            swallower,
        }
    }

    pub fn swallower(&self) -> &Swallower {
        &self.swallower
    }

    /// Process events until the window manager closes the stream
    pub async fn run(&mut self) -> Result<(), IpcError> {
        loop {
            let event = match self.events.next_event().await {
                Ok(Some(event)) => event,
                Ok(None) => {
                    info!("Window manager closed the event stream");
                    return Ok(());
                }
                // The bad frame is already consumed, the stream is still usable
                Err(IpcError::Json(e)) => {
                    warn!("Failed to decode window event: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            self.dispatch(event).await;
        }
    }

    async fn dispatch(&mut self, event: WindowEvent) {
        let window = &event.container;
        let (action, result) = match route(&event) {
            Route::Swallow => (
                "swallow",
                self.swallower.on_new_window(&mut self.wm, window).await,
            ),
            Route::Unswallow => (
                "unswallow",
                self.swallower.on_window_close(&mut self.wm, window).await,
            ),
            Route::Ignore => {
                debug!(change = ?event.change, window = window.id, "ignoring event");
                return;
            }
        };

        match result {
            Ok(()) => debug!(
                window = window.id,
                swallowed = self.swallower().registry().len(),
                "{} handled",
                action
            ),
            Err(e) => error!(
                window = window.id,
                app_id = window.app_id().unwrap_or_default(),
                launcher = ?e.launcher(),
                "Failed to {} window: {}",
                action,
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proc::tests::fake_procfs;
    use crate::registry::LauncherSet;
    use crate::testing::{event, window, workspace, FakeEvents, FakeWm};

    const PROCS: &[(u32, u32)] = &[(1, 0), (100, 1), (150, 100), (200, 150), (201, 150)];

    fn foot() -> nomz_ipc::Node {
        let mut foot = window(10, 100, "foot");
        foot.geometry.width = 640;
        foot.geometry.height = 480;
        foot
    }

    #[test]
    fn test_route() {
        let win = window(1, 1, "foot");
        assert_eq!(route(&event(WindowChange::New, win.clone())), Route::Swallow);
        assert_eq!(route(&event(WindowChange::Close, win.clone())), Route::Unswallow);
        assert_eq!(route(&event(WindowChange::Focus, win.clone())), Route::Ignore);
        assert_eq!(route(&event(WindowChange::Unknown, win)), Route::Ignore);
    }

    #[tokio::test]
    async fn test_round_trip_through_dispatcher() {
        let (_dir, procfs) = fake_procfs(PROCS);
        let mpv = window(20, 200, "mpv");
        let events = FakeEvents::new([
            event(WindowChange::New, mpv.clone()),
            event(WindowChange::Focus, mpv.clone()),
            event(WindowChange::Close, mpv.clone()),
        ]);
        let wm = FakeWm::new(workspace(vec![foot(), mpv]));
        let swallower = Swallower::new(LauncherSet::new(["foot".to_string()]), procfs);

        let mut dispatcher = Dispatcher::new(events, wm, swallower);
        dispatcher.run().await.unwrap();

        let issued: Vec<&str> = dispatcher.wm.commands.iter().map(|(_, c)| c.as_str()).collect();
        assert_eq!(
            issued,
            vec![
                "swap container with con_id 10",
                "mark --add _nomz_10",
                "floating enable",
                "move position -1280 px -960 px",
                "floating disable",
                "move container to mark _nomz_10",
                "focus",
            ]
        );
        assert_eq!(dispatcher.swallower().registry().len(), 0);
    }

    #[tokio::test]
    async fn test_handler_failure_keeps_loop_running() {
        let (_dir, procfs) = fake_procfs(PROCS);
        let mpv = window(20, 200, "mpv");
        let imv = window(21, 201, "imv");
        let events = FakeEvents::new([
            event(WindowChange::New, mpv.clone()),
            event(WindowChange::New, imv.clone()),
        ]);
        let mut wm = FakeWm::new(workspace(vec![foot(), mpv, imv]));
        wm.reject("swap container", "no such container");
        let swallower = Swallower::new(LauncherSet::new(["foot".to_string()]), procfs);

        let mut dispatcher = Dispatcher::new(events, wm, swallower);
        dispatcher.run().await.unwrap();

        // both events reached the engine, neither was recorded
        assert_eq!(dispatcher.wm.tree_queries, 2);
        assert_eq!(dispatcher.wm.commands.len(), 2);
        assert_eq!(dispatcher.swallower().registry().len(), 0);
    }

    #[tokio::test]
    async fn test_malformed_event_skipped_fatal_error_returned() {
        let (_dir, procfs) = fake_procfs(PROCS);
        let json_err = serde_json::from_str::<WindowEvent>("{").unwrap_err();
        let mut events = FakeEvents::default();
        events.queue.push_back(Err(IpcError::Json(json_err)));
        events.queue.push_back(Err(IpcError::BadMagic));
        let wm = FakeWm::new(workspace(vec![foot()]));
        let swallower = Swallower::new(LauncherSet::new(["foot".to_string()]), procfs);

        let mut dispatcher = Dispatcher::new(events, wm, swallower);
        let err = dispatcher.run().await.unwrap_err();
        assert!(matches!(err, IpcError::BadMagic));
    }
}
