//! Lockdown driver task and its handle
//!
//! The driver owns a [`LockdownMonitor`] on a single tokio task. Commands,
//! host events and timer firings all arrive over channels and are handled
//! one at a time, so the monitor never needs a lock.

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use super::bridge::TimerBridge;
use crate::document::{Document, TimerTask};
use crate::error::DriverError;
use crate::events::{Dispatch, DocumentEvent, MonitorEvent};
use crate::lockdown::{
    LockdownMonitor, LockdownOptions, LockdownSettings, MonitorSnapshot, SessionReport,
};

/// Capacity of the command channel
const COMMAND_CAPACITY: usize = 64;

/// Capacity of the monitor event broadcast
const EVENT_CAPACITY: usize = 256;

enum DriverCommand {
    Start(oneshot::Sender<MonitorSnapshot>),
    Stop(oneshot::Sender<Option<SessionReport>>),
    Event {
        event: DocumentEvent,
        reply: oneshot::Sender<Dispatch>,
    },
    Snapshot(oneshot::Sender<MonitorSnapshot>),
    Shutdown,
}

/// Runs a lockdown monitor on a tokio task
pub struct LockdownDriver<D: Document> {
    monitor: LockdownMonitor<TimerBridge<D>>,
    commands: mpsc::Receiver<DriverCommand>,
    timers: mpsc::UnboundedReceiver<TimerTask>,
    events: broadcast::Sender<MonitorEvent>,
}

impl<D> LockdownDriver<D>
where
    D: Document + Send + 'static,
{
    /// Spawn a driver for `document` on the current runtime
    ///
    /// The monitor's callbacks publish [`MonitorEvent`]s on the handle's
    /// broadcast channel. The task ends on [`DriverHandle::shutdown`] or
    /// when every handle is dropped, stopping any active lockdown first.
    pub fn spawn(document: D, settings: LockdownSettings) -> (DriverHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let options = Self::publishing_options(settings, &event_tx);
        let monitor = LockdownMonitor::new(TimerBridge::new(document, timer_tx), options);

        let driver = Self {
            monitor,
            commands: command_rx,
            timers: timer_rx,
            events: event_tx.clone(),
        };
        let task = tokio::spawn(driver.run());

        let handle = DriverHandle {
            commands: command_tx,
            events: event_tx,
        };
        (handle, task)
    }

    fn publishing_options(
        settings: LockdownSettings,
        events: &broadcast::Sender<MonitorEvent>,
    ) -> LockdownOptions {
        let tab_switch = events.clone();
        let fullscreen_exit = events.clone();
        let max_violations = events.clone();

        LockdownOptions::from_settings(settings)
            .on_tab_switch(move |violation| {
                let _ = tab_switch.send(MonitorEvent::Violation {
                    violation: violation.clone(),
                });
            })
            .on_fullscreen_exit(move |violation| {
                let _ = fullscreen_exit.send(MonitorEvent::Violation {
                    violation: violation.clone(),
                });
            })
            .on_max_violations(move |count| {
                let _ = max_violations.send(MonitorEvent::MaxViolationsReached { count });
            })
    }

    async fn run(mut self) {
        tracing::debug!("Lockdown driver started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(DriverCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(task) = self.timers.recv() => {
                    self.monitor.handle_event(DocumentEvent::Timer { task });
                }
            }
        }

        if let Some(report) = self.monitor.stop_lockdown() {
            self.emit(MonitorEvent::Unlocked {
                report: Box::new(report),
            });
        }
        tracing::debug!("Lockdown driver stopped");
    }

    fn handle_command(&mut self, command: DriverCommand) {
        match command {
            DriverCommand::Start(reply) => {
                let was_locked = self.monitor.is_locked();
                self.monitor.start_lockdown();
                let snapshot = self.monitor.snapshot();
                if !was_locked && let Some(session_id) = snapshot.session_id {
                    self.emit(MonitorEvent::Locked { session_id });
                }
                let _ = reply.send(snapshot);
            }
            DriverCommand::Stop(reply) => {
                let report = self.monitor.stop_lockdown();
                if let Some(report) = &report {
                    self.emit(MonitorEvent::Unlocked {
                        report: Box::new(report.clone()),
                    });
                }
                let _ = reply.send(report);
            }
            DriverCommand::Event { event, reply } => {
                let dispatch = self.monitor.handle_event(event.clone());
                if dispatch.is_prevented() {
                    self.emit(MonitorEvent::Suppressed { event });
                }
                let _ = reply.send(dispatch);
            }
            DriverCommand::Snapshot(reply) => {
                let _ = reply.send(self.monitor.snapshot());
            }
            DriverCommand::Shutdown => {}
        }
    }

    fn emit(&self, event: MonitorEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Cloneable handle to a running [`LockdownDriver`]
#[derive(Clone)]
pub struct DriverHandle {
    commands: mpsc::Sender<DriverCommand>,
    events: broadcast::Sender<MonitorEvent>,
}

impl DriverHandle {
    /// Start lockdown; returns the state right after the request
    pub async fn start(&self) -> Result<MonitorSnapshot, DriverError> {
        self.request(DriverCommand::Start).await
    }

    /// Stop lockdown; returns the finished session, if one was active
    pub async fn stop(&self) -> Result<Option<SessionReport>, DriverError> {
        self.request(DriverCommand::Stop).await
    }

    /// Deliver a host event and get back whether its default was prevented
    pub async fn dispatch(&self, event: DocumentEvent) -> Result<Dispatch, DriverError> {
        self.request(|reply| DriverCommand::Event { event, reply })
            .await
    }

    pub async fn snapshot(&self) -> Result<MonitorSnapshot, DriverError> {
        self.request(DriverCommand::Snapshot).await
    }

    /// Ask the driver to stop any lockdown and exit
    pub async fn shutdown(&self) -> Result<(), DriverError> {
        self.commands
            .send(DriverCommand::Shutdown)
            .await
            .map_err(|_| DriverError::Closed)
    }

    /// Subscribe to monitor events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.events.subscribe()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> DriverCommand,
    ) -> Result<T, DriverError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| DriverError::Closed)?;
        response.await.map_err(|_| DriverError::Closed)
    }
}
