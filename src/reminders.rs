// src/reminders.rs - Reminder scanning and the minute-grain scheduler
use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{debug, error, info};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};

use crate::{Config, Note, NoteStore, NotesError, Result};

/// A due reminder, carrying what a notifier needs to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEvent {
    pub note_id: i64,
    pub title: String,
    pub content: String,
}

/// Delivery sink for due reminders.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &ReminderEvent);
}

/// Drops every event. Used when notification permission was declined: the
/// scan stays active but delivery is skipped.
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _event: &ReminderEvent) {}
}

/// Writes reminders to stderr with a terminal bell.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, event: &ReminderEvent) {
        eprintln!(
            "\x07🔔 {} {}\n   {}",
            console::style("Hatırlatma:").yellow().bold(),
            console::style(&event.title).bold(),
            event.content
        );
    }
}

/// Returns the reminders due at the given moment.
///
/// A note is due when it carries a reminder time, its owning date is the
/// current day, and its time equals the current minute textually. The scan
/// keeps no state across invocations; the minute grain of the scheduler is
/// what keeps a reminder from firing twice.
pub fn scan_due(notes: &[Note], now: DateTime<Local>) -> Vec<ReminderEvent> {
    let today = now.date_naive();
    let current_minute = now.format("%H:%M").to_string();

    notes
        .iter()
        .filter(|note| {
            note.date == today && note.time.as_deref() == Some(current_minute.as_str())
        })
        .map(|note| ReminderEvent {
            note_id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub enum ScannerCommand {
    /// Stop the reminder scanner
    Stop,
}

/// Drives the reminder scan once a minute on a background task.
pub struct ReminderScheduler {
    /// Configuration used to reload the collection each tick
    config: Config,

    /// Channel to send commands to the scanner task
    command_tx: mpsc::Sender<ScannerCommand>,

    /// Handle to the scanner task
    scanner_task: Option<JoinHandle<()>>,

    /// Delivery sink for due reminders
    notifier: Arc<dyn Notifier>,
}

impl ReminderScheduler {
    /// Create a new reminder scheduler with the provided config
    pub fn new(config: Config, notifier: Arc<dyn Notifier>) -> Self {
        debug!("Initializing reminder scheduler");
        let (command_tx, _) = mpsc::channel(10);

        Self {
            config,
            command_tx,
            scanner_task: None,
            notifier,
        }
    }

    pub fn is_running(&self) -> bool {
        self.scanner_task.is_some()
    }

    /// Starts the scan loop. The interval's first tick completes at once,
    /// which gives the startup scan; after that it fires once a minute.
    pub fn start(&mut self) -> Result<()> {
        if self.scanner_task.is_some() {
            debug!("Reminder scheduler already running");
            return Ok(());
        }
        info!("Starting reminder scheduler...");

        let (command_tx, mut command_rx) = mpsc::channel(10);
        self.command_tx = command_tx;

        let config = self.config.clone();
        let notifier = Arc::clone(&self.notifier);

        let task = tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(60));

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        scan_and_deliver(&config, notifier.as_ref());
                    }
                    Some(cmd) = command_rx.recv() => match cmd {
                        ScannerCommand::Stop => {
                            info!("Reminder scheduler stopping...");
                            break;
                        }
                    }
                }
            }
        });

        self.scanner_task = Some(task);
        Ok(())
    }

    /// Stop the reminder scheduler if it's running
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.scanner_task.take() {
            // Send stop command to the scanner task
            if let Err(e) = self.command_tx.send(ScannerCommand::Stop).await {
                error!("Failed to send stop command to reminder scheduler: {}", e);
            }

            // Wait for the task to complete
            if let Err(e) = task.await {
                let error_msg = format!("Failed to stop reminder scheduler: {}", e);
                error!("{}", error_msg);
                return Err(NotesError::ApplicationError { message: error_msg });
            }

            info!("Reminder scheduler stopped");
        } else {
            debug!("Reminder scheduler is not running");
        }

        Ok(())
    }
}

/// One scan pass: reload the collection so notes added by other
/// invocations are seen, then deliver whatever is due.
fn scan_and_deliver(config: &Config, notifier: &dyn Notifier) {
    let store = match NoteStore::load(config.clone()) {
        Ok(store) => store,
        Err(e) => {
            error!("Reminder scan could not load the collection: {}", e);
            return;
        }
    };

    let now = Local::now();
    let due = scan_due(store.notes(), now);
    if due.is_empty() {
        debug!("Reminder scan at {}: nothing due", now.format("%H:%M"));
        return;
    }

    info!("Reminder scan at {}: {} due", now.format("%H:%M"), due.len());
    for event in &due {
        notifier.notify(event);
    }
}
