//! Notifier implementations for the console.

use chrono::{DateTime, Local};
use mealboard_client::Notifier;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub at: DateTime<Local>,
}

impl Notice {
    fn now(kind: NoticeKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
            at: Local::now(),
        }
    }
}

/// Feeds client notifications into the interactive event loop.
pub struct ChannelNotifier {
    tx: UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new(tx: UnboundedSender<Notice>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn success(&self, message: &str) {
        let _ = self.tx.send(Notice::now(NoticeKind::Success, message));
    }

    fn error(&self, message: &str) {
        let _ = self.tx.send(Notice::now(NoticeKind::Error, message));
    }
}

/// Plain stdout/stderr notifier for the non-interactive subcommands.
pub struct PrintNotifier;

impl Notifier for PrintNotifier {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("{message}");
    }
}
