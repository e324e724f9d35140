//! Toast area: prints controller notifications to the terminal, colored by
//! severity. One line per notification, no suppression, no duplication.

use crate::domain::{Notification, Severity};
use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{Write, stdout};
use tokio::sync::mpsc;

fn severity_style(severity: Severity) -> (&'static str, Color) {
    match severity {
        Severity::Success => ("SUCCESS", Color::Green),
        Severity::Info => ("INFO", Color::Cyan),
        Severity::Warn => ("WARN", Color::Yellow),
        Severity::Error => ("ERROR", Color::Red),
    }
}

pub fn print_toast(notification: &Notification) {
    let (tag, color) = severity_style(notification.severity);
    let mut out = stdout();
    let _ = out.execute(SetForegroundColor(color));
    let _ = out.execute(Print(format!(
        "[{tag}] {}: {}\r\n",
        notification.summary, notification.detail
    )));
    let _ = out.execute(ResetColor);
    let _ = out.flush();
}

/// Drains the notification channel until the controller side is dropped.
/// Spawn this once at startup.
pub async fn run_printer(mut rx: mpsc::UnboundedReceiver<Notification>) {
    while let Some(notification) = rx.recv().await {
        print_toast(&notification);
    }
}
