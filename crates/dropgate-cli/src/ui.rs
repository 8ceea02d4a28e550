//! UI utilities for Dropgate CLI.

use dropgate_core::notification::{
    Notification, NotificationCategory, NotificationCenter, PermissionStatus,
};

const BOX_WIDTH: usize = 44;

/// A formatted box for displaying a notification.
pub struct NotificationBox<'a> {
    notification: &'a Notification,
}

impl<'a> NotificationBox<'a> {
    /// Create a new notification box.
    #[must_use]
    pub const fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }

    /// Lines inside the box, without borders.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let n = self.notification;
        let mut lines = vec![n.title.clone()];
        if let Some(subtitle) = &n.subtitle {
            lines.push(subtitle.clone());
        }
        lines.push(n.body.clone());

        let actions = n.category.actions();
        if !actions.is_empty() {
            let buttons = actions
                .iter()
                .map(|a| format!("[{}]", a.title()))
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(String::new());
            lines.push(buttons);
        }
        lines
    }

    /// Display the box to stdout.
    pub fn display(&self) {
        let marker = match self.notification.category {
            NotificationCategory::IncomingTransfer => "?",
            NotificationCategory::Info => "i",
            NotificationCategory::Error => "!",
        };

        println!("  ┌{}┐", "─".repeat(BOX_WIDTH));
        for (index, line) in self.lines().iter().enumerate() {
            let prefix = if index == 0 { marker } else { " " };
            let content = truncate(&format!("{} {}", prefix, line), BOX_WIDTH - 2);
            println!("  │ {} │", pad_right(&content, BOX_WIDTH - 2));
        }
        println!("  └{}┘", "─".repeat(BOX_WIDTH));
        println!("    id: {}", self.notification.identifier);
        println!();
    }
}

fn pad_right(content: &str, width: usize) -> String {
    let len = content.chars().count();
    format!("{}{}", content, " ".repeat(width.saturating_sub(len)))
}

fn truncate(content: &str, width: usize) -> String {
    if content.chars().count() <= width {
        return content.to_string();
    }
    let mut out: String = content.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// [`NotificationCenter`] that prints to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotificationCenter {
    quiet: bool,
}

impl TerminalNotificationCenter {
    /// Create a center; a quiet one prints nothing.
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl NotificationCenter for TerminalNotificationCenter {
    fn request_authorization(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn add(&self, notification: Notification) {
        if !self.quiet {
            NotificationBox::new(&notification).display();
        }
    }

    fn remove_delivered(&self, identifiers: &[String]) {
        if !self.quiet {
            for id in identifiers {
                println!("  - withdrawn {}", id);
            }
        }
    }

    fn remove_all_delivered(&self) {
        if !self.quiet {
            println!("  - withdrawn all notifications");
        }
    }
}

/// Format a byte count for display.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    #[allow(clippy::cast_precision_loss)]
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(category: NotificationCategory) -> Notification {
        Notification {
            identifier: "transfer_t1".to_string(),
            transfer_id: "t1".to_string(),
            title: "Dropgate".to_string(),
            subtitle: Some("PIN: 482913".to_string()),
            body: "Pixel is sending you photo.jpg".to_string(),
            category,
            sound: true,
        }
    }

    #[test]
    fn test_prompt_lines_include_buttons() {
        let n = notification(NotificationCategory::IncomingTransfer);
        let lines = NotificationBox::new(&n).lines();
        assert_eq!(lines[1], "PIN: 482913");
        assert_eq!(lines.last().unwrap(), "[Accept]  [Decline]");
    }

    #[test]
    fn test_info_lines_have_no_buttons() {
        let n = notification(NotificationCategory::Info);
        let lines = NotificationBox::new(&n).lines();
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_truncate_and_pad() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(pad_right("hi", 5), "hi   ");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
