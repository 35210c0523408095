use std::io::Write;

use anyhow::Result;

pub const COMPLETION_TITLE: &str = "Deep Work Session Complete!";
pub const COMPLETION_BODY: &str = "Take a break and recharge!";

/// Side channel for telling the user a session is over. Delivery is best effort; callers log
/// failures and carry on.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> Result<()>;
}

/// Rings the terminal bell and prints the notification to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "\x07{title} {body}")?;
        stderr.flush()?;
        Ok(())
    }
}

pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _title: &str, _body: &str) -> Result<()> {
        Ok(())
    }
}
