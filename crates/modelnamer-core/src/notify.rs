//! Operator notifications for generation failures.
//!
//! Failures of the naming service never stop a run, but someone should know
//! the credential stopped working. The GitHub Actions notifier prints a
//! workflow `::warning` annotation mentioning a configured user.

#[cfg(test)]
use mockall::automock;
use tracing::warn;

/// One-way, best-effort notification channel.
#[cfg_attr(test, automock)]
pub trait Notifier: Send + Sync {
    /// Report a problem. Must not block or fail.
    fn notify(&self, message: &str);
}

/// Title used for every annotation.
const ANNOTATION_TITLE: &str = "APIpie API Key Issue";

/// Emits GitHub Actions workflow annotations on stdout.
///
/// Does nothing unless a user to mention is configured.
#[derive(Debug, Clone, Default)]
pub struct GithubActionsNotifier {
    user: Option<String>,
}

impl GithubActionsNotifier {
    pub fn new(user: Option<String>) -> Self {
        Self {
            user: user.filter(|u| !u.trim().is_empty()),
        }
    }

    /// Render the annotation line for `message`, if a user is configured.
    pub fn annotation(&self, message: &str) -> Option<String> {
        let user = self.user.as_ref()?;
        // Annotations are single-line; keep the first line of multi-line bodies
        let message = message.lines().next().unwrap_or_default();
        Some(format!("::warning title={ANNOTATION_TITLE}::@{user} {message}"))
    }
}

impl Notifier for GithubActionsNotifier {
    fn notify(&self, message: &str) {
        if let Some(line) = self.annotation(message) {
            println!("{line}");
            warn!(user = ?self.user, "GitHub notification: {message}");
        }
    }
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _message: &str) {}
}
