//! Outbound notifications, fired after a successful create.

pub mod mail;

pub use mail::{HttpMailer, NullMailer};

use async_trait::async_trait;

/// Delivery hook for notification mails.
///
/// Callers treat delivery as fire-and-forget: a failing hook is logged and
/// never changes the outcome of the operation that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> anyhow::Result<()>;
}
