//! services/companion/src/app/guard.rs
//!
//! Guards the stores against responses that arrive after the user has left
//! the screen that requested them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Issued when a request starts; checked before its response is applied.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolves once the screen this ticket belongs to has been left.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

/// Tracks the current screen generation.
#[derive(Debug, Default)]
pub struct ScreenGuard {
    generation: AtomicU64,
    token: Mutex<CancellationToken>,
}

impl ScreenGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ticket for a request issued from the current screen.
    pub fn ticket(&self) -> Ticket {
        // Generation and token are read under the same lock `leave_screen` holds.
        let token = self.lock_token();
        Ticket {
            generation: self.generation.load(Ordering::SeqCst),
            token: token.clone(),
        }
    }

    /// Marks the current screen as left: in-flight requests are cancelled and
    /// any response still holding an older ticket is discarded.
    pub fn leave_screen(&self) {
        let mut token = self.lock_token();
        self.generation.fetch_add(1, Ordering::SeqCst);
        token.cancel();
        *token = CancellationToken::new();
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation.load(Ordering::SeqCst) && !ticket.token.is_cancelled()
    }

    fn lock_token(&self) -> std::sync::MutexGuard<'_, CancellationToken> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Runs `future` unless the ticket's screen is left first.
pub async fn run_guarded<F, T>(ticket: &Ticket, future: F) -> Option<T>
where
    F: std::future::Future<Output = T>,
{
    tokio::select! {
        _ = ticket.cancelled() => None,
        value = future => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn leaving_invalidates_older_tickets() {
        let guard = ScreenGuard::new();
        let first = guard.ticket();
        assert!(guard.is_current(&first));

        guard.leave_screen();
        assert!(!guard.is_current(&first));

        let second = guard.ticket();
        assert!(guard.is_current(&second));
        assert_eq!(second.generation(), first.generation() + 1);
    }

    #[test]
    fn tickets_stay_consistent_while_screens_change() {
        let guard = std::sync::Arc::new(ScreenGuard::new());
        let leaver = {
            let guard = guard.clone();
            std::thread::spawn(move || {
                for _ in 0..20_000 {
                    guard.leave_screen();
                }
            })
        };

        for _ in 0..20_000 {
            let ticket = guard.ticket();
            // A cancelled token always belongs to a generation already left.
            if ticket.token.is_cancelled() {
                assert_ne!(ticket.generation(), guard.generation.load(Ordering::SeqCst));
            }
        }
        leaver.join().unwrap();

        let fresh = guard.ticket();
        assert!(guard.is_current(&fresh));
        assert!(!fresh.token.is_cancelled());
    }

    #[tokio::test]
    async fn guarded_future_completes_while_on_screen() {
        let guard = ScreenGuard::new();
        let ticket = guard.ticket();
        assert_eq!(run_guarded(&ticket, async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn leaving_abandons_in_flight_future() {
        let guard = std::sync::Arc::new(ScreenGuard::new());
        let ticket = guard.ticket();

        let leaver = guard.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            leaver.leave_screen();
        });

        let result = run_guarded(&ticket, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "late"
        })
        .await;
        assert_eq!(result, None);
    }
}
