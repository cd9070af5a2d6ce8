//! Background purge of idle conversations.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::session::SessionStore;

/// Drops expired sessions every `interval`.
pub fn spawn_session_purge(sessions: Arc<SessionStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let purged = sessions.purge_expired();
            debug!(purged, remaining = sessions.len(), "Session purge finished");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: The purge task drops sessions idle longer than the TTL.**
    #[tokio::test]
    async fn test_session_purge_task() {
        let sessions = Arc::new(SessionStore::new(Duration::from_millis(10)));
        drop(sessions.lock(1).await);
        assert_eq!(sessions.len(), 1);

        let handle = spawn_session_purge(sessions.clone(), Duration::from_millis(30));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(sessions.is_empty());
    }
}
