use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;

/// Seam for changing the caller's location; the hosting view supplies the
/// actual navigation.
pub trait Navigator: Send + Sync + 'static {
    fn navigate(&self, target: &str);
}

/// Handle to a pending post-success redirect. The timer gives the user time
/// to read the confirmation message; it must never outlive the hosting view,
/// so dropping the handle aborts it.
#[derive(Debug)]
pub struct ScheduledRedirect {
    target: String,
    handle: JoinHandle<()>,
}

impl ScheduledRedirect {
    pub(crate) fn schedule(
        navigator: Arc<dyn Navigator>,
        target: String,
        delay: Duration,
    ) -> Self {
        let task_target = target.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Scheduled redirect firing: {}", task_target);
            navigator.navigate(&task_target);
        });

        Self { target, handle }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for ScheduledRedirect {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
