use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::ProbeConfig;

use super::RequestTask;

/// Hands out the process's single [`RequestTask`].
pub struct RequestLatch {
    spent: AtomicBool,
}

impl RequestLatch {
    pub const fn new() -> Self {
        Self {
            spent: AtomicBool::new(false),
        }
    }

    pub fn arm<'a>(&self, config: &ProbeConfig<'a>) -> Option<RequestTask<'a>> {
        if self.spent.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(RequestTask::new(config))
    }

    pub fn is_spent(&self) -> bool {
        self.spent.load(Ordering::Acquire)
    }
}

impl Default for RequestLatch {
    fn default() -> Self {
        Self::new()
    }
}
