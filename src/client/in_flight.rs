use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Busy flag for one user action.
///
/// `try_begin` hands out at most one guard at a time; the flag clears when the
/// guard drops, whether the action succeeded, failed or was abandoned.
#[derive(Clone, Debug, Default)]
pub struct InFlight {
    busy: Arc<AtomicBool>,
}

#[derive(Debug)]
pub struct InFlightGuard {
    busy: Arc<AtomicBool>,
}

impl InFlight {
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
