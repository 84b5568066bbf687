use std::sync::{Condvar, Mutex, PoisonError};

/// Counts outstanding jobs and lets one thread block until they are all done.
///
/// No user code runs while the counter lock is held, so a poisoned lock still
/// holds a valid count and is simply recovered.
#[derive(Debug, Default)]
pub struct WaitGroup {
    pending: Mutex<usize>,
    all_done: Condvar,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `count` more jobs.
    pub fn add(&self, count: usize) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        *pending += count;
    }

    /// Mark one job as finished.
    pub fn done(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        debug_assert!(*pending > 0, "WaitGroup::done called more often than add");
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.all_done.notify_all();
        }
    }

    /// Block until every registered job has called `done`.
    pub fn wait(&self) {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let _pending = self
            .all_done
            .wait_while(pending, |pending| *pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    pub fn pending(&self) -> usize {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_wait_returns_immediately_when_empty() {
        let group = WaitGroup::new();
        group.wait();
        assert_eq!(group.pending(), 0);
    }

    #[test]
    fn test_wait_blocks_until_done() {
        let group = Arc::new(WaitGroup::new());
        group.add(4);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let group = Arc::clone(&group);
                thread::spawn(move || group.done())
            })
            .collect();

        group.wait();
        assert_eq!(group.pending(), 0);

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
