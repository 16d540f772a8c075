use crate::key_path_store::path::StorePath;

/// Handle to a live change subscription.
///
/// The registration is released exactly once: by [`Subscription::unsubscribe`]
/// or, on any other exit path, when the handle is dropped.
pub struct Subscription {
    path: StorePath,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(path: StorePath, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            path,
            release: Some(Box::new(release)),
        }
    }

    pub fn path(&self) -> &StorePath {
        &self.path
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            tracing::debug!(path = %self.path, "releasing subscription");
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("path", &self.path)
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_release_runs_once_on_unsubscribe() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();

        let subscription = Subscription::new(StorePath::farms(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        subscription.unsubscribe();

        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_runs_on_drop() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();

        {
            let _subscription = Subscription::new(StorePath::farms(), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}
