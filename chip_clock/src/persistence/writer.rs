//! Debounced background writer.

use super::{snapshot::PersistedState, storage::StateStorage};
use std::sync::Arc;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Duration, Instant, sleep_until},
};

/// Sender side of the persistence task
#[derive(Clone)]
pub struct PersistenceHandle {
    sender: Arc<watch::Sender<Option<PersistedState>>>,
}

impl PersistenceHandle {
    /// Hand the latest snapshot to the writer, replacing any snapshot it has
    /// not written yet. Never waits on storage. Returns false once the
    /// writer is gone.
    pub fn persist(&self, state: PersistedState) -> bool {
        self.sender.send(Some(state)).is_ok()
    }
}

/// Spawn the writer task.
///
/// The first snapshot after a quiet period opens a `debounce` window; only
/// the latest snapshot received in that window is written when it closes.
/// Once every handle is dropped the pending snapshot is flushed and the task
/// exits.
pub fn spawn_writer<S>(storage: Arc<S>, debounce: Duration) -> (PersistenceHandle, JoinHandle<()>)
where
    S: StateStorage + 'static,
{
    let (sender, updates) = watch::channel(None);
    let task = tokio::spawn(run_writer(storage, updates, debounce));
    (
        PersistenceHandle {
            sender: Arc::new(sender),
        },
        task,
    )
}

async fn run_writer<S>(
    storage: Arc<S>,
    mut updates: watch::Receiver<Option<PersistedState>>,
    debounce: Duration,
) where
    S: StateStorage + ?Sized,
{
    // set while a snapshot is waiting to be written
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            changed = updates.changed() => match changed {
                Ok(()) => {
                    deadline.get_or_insert_with(|| Instant::now() + debounce);
                }
                Err(_) => break,
            },

            _ = wait_for(deadline) => {
                deadline = None;
                let latest = updates.borrow_and_update().clone();
                if let Some(state) = latest {
                    write(storage.as_ref(), &state).await;
                }
            }
        }
    }

    if deadline.is_some() {
        let latest = updates.borrow().clone();
        if let Some(state) = latest {
            log::debug!("Flushing pending state before shutdown");
            write(storage.as_ref(), &state).await;
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Failures are logged; the next change retries with fresh state.
async fn write<S: StateStorage + ?Sized>(storage: &S, state: &PersistedState) {
    let result = match state.to_json() {
        Ok(json) => storage.write(&json).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => log::debug!("Saved tournament state"),
        Err(e) => log::error!("Failed to save tournament state: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{persistence::MemoryStorage, settings::AppSettings};

    fn state(sound: bool) -> PersistedState {
        let mut settings = AppSettings::default();
        settings.set_sound(sound);
        PersistedState {
            settings: Some(settings),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_into_one_write() {
        let storage = Arc::new(MemoryStorage::new());
        let (handle, _task) = spawn_writer(storage.clone(), Duration::from_millis(1000));

        for i in 0..5 {
            assert!(handle.persist(state(i % 2 == 0)));
        }
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(storage.write_count(), 1);
        let saved = PersistedState::from_json(&storage.contents().unwrap()).unwrap();
        assert_eq!(saved, state(true));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_written_before_window_closes() {
        let storage = Arc::new(MemoryStorage::new());
        let (handle, _task) = spawn_writer(storage.clone(), Duration::from_millis(1000));

        handle.persist(state(true));
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(storage.write_count(), 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_on_shutdown() {
        let storage = Arc::new(MemoryStorage::new());
        let (handle, task) = spawn_writer(storage.clone(), Duration::from_secs(60));

        handle.persist(state(false));
        drop(handle);
        task.await.unwrap();

        assert_eq!(storage.write_count(), 1);
        let saved = PersistedState::from_json(&storage.contents().unwrap()).unwrap();
        assert_eq!(saved, state(false));
    }
}
