use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{error, info};

use crate::ReportStore;

/// Spawns a task that purges expired reports every `interval`.
///
/// The first sweep runs immediately. Errors are logged and the loop goes on;
/// abort the handle to stop it.
pub fn spawn_sweeper(store: Arc<dyn ReportStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => info!(store = store.kind(), removed, "expired reports purged"),
                Err(err) => error!(store = store.kind(), error = %err, "report sweep failed"),
            }
        }
    })
}
