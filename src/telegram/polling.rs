//! Pull-style delivery: long-polling `getUpdates`.

use std::sync::Arc;
use std::time::Duration;

use super::client::TelegramClient;
use super::dispatch::dispatch;
use crate::dialog::DialogController;

/// Pause before asking again after a failed poll.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Poll until Ctrl-C.
///
/// Updates are handled one after another in the order Telegram returns them,
/// so every chat sees its messages processed in arrival order.
pub async fn run(client: Arc<TelegramClient>, controller: Arc<DialogController>, timeout_secs: u64) {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut offset: Option<i64> = None;
    log::info!("Polling for updates (timeout {}s)", timeout_secs);

    loop {
        let updates = tokio::select! {
            _ = &mut shutdown => {
                log::info!("Shutdown requested, polling stopped");
                return;
            }
            result = client.get_updates(offset, timeout_secs) => result,
        };

        match updates {
            Ok(updates) => {
                for update in updates {
                    offset = Some(update.update_id + 1);
                    dispatch(&controller, update).await;
                }
            }
            Err(e) => {
                log::error!("Failed to fetch updates: {}", e);
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}
