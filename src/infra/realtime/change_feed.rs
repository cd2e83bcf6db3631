use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::models::change::ChangeEvent;
use crate::domain::ports::ChangeNotifier;

/// In-process fan-out of row changes to every open dashboard stream.
pub struct BroadcastChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl BroadcastChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

impl ChangeNotifier for BroadcastChangeFeed {
    fn publish(&self, event: ChangeEvent) {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => debug!("Published {} to {} subscriber(s)", name, receivers),
            // No dashboard open; nothing to deliver.
            Err(_) => debug!("Dropped {}: no subscribers", name),
        }
    }
}
