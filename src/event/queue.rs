use tokio::sync::mpsc;
use super::types::SourceMessage;

/// Snapshot queue buffer size
const QUEUE_SIZE: usize = 256;

/// Creates a new source channel pair
pub fn create_event_queue() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(QUEUE_SIZE);
    (EventSender(tx), EventReceiver(rx))
}

/// Sender side of the source channel, cloned into each source task
#[derive(Clone)]
pub struct EventSender(pub mpsc::Sender<SourceMessage>);

impl EventSender {
    pub async fn send(&self, message: SourceMessage) -> Result<(), mpsc::error::SendError<SourceMessage>> {
        self.0.send(message).await
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

/// Receiver side of the source channel, owned by the app actor
pub struct EventReceiver(pub mpsc::Receiver<SourceMessage>);

impl EventReceiver {
    pub async fn recv(&mut self) -> Option<SourceMessage> {
        self.0.recv().await
    }
}
