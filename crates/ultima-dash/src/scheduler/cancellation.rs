use tokio::sync::watch;

/// Snapshot of the scheduler's generation. The token is cancelled as soon
/// as the generation moves on, which happens on every `stop()`.
#[derive(Clone)]
pub struct CancellationToken {
    receiver: watch::Receiver<u64>,
    epoch: u64,
}

impl CancellationToken {
    pub fn new(receiver: watch::Receiver<u64>) -> Self {
        let epoch = *receiver.borrow();
        Self { receiver, epoch }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow() != self.epoch
    }

    pub async fn cancelled(&mut self) {
        while *self.receiver.borrow() == self.epoch {
            if self.receiver.changed().await.is_err() {
                break;
            }
        }
    }
}
