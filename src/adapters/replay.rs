use crate::domain::ports::{EventQueue, Receiver};
use crate::utils::error::{KhlError, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;

/// [`Receiver`] that decodes one JSON event per line from a buffered reader.
///
/// Used to replay captured event streams (stdin, files) through a gateway. Ends cleanly at
/// EOF; a malformed line or a closed queue stops the run with an error.
pub struct LineReceiver<R> {
    source: Mutex<R>,
}

impl<R> LineReceiver<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(source: R) -> Self {
        Self {
            source: Mutex::new(source),
        }
    }
}

#[async_trait]
impl<R> Receiver for LineReceiver<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn run(&self, queue: EventQueue) -> Result<()> {
        let mut source = self.source.lock().await;
        let mut lines = (&mut *source).lines();
        let mut received = 0usize;

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let event: Value = serde_json::from_str(line)?;
            queue
                .send(event)
                .map_err(|_| KhlError::Connection("event queue consumer is gone".to_string()))?;
            received += 1;
        }

        tracing::info!("Event source exhausted after {} events", received);
        Ok(())
    }
}
