//! Transfer queue: unbounded FIFO of [`FileCandidate`] between discovery and copy.
//!
//! Built on an unbounded crossbeam channel. The end of discovery is the drop of the last
//! [`QueueProducer`]; the consumer sees [`Poll::Drained`] only once every producer is gone AND
//! every queued candidate has been taken, so "queue empty" and "discovery done" are observed as
//! one fact and a candidate enqueued just before the last producer finishes cannot be lost.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use std::time::Duration;

use crate::FileCandidate;

/// Create a connected producer/consumer pair.
pub fn transfer_queue() -> (QueueProducer, QueueConsumer) {
    let (tx, rx) = unbounded::<FileCandidate>();
    (QueueProducer { tx }, QueueConsumer { rx })
}

/// Sending half. Clone for parallel walkers; discovery is done when every clone is finished or
/// dropped.
#[derive(Clone, Debug)]
pub struct QueueProducer {
    tx: Sender<FileCandidate>,
}

impl QueueProducer {
    /// Enqueue one candidate. False if the consumer is gone (nothing will copy it).
    pub fn push(&self, candidate: FileCandidate) -> bool {
        self.tx.send(candidate).is_ok()
    }

    /// Signal that this producer will enqueue nothing more.
    pub fn finish(self) {
        drop(self);
    }
}

/// Result of one dequeue attempt.
#[derive(Debug)]
pub enum Poll {
    Ready(FileCandidate),
    /// Queue empty but discovery may still add more.
    Idle,
    /// Queue empty and discovery finished: nothing will ever arrive.
    Drained,
}

/// Receiving half. Single consumer.
#[derive(Debug)]
pub struct QueueConsumer {
    rx: Receiver<FileCandidate>,
}

impl QueueConsumer {
    /// Take the next candidate, waiting at most `timeout` for one to arrive.
    pub fn poll(&self, timeout: Duration) -> Poll {
        match self.rx.recv_timeout(timeout) {
            Ok(candidate) => Poll::Ready(candidate),
            Err(RecvTimeoutError::Timeout) => Poll::Idle,
            Err(RecvTimeoutError::Disconnected) => Poll::Drained,
        }
    }

    /// Candidates currently waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{VolumeKind, VolumeRoot};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn candidate(name: &str) -> FileCandidate {
        FileCandidate {
            path: PathBuf::from(format!("/v/{name}")),
            size: 1,
            volume: Arc::new(VolumeRoot::new("/v", VolumeKind::Fixed)),
        }
    }

    #[test]
    fn test_fifo_order() {
        let (tx, rx) = transfer_queue();
        for n in ["a", "b", "c"] {
            assert!(tx.push(candidate(n)));
        }
        assert_eq!(rx.len(), 3);
        let mut got = Vec::new();
        while let Poll::Ready(c) = rx.poll(Duration::ZERO) {
            got.push(c.path);
        }
        assert_eq!(
            got,
            vec![
                PathBuf::from("/v/a"),
                PathBuf::from("/v/b"),
                PathBuf::from("/v/c")
            ]
        );
        assert!(rx.is_empty());
    }

    #[test]
    fn test_items_pushed_before_finish_are_not_lost() {
        let (tx, rx) = transfer_queue();
        tx.push(candidate("last"));
        tx.finish();
        assert!(matches!(rx.poll(Duration::ZERO), Poll::Ready(_)));
        assert!(matches!(rx.poll(Duration::ZERO), Poll::Drained));
    }

    #[test]
    fn test_idle_while_producer_alive() {
        let (tx, rx) = transfer_queue();
        assert!(matches!(rx.poll(Duration::from_millis(5)), Poll::Idle));
        drop(tx);
        assert!(matches!(rx.poll(Duration::from_millis(5)), Poll::Drained));
    }

    #[test]
    fn test_drained_waits_for_every_clone() {
        let (tx, rx) = transfer_queue();
        let tx2 = tx.clone();
        tx.finish();
        assert!(matches!(rx.poll(Duration::ZERO), Poll::Idle));
        tx2.push(candidate("late"));
        tx2.finish();
        assert!(matches!(rx.poll(Duration::ZERO), Poll::Ready(_)));
        assert!(matches!(rx.poll(Duration::ZERO), Poll::Drained));
    }

    #[test]
    fn test_push_fails_once_consumer_is_gone() {
        let (tx, rx) = transfer_queue();
        drop(rx);
        assert!(!tx.push(candidate("orphan")));
    }
}
