//! Channel port for pushing log batches into the store from outside the UI.
//!
//! This replaces the ambient "call a global function" hook with an explicit
//! pair: external agents hold a clonable [`LogSink`] and push batches into
//! it; the UI owns the matching [`LogDrain`] and empties it once per tick,
//! feeding every batch to the store's merge. All merging therefore still
//! happens on the single UI thread, in event order.
//!
//! The contract is fire-and-forget: no acknowledgment, no backpressure, no
//! ordering guarantee between concurrent pushers beyond the merge's own
//! re-sort.

use flipdeck_core::EmailLog;
use tokio::sync::mpsc;

/// Create a connected sink/drain pair.
pub fn channel() -> (LogSink, LogDrain) {
    let (tx, rx) = mpsc::unbounded_channel();
    (LogSink { tx }, LogDrain { rx })
}

/// Cloneable push handle for external log producers.
#[derive(Clone)]
pub struct LogSink {
    tx: mpsc::UnboundedSender<Vec<EmailLog>>,
}

impl LogSink {
    /// Push a batch of logs toward the store. Returns nothing; if the drain
    /// side is gone the batch is silently dropped.
    pub fn push(&self, batch: Vec<EmailLog>) {
        if self.tx.send(batch).is_err() {
            tracing::debug!("log sink push after drain closed, batch dropped");
        }
    }
}

/// Receiving end owned by the UI event loop.
pub struct LogDrain {
    rx: mpsc::UnboundedReceiver<Vec<EmailLog>>,
}

impl LogDrain {
    /// Take every batch currently queued, without blocking. Empty when
    /// nothing arrived since the last call.
    pub fn drain(&mut self) -> Vec<Vec<EmailLog>> {
        let mut batches = Vec::new();
        while let Ok(batch) = self.rx.try_recv() {
            batches.push(batch);
        }
        batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(id: &str) -> EmailLog {
        EmailLog {
            id: id.into(),
            created_at: "2024-05-01T10:00:00Z".parse().unwrap(),
            subject: "Welcome".into(),
            snippet: String::new(),
            status: "unread".into(),
            account_id: "e1".into(),
            otp_code: None,
            body_html: None,
        }
    }

    #[test]
    fn pushed_batches_come_out_in_order() {
        let (sink, mut drain) = channel();
        sink.push(vec![log("a")]);
        sink.clone().push(vec![log("b"), log("c")]);

        let batches = drain.drain();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0][0].id, "a");
        assert_eq!(batches[1].len(), 2);
        assert!(drain.drain().is_empty());
    }

    #[test]
    fn push_after_drain_dropped_is_a_no_op() {
        let (sink, drain) = channel();
        drop(drain);
        sink.push(vec![log("a")]); // must not panic
    }
}
