use std::collections::VecDeque;

use crossbeam_channel::{Receiver, Sender};

use crate::ink::{InkPoint, StrokeFragment, VectorPath};

use super::DrawOp;

/// An operation that reached the consumer side, tagged with its arrival index.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedOp {
    pub seq: u64,
    pub op: DrawOp,
}

/// Creates a connected producer/consumer pair.
pub fn op_channel() -> (StrokeSink, OpQueue) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (StrokeSink { tx }, OpQueue::new(rx))
}

/// Producer handle for draw operations.
///
/// Cheap to clone and safe to use from any thread. Sending never blocks; the
/// producer only appends and never observes the queue.
#[derive(Debug, Clone)]
pub struct StrokeSink {
    tx: Sender<DrawOp>,
}

impl StrokeSink {
    /// Appends a fragment of the current stroke.
    pub fn enqueue_fragment(&self, points: Vec<InkPoint>, is_final: bool) {
        self.send(DrawOp::Append(StrokeFragment::new(points, is_final)));
    }

    /// Appends the commit of a finished stroke.
    pub fn enqueue_final_stroke(&self, path: VectorPath) {
        self.send(DrawOp::Commit(path));
    }

    /// Appends a discard of the current stroke.
    pub fn enqueue_discard(&self) {
        self.send(DrawOp::Discard);
    }

    pub fn send(&self, op: DrawOp) {
        // Unbounded channel: the only failure is a dropped consumer.
        if self.tx.send(op).is_err() {
            log::trace!("render buffer detached; draw op dropped");
        }
    }
}

/// Consumer side: the FIFO of pending operations.
///
/// Operations are pulled from the channel into a local deque at the start of
/// each drain. Only the owner of the queue reads, executes or clears it.
#[derive(Debug)]
pub struct OpQueue {
    rx: Receiver<DrawOp>,
    pending: VecDeque<QueuedOp>,
    next_seq: u64,
}

impl OpQueue {
    fn new(rx: Receiver<DrawOp>) -> Self {
        Self {
            rx,
            pending: VecDeque::new(),
            next_seq: 0,
        }
    }

    /// Moves every operation that has arrived so far into the pending deque.
    ///
    /// Returns how many operations were pulled.
    pub fn pull(&mut self) -> usize {
        let before = self.pending.len();
        for op in self.rx.try_iter() {
            let seq = self.next_seq;
            self.next_seq = self.next_seq.wrapping_add(1);
            self.pending.push_back(QueuedOp { seq, op });
        }
        self.pending.len() - before
    }

    #[inline]
    pub fn front(&self) -> Option<&QueuedOp> {
        self.pending.front()
    }

    #[inline]
    pub fn pop_front(&mut self) -> Option<QueuedOp> {
        self.pending.pop_front()
    }

    /// Pending operations, including ones still in flight in the channel.
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len() + self.rx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates pulled operations in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &QueuedOp> {
        self.pending.iter()
    }

    /// Discards every pending operation, including in-flight ones.
    ///
    /// Returns how many operations were discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.pending.len() + self.rx.try_iter().count();
        self.pending.clear();
        discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32) -> InkPoint {
        InkPoint::new(x, 0.0)
    }

    #[test]
    fn pull_preserves_arrival_order() {
        let (sink, mut queue) = op_channel();
        sink.enqueue_fragment(vec![pt(1.0)], false);
        sink.enqueue_fragment(vec![pt(2.0)], true);
        sink.enqueue_discard();

        assert_eq!(queue.pull(), 3);
        let kinds: Vec<_> = queue.iter().map(|q| (q.seq, q.op.kind())).collect();
        assert_eq!(kinds, vec![(0, "append"), (1, "append"), (2, "discard")]);
    }

    #[test]
    fn len_counts_in_flight_ops() {
        let (sink, mut queue) = op_channel();
        sink.enqueue_discard();
        assert_eq!(queue.len(), 1);
        queue.pull();
        sink.enqueue_discard();
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn clear_drops_pulled_and_in_flight() {
        let (sink, mut queue) = op_channel();
        sink.enqueue_discard();
        queue.pull();
        sink.enqueue_discard();

        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn sink_survives_dropped_queue() {
        let (sink, queue) = op_channel();
        drop(queue);
        sink.enqueue_discard();
        sink.enqueue_fragment(vec![pt(0.0)], true);
    }

    #[test]
    fn producers_on_other_threads_keep_per_thread_order() {
        let (sink, mut queue) = op_channel();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        sink.enqueue_fragment(vec![InkPoint::new(t as f32, i as f32)], false);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(queue.pull(), 200);

        let mut last = [-1.0f32; 4];
        for q in queue.iter() {
            let DrawOp::Append(frag) = &q.op else { panic!("unexpected op") };
            let p = frag.points[0].pos;
            let t = p.x as usize;
            assert!(p.y > last[t]);
            last[t] = p.y;
        }
    }
}
