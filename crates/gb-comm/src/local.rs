use std::cell::RefCell;
use std::collections::VecDeque;
use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::{CommError, Group, Tag};

#[derive(Debug)]
enum Frame {
    Data {
        src: usize,
        tag: Tag,
        payload: Vec<u8>,
    },
    Abort,
}

/// An in-process worker group: one rank per thread, one inbox channel per
/// rank, every rank holding a sender to every inbox.
///
/// Matching is MPI-style: `recv(from, tag)` pulls frames off the inbox and
/// parks non-matching ones in a pending queue until the wanted frame
/// arrives. An abort frame short-circuits any blocked receive, which is
/// what makes [`Group::abort`] wake the whole group.
pub struct LocalGroup {
    rank: usize,
    size: usize,
    outboxes: Vec<Sender<Frame>>,
    inbox: Receiver<Frame>,
    pending: RefCell<VecDeque<(usize, Tag, Vec<u8>)>>,
}

impl LocalGroup {
    /// Builds the full mesh for a group of `size` ranks. The returned
    /// handles are in rank order; each must move to its own thread.
    pub fn create(size: usize) -> Vec<LocalGroup> {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..size).map(|_| unbounded()).unzip();
        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| LocalGroup {
                rank,
                size,
                outboxes: senders.clone(),
                inbox,
                pending: RefCell::new(VecDeque::new()),
            })
            .collect()
    }

    /// Runs `f` once per rank on its own scoped thread and returns the
    /// results in rank order. A panicking rank aborts the group (see
    /// `Drop`) and then propagates its panic through the join.
    pub fn run<T, F>(size: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(LocalGroup) -> T + Sync,
    {
        let handles = Self::create(size);
        thread::scope(|scope| {
            let joins: Vec<_> = handles
                .into_iter()
                .map(|handle| {
                    let f = &f;
                    scope.spawn(move || f(handle))
                })
                .collect();
            joins
                .into_iter()
                .map(|join| join.join().expect("group rank panicked"))
                .collect()
        })
    }
}

impl Group for LocalGroup {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, to: usize, tag: Tag, payload: &[u8]) -> Result<(), CommError> {
        let outbox = self.outboxes.get(to).ok_or(CommError::InvalidRank {
            rank: to,
            size: self.size,
        })?;
        outbox
            .send(Frame::Data {
                src: self.rank,
                tag,
                payload: payload.to_vec(),
            })
            .map_err(|_| CommError::PeerGone { rank: to })
    }

    fn recv(&self, from: usize, tag: Tag) -> Result<Vec<u8>, CommError> {
        if from >= self.size {
            return Err(CommError::InvalidRank {
                rank: from,
                size: self.size,
            });
        }

        let mut pending = self.pending.borrow_mut();
        if let Some(pos) = pending
            .iter()
            .position(|(src, t, _)| *src == from && *t == tag)
        {
            let (_, _, payload) = pending.remove(pos).expect("scanned position exists");
            return Ok(payload);
        }

        loop {
            match self.inbox.recv() {
                Ok(Frame::Data { src, tag: t, payload }) if src == from && t == tag => {
                    return Ok(payload);
                }
                Ok(Frame::Data { src, tag: t, payload }) => {
                    pending.push_back((src, t, payload));
                }
                Ok(Frame::Abort) => return Err(CommError::Aborted),
                Err(_) => return Err(CommError::PeerGone { rank: from }),
            }
        }
    }

    fn abort(&self) {
        for outbox in &self.outboxes {
            // A rank that already exited has dropped its inbox; nothing to
            // wake there.
            let _ = outbox.send(Frame::Abort);
        }
    }
}

impl Drop for LocalGroup {
    fn drop(&mut self) {
        if thread::panicking() {
            self.abort();
        }
    }
}
