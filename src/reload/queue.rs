//! Notification Queue
//!
//! FIFO of pending update jobs with per-job coalescing.
//!
//! A job that is already pending absorbs duplicates: the later run would
//! refetch the same content anyway. The pending job keeps the newest
//! connection generation, since only that connection still waits for the
//! acknowledgement. A job that is in flight (popped) is not in the queue,
//! so a new notification for it queues a second run behind it. Together
//! with a single consumer this keeps at most one patch cycle per path in
//! flight.

use std::collections::VecDeque;

/// A unit of work for the patch actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Job {
    /// Patch `path`; acks go to connection `generation`.
    Path { path: String, generation: u64 },
    Stylesheet,
}

impl Job {
    pub fn path(path: impl Into<String>, generation: u64) -> Self {
        Self::Path {
            path: path.into(),
            generation,
        }
    }

    fn same_target(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Path { path: a, .. }, Self::Path { path: b, .. }) => a == b,
            (Self::Stylesheet, Self::Stylesheet) => true,
            _ => false,
        }
    }

    fn absorb(&mut self, newer: Self) {
        if let (Self::Path { generation, .. }, Self::Path { generation: newer, .. }) = (self, newer) {
            *generation = (*generation).max(newer);
        }
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path { path, .. } => f.write_str(path),
            Self::Stylesheet => f.write_str("<stylesheet>"),
        }
    }
}

#[derive(Debug, Default)]
pub struct NotificationQueue {
    order: VecDeque<Job>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a job. Returns false if it was coalesced into a pending one.
    pub fn push(&mut self, job: Job) -> bool {
        if let Some(pending) = self.order.iter_mut().find(|queued| queued.same_target(&job)) {
            pending.absorb(job);
            return false;
        }
        self.order.push_back(job);
        true
    }

    pub fn pop(&mut self) -> Option<Job> {
        self.order.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Drop the work a full reload supersedes: the stylesheet swap and
    /// path jobs from `generation` or older. Returns how many were dropped.
    pub fn retire(&mut self, generation: u64) -> usize {
        let before = self.order.len();
        self.order.retain(|job| match job {
            Job::Path { generation: g, .. } => *g > generation,
            Job::Stylesheet => false,
        });
        before - self.order.len()
    }
}
