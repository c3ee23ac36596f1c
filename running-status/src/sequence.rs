//! Latest-request-wins sequencing.
//!
//! Several lookups can be in flight at once when a user resubmits before
//! the previous response arrives. A lookup that started earlier may finish
//! later, and its result must not replace the view of a newer lookup. Each
//! lookup takes a number from a [`RequestSequencer`] when it starts, and
//! offers its result to a [`LatestSlot`] when it finishes; the slot refuses
//! anything that is not from the most recently issued request.
//!
//! Over HTTP the same rule runs in the browser: `/running/status` takes a
//! [`RequestSeq`] as its `seq` parameter and echoes it back, and the
//! bundled page drops any response that does not carry the number it sent
//! last. [`RequestSequencer`] and [`LatestSlot`] are the in-process form
//! for callers that drive lookups themselves.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sequence number of one request. Larger numbers were issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestSeq(pub u64);

impl std::fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues strictly increasing request numbers, starting at 1.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    last: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next number.
    pub fn issue(&self) -> RequestSeq {
        RequestSeq(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if no later number has been issued.
    pub fn is_latest(&self, seq: RequestSeq) -> bool {
        self.last.load(Ordering::SeqCst) == seq.0
    }

    /// The most recently issued number, if any.
    pub fn latest(&self) -> Option<RequestSeq> {
        match self.last.load(Ordering::SeqCst) {
            0 => None,
            n => Some(RequestSeq(n)),
        }
    }
}

/// Holds the result of the most recent request.
#[derive(Debug)]
pub struct LatestSlot<T> {
    sequencer: RequestSequencer,
    current: Mutex<Option<(RequestSeq, T)>>,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self {
            sequencer: RequestSequencer::new(),
            current: Mutex::new(None),
        }
    }
}

impl<T: Clone> LatestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request.
    pub fn begin(&self) -> RequestSeq {
        self.sequencer.issue()
    }

    /// Offer a finished result.
    ///
    /// The value is stored only if `seq` is the latest number issued and is
    /// not older than what the slot already holds. Returns whether it was
    /// stored.
    pub fn offer(&self, seq: RequestSeq, value: T) -> bool {
        if !self.sequencer.is_latest(seq) {
            debug!(%seq, latest = ?self.sequencer.latest(), "discarding stale result");
            return false;
        }

        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if current.as_ref().is_some_and(|(held, _)| *held > seq) {
            debug!(%seq, "discarding result older than the stored one");
            return false;
        }
        *current = Some((seq, value));
        true
    }

    /// The stored value and its request number.
    pub fn get(&self) -> Option<(RequestSeq, T)> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Whatever order results arrive in, the slot never goes backwards
        /// and never holds anything but the last issued request.
        #[test]
        fn slot_never_goes_backwards(n in 1usize..20, order in prop::collection::vec(any::<prop::sample::Index>(), 1..40)) {
            let slot = LatestSlot::new();
            let seqs: Vec<_> = (0..n).map(|_| slot.begin()).collect();
            let latest = *seqs.last().unwrap();

            let mut held: Option<RequestSeq> = None;
            for idx in order {
                let seq = *idx.get(&seqs);
                let accepted = slot.offer(seq, seq.0);
                prop_assert_eq!(accepted, seq == latest);

                if let Some((stored, value)) = slot.get() {
                    prop_assert_eq!(stored, latest);
                    prop_assert_eq!(value, latest.0);
                    if let Some(h) = held {
                        prop_assert!(stored >= h);
                    }
                    held = Some(stored);
                }
            }
        }
    }
}
