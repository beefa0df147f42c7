//! Single-producer/single-consumer ring of raw interval samples.
//!
//! Producers are interrupt handlers that cannot preempt each other; the only
//! consumer is the main loop. Both indices are free-running `u16` counters, so
//! a slot is `index & (N - 1)` and the fill level is `write - read` in
//! wrapping arithmetic. Every field is an atomic of at most 16 bits, which
//! keeps index and sample reads tear-free on the target.
//!
//! `push` never checks for space. A producer that runs more than `N` samples
//! ahead overwrites the oldest unread slots; the consumer notices on its next
//! `pop`, skips to the oldest sample that still exists and counts the loss.
//! The count is exact while the consumer lags by fewer than 65 536 pushes;
//! beyond that the indices alias and the lag reads modulo 65 536.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::RawSample;

pub struct SampleBuffer<const N: usize> {
    slots: [AtomicU16; N],
    write: AtomicU16,
    read: AtomicU16,
    consumer_taken: AtomicBool,
}

impl<const N: usize> SampleBuffer<N> {
    const MASK: u16 = {
        assert!(N.is_power_of_two(), "capacity must be a power of two");
        assert!(N <= 32_768, "capacity must fit the u16 index space twice");
        (N - 1) as u16
    };

    pub const fn new() -> Self {
        let _ = Self::MASK;
        Self {
            slots: [const { AtomicU16::new(0) }; N],
            write: AtomicU16::new(0),
            read: AtomicU16::new(0),
            consumer_taken: AtomicBool::new(false),
        }
    }

    /// Producer side. Call only from contexts that cannot preempt one another.
    pub fn push(&self, sample: RawSample) {
        let write = self.write.load(Ordering::Relaxed);
        self.slots[(write & Self::MASK) as usize].store(sample, Ordering::Relaxed);
        self.write.store(write.wrapping_add(1), Ordering::Release);
    }

    /// Samples pushed and not yet consumed, capped at the capacity.
    pub fn len(&self) -> usize {
        let pending = self
            .write
            .load(Ordering::Acquire)
            .wrapping_sub(self.read.load(Ordering::Acquire));
        (pending as usize).min(N)
    }

    pub fn is_empty(&self) -> bool {
        self.write.load(Ordering::Acquire) == self.read.load(Ordering::Acquire)
    }

    /// Hands out the consumer handle. Returns `None` once it has been taken.
    pub fn take_consumer(&self) -> Option<Consumer<'_, N>> {
        if self.consumer_taken.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(Consumer { buffer: self })
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// The one handle allowed to advance the read index.
pub struct Consumer<'a, const N: usize> {
    buffer: &'a SampleBuffer<N>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Popped {
    pub sample: RawSample,
    /// Samples overwritten before this pop could reach them.
    pub lost: u16,
}

impl<const N: usize> Consumer<'_, N> {
    pub fn pop(&mut self) -> Option<RawSample> {
        self.pop_tracked().map(|popped| popped.sample)
    }

    pub fn pop_tracked(&mut self) -> Option<Popped> {
        let buffer = self.buffer;
        // Re-read on every call: producers move `write` behind our back.
        let write = buffer.write.load(Ordering::Acquire);
        let mut read = buffer.read.load(Ordering::Relaxed);
        if read == write {
            return None;
        }

        let mut lost = 0;
        let pending = write.wrapping_sub(read);
        if pending as usize > N {
            lost = pending - N as u16;
            read = write.wrapping_sub(N as u16);
        }

        let sample = buffer.slots[(read & SampleBuffer::<N>::MASK) as usize].load(Ordering::Relaxed);
        buffer.read.store(read.wrapping_add(1), Ordering::Release);
        Some(Popped { sample, lost })
    }
}
