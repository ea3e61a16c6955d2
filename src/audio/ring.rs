// Lock-free sample ring
//
// The one true cross-thread edge in the emulator: the APU (emulation
// thread) produces samples, the host audio callback consumes them. A
// bounded single-producer/single-consumer ring with acquire/release
// ordering on the indices is sufficient: the producer drops samples when
// full, the consumer substitutes silence when empty.
//
// Samples are stored as their bit patterns in `AtomicU32` slots, which
// keeps the whole structure free of unsafe code.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

struct RingInner {
    buffer: Box<[AtomicU32]>,
    /// Next slot the producer writes
    head: AtomicUsize,
    /// Next slot the consumer reads
    tail: AtomicUsize,
}

impl RingInner {
    fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

/// Create a ring holding up to `capacity` samples
///
/// One slot is sacrificed to distinguish full from empty.
pub fn sample_ring(capacity: usize) -> (SampleProducer, SampleConsumer) {
    let mut buffer = Vec::with_capacity(capacity + 1);
    for _ in 0..capacity + 1 {
        buffer.push(AtomicU32::new(0));
    }
    let inner = Arc::new(RingInner {
        buffer: buffer.into_boxed_slice(),
        head: AtomicUsize::new(0),
        tail: AtomicUsize::new(0),
    });
    (
        SampleProducer {
            inner: Arc::clone(&inner),
        },
        SampleConsumer { inner },
    )
}

/// Producer half, owned by the APU
pub struct SampleProducer {
    inner: Arc<RingInner>,
}

impl SampleProducer {
    /// Push one sample; returns false (dropping it) when the ring is full
    pub fn push(&self, sample: f32) -> bool {
        let head = self.inner.head.load(Ordering::Relaxed);
        let next = (head + 1) % self.inner.capacity();
        if next == self.inner.tail.load(Ordering::Acquire) {
            return false;
        }
        self.inner.buffer[head].store(sample.to_bits(), Ordering::Relaxed);
        self.inner.head.store(next, Ordering::Release);
        true
    }

    /// Number of samples currently queued
    pub fn len(&self) -> usize {
        let head = self.inner.head.load(Ordering::Acquire);
        let tail = self.inner.tail.load(Ordering::Acquire);
        (head + self.inner.capacity() - tail) % self.inner.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Usable capacity
    pub fn capacity(&self) -> usize {
        self.inner.capacity() - 1
    }
}

/// Consumer half, handed to the host audio output
pub struct SampleConsumer {
    inner: Arc<RingInner>,
}

impl SampleConsumer {
    /// Pop one sample, if available
    pub fn pop(&self) -> Option<f32> {
        let tail = self.inner.tail.load(Ordering::Relaxed);
        if tail == self.inner.head.load(Ordering::Acquire) {
            return None;
        }
        let bits = self.inner.buffer[tail].load(Ordering::Relaxed);
        self.inner
            .tail
            .store((tail + 1) % self.inner.capacity(), Ordering::Release);
        Some(f32::from_bits(bits))
    }

    /// Fill a host buffer, substituting silence on underflow
    ///
    /// Returns how many real samples were delivered.
    pub fn fill(&self, output: &mut [f32]) -> usize {
        let mut delivered = 0;
        for slot in output.iter_mut() {
            match self.pop() {
                Some(sample) => {
                    *slot = sample;
                    delivered += 1;
                }
                None => *slot = 0.0,
            }
        }
        delivered
    }

    /// Number of samples currently queued
    pub fn len(&self) -> usize {
        let head = self.inner.head.load(Ordering::Acquire);
        let tail = self.inner.tail.load(Ordering::Acquire);
        (head + self.inner.capacity() - tail) % self.inner.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
