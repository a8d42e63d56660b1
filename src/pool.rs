//! Reusable scratch buffers for serializing many messages.
//!
//! ```rust
//! use serde_llsd::{llsd, pool::to_writer_pooled, BufferPool, Format};
//!
//! let pool = BufferPool::new();
//! let mut wire = Vec::new();
//! to_writer_pooled(&pool, &mut wire, &llsd!([1, 2]), Format::Notation).unwrap();
//! assert_eq!(wire, b"[i1,i2]");
//! assert_eq!(pool.retained(), 1);
//! ```

use crate::format::{write_format, Format};
use crate::{LlsdValue, Result};
use std::io;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard};

/// A thread-safe free list of `String` buffers.
///
/// Buffers come back to the pool when their [`PooledBuffer`] guard drops,
/// including during unwinding. At most `max_retained` buffers are kept, and
/// buffers that grew past `max_capacity` are dropped instead of retained.
#[derive(Debug)]
pub struct BufferPool {
    free: Mutex<Vec<String>>,
    max_retained: usize,
    max_capacity: usize,
}

impl Default for BufferPool {
    fn default() -> Self {
        BufferPool::with_limits(Self::DEFAULT_MAX_RETAINED, Self::DEFAULT_MAX_CAPACITY)
    }
}

impl BufferPool {
    pub const DEFAULT_MAX_RETAINED: usize = 16;
    pub const DEFAULT_MAX_CAPACITY: usize = 1 << 20;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limits(max_retained: usize, max_capacity: usize) -> Self {
        BufferPool {
            free: Mutex::new(Vec::with_capacity(max_retained)),
            max_retained,
            max_capacity,
        }
    }

    /// Takes a cleared buffer from the pool, allocating when none is free.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self.lock().pop().unwrap_or_else(|| {
            tracing::trace!("buffer pool empty, allocating");
            String::new()
        });
        PooledBuffer { pool: self, buf }
    }

    /// Number of idle buffers currently held.
    pub fn retained(&self) -> usize {
        self.lock().len()
    }

    fn release(&self, mut buf: String) {
        if buf.capacity() > self.max_capacity {
            tracing::trace!(capacity = buf.capacity(), "dropping oversized pooled buffer");
            return;
        }
        buf.clear();
        let mut free = self.lock();
        if free.len() < self.max_retained {
            free.push(buf);
        } else {
            tracing::trace!("buffer pool full, dropping buffer");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        // A panic while holding the lock cannot leave the free list inconsistent.
        self.free.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Exclusive use of one pooled buffer; returns it to the pool on drop.
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: String,
}

impl Deref for PooledBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}

/// Serializes `value` into a pooled scratch buffer, then writes it out.
///
/// The buffer goes back to `pool` whether or not serialization succeeds.
pub fn to_writer_pooled<W: io::Write>(
    pool: &BufferPool,
    mut writer: W,
    value: &LlsdValue,
    format: Format,
) -> Result<()> {
    let mut buf = pool.acquire();
    write_format(&mut buf, value, format)?;
    writer.write_all(buf.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{llsd, Error};

    #[test]
    fn test_buffers_are_reused() {
        let pool = BufferPool::new();
        {
            let mut buf = pool.acquire();
            buf.push_str("scratch");
        }
        assert_eq!(pool.retained(), 1);
        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert!(buf.capacity() >= 7);
        assert_eq!(pool.retained(), 0);
    }

    #[test]
    fn test_limits() {
        let pool = BufferPool::with_limits(1, 64);
        {
            let _a = pool.acquire();
            let _b = pool.acquire();
        }
        assert_eq!(pool.retained(), 1);

        let mut big = pool.acquire();
        big.reserve(1024);
        drop(big);
        assert_eq!(pool.retained(), 0);
    }

    #[test]
    fn test_released_on_error() {
        let pool = BufferPool::new();
        let mut out = Vec::new();
        let result = to_writer_pooled(&pool, &mut out, &llsd!(1), Format::Binary);
        assert!(matches!(result, Err(Error::Unsupported(_))));
        assert!(out.is_empty());
        assert_eq!(pool.retained(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        let pool = BufferPool::new();
        let value = llsd!({ "k": [1, 2, 3] });
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        let mut out = Vec::new();
                        to_writer_pooled(&pool, &mut out, &value, Format::Json).unwrap();
                        assert_eq!(out, br#"{"k":[1,2,3]}"#);
                    }
                });
            }
        });
        assert!(pool.retained() <= 4);
    }
}
