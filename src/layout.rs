//! Memory layouts ("vectors") holding the dataset under test.
//!
//! The layout is part of the benchmark configuration because page placement
//! changes sorting throughput on NUMA machines. Two strategies:
//!
//! - `AlignedBuf`: one aligned mapping, pages placed wherever the first
//!   writer touches them (so a parallel generator spreads them, a
//!   sequential one concentrates them).
//! - `InterleavedBuf`: same mapping, but every worker of the pool touches
//!   its partition up front, spreading first-touch across all workers
//!   before any data is generated.
//!
//! All element types in the `Datatype` family are plain old data and valid
//! when zero-initialized; the buffers rely on that and hand out zeroed
//! memory without a construction pass.

use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::datatype::Datatype;
use crate::parallel::Pool;

/// Buffer alignment, matching the strictest vector-unit requirement the
/// algorithms under test may assume.
pub const ALIGNMENT: usize = 0x100;

/// Capability contract for dataset buffers.
pub trait DataLayout<T: Datatype>: Sized {
    /// Stable name used by CLI filters and the result stream.
    const NAME: &'static str;

    fn allocate(len: usize, pool: &Pool) -> Self;

    fn as_slice(&self) -> &[T];

    fn as_mut_slice(&mut self) -> &mut [T];

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Contiguous 256-byte-aligned buffer, zero-initialized, untouched until
/// first use.
pub struct AlignedBuf<T> {
    ptr: NonNull<T>,
    len: usize,
    _marker: PhantomData<T>,
}

// The buffer owns its allocation exclusively.
unsafe impl<T: Send> Send for AlignedBuf<T> {}
unsafe impl<T: Sync> Sync for AlignedBuf<T> {}

impl<T: Datatype> AlignedBuf<T> {
    fn layout(len: usize) -> Layout {
        let align = ALIGNMENT.max(std::mem::align_of::<T>());
        // Datatype sizes are small powers of two; this cannot overflow for
        // any size the sweep can request.
        Layout::from_size_align(len * std::mem::size_of::<T>(), align)
            .expect("invalid buffer layout")
    }

    fn new(len: usize) -> Self {
        if len == 0 {
            return AlignedBuf {
                ptr: NonNull::dangling(),
                len: 0,
                _marker: PhantomData,
            };
        }
        let layout = Self::layout(len);
        // SAFETY: layout has non-zero size; zeroed memory is a valid value
        // for every member of the closed Datatype family.
        let raw = unsafe { alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<T>()) else {
            handle_alloc_error(layout);
        };
        AlignedBuf {
            ptr,
            len,
            _marker: PhantomData,
        }
    }
}

impl<T: Datatype> DataLayout<T> for AlignedBuf<T> {
    const NAME: &'static str = "aligned";

    fn allocate(len: usize, _pool: &Pool) -> Self {
        Self::new(len)
    }

    fn as_slice(&self) -> &[T] {
        // SAFETY: ptr/len describe our own zero-initialized allocation.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, and we hold &mut self.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Drop for AlignedBuf<T> {
    fn drop(&mut self) {
        if self.len == 0 {
            return;
        }
        let align = ALIGNMENT.max(std::mem::align_of::<T>());
        let layout = Layout::from_size_align(self.len * std::mem::size_of::<T>(), align)
            .expect("invalid buffer layout");
        // SAFETY: allocated by alloc_zeroed with the same layout.
        unsafe { dealloc(self.ptr.as_ptr().cast(), layout) };
    }
}

/// Aligned buffer whose pages are first-touched round-robin by the worker
/// pool before use, interleaving placement across NUMA nodes.
pub struct InterleavedBuf<T> {
    buf: AlignedBuf<T>,
}

fn page_size() -> usize {
    // SAFETY: plain sysconf query.
    let ps = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if ps > 0 {
        ps as usize
    } else {
        4096
    }
}

impl<T: Datatype> DataLayout<T> for InterleavedBuf<T> {
    const NAME: &'static str = "interleaved";

    fn allocate(len: usize, pool: &Pool) -> Self {
        let mut buf = AlignedBuf::<T>::new(len);
        let stride = (page_size() / std::mem::size_of::<T>()).max(1);
        // Touch one slot per page from every worker so the kernel places
        // pages on the touching worker's node.
        pool.for_each_partition(buf.as_mut_slice(), |_, part| {
            let mut i = 0;
            while i < part.len() {
                part[i] = T::default();
                i += stride;
            }
        });
        InterleavedBuf { buf }
    }

    fn as_slice(&self) -> &[T] {
        self.buf.as_slice()
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        self.buf.as_mut_slice()
    }
}
