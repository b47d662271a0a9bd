//! Disjoint stride columns over one exclusively borrowed buffer.
//!
//! Column `t` of a buffer split with stride `T` owns indices
//! `t, t + T, t + 2T, ...`. The columns of one split never share an
//! index, and they all borrow the buffer for the same lifetime, so each
//! can be handed to its own worker thread without locking.

use std::marker::PhantomData;

pub struct Column<'a> {
    ptr: *mut u32,
    start: usize,
    stride: usize,
    len: usize,
    _buffer: PhantomData<&'a mut [u32]>,
}

// SAFETY: a column only ever touches its own indices, which no other column
// of the same split can reach, and the exclusive borrow of the buffer
// outlives every column.
unsafe impl Send for Column<'_> {}

/// Split `buffer` into `stride` columns. Columns whose first index is past
/// the end of the buffer are empty.
pub fn columns(buffer: &mut [u32], stride: usize) -> Vec<Column<'_>> {
    assert!(stride > 0, "stride must be non-zero");
    let len = buffer.len();
    let ptr = buffer.as_mut_ptr();
    (0..stride)
        .map(|start| Column {
            ptr,
            start,
            stride,
            len: if start < len {
                (len - start).div_ceil(stride)
            } else {
                0
            },
            _buffer: PhantomData,
        })
        .collect()
}

impl Column<'_> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut u32),
    {
        for k in 0..self.len {
            let index = self.start + k * self.stride;
            // SAFETY: index < buffer length by construction of `len`, and
            // `index % stride == start` is owned by this column alone.
            let slot = unsafe { &mut *self.ptr.add(index) };
            f(slot);
        }
    }
}
