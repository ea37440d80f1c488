//! Sandbox linear memory bridge.
//!
//! The engine computes in one flat byte buffer owned by the embedding VM.
//! The runtime never owns that buffer exclusively: the orchestrator creates
//! a [`SharedMemory`] (or wraps the VM's image in one) and binds a clone
//! into the run context. Every transfer the primitives perform is an
//! `(offset, length)` view over this buffer.
//!
//! Offsets and lengths arrive from the engine and are trusted. An
//! out-of-range access is a fatal host-boundary bug and panics; it is not a
//! recoverable condition of this layer.

use std::cell::RefCell;
use std::rc::Rc;

/// WebAssembly page size in bytes.
pub const PAGE_SIZE: usize = 65536;

/// Cheaply clonable handle over the sandbox's linear memory.
///
/// Clones alias one buffer: writes through any clone are visible through
/// all of them. `Rc` pins the handle (and with it the run context) to a
/// single thread, which is the run model: one engine, strictly sequential
/// primitive calls.
#[derive(Debug, Clone, Default)]
pub struct SharedMemory {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl SharedMemory {
    /// Allocate `pages` zeroed WebAssembly pages.
    pub fn with_pages(pages: usize) -> Self {
        SharedMemory {
            bytes: Rc::new(RefCell::new(vec![0u8; pages * PAGE_SIZE])),
        }
    }

    /// Wrap an existing memory image, e.g. a preloaded engine core dump.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        SharedMemory {
            bytes: Rc::new(RefCell::new(bytes)),
        }
    }

    /// Buffer size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.borrow().len()
    }

    /// Copy `len` bytes starting at `offset` out of the buffer.
    pub fn read(&self, offset: usize, len: usize) -> Vec<u8> {
        self.bytes.borrow()[offset..offset + len].to_vec()
    }

    /// Single byte at `offset`.
    pub fn read_u8(&self, offset: usize) -> u8 {
        self.bytes.borrow()[offset]
    }

    /// Copy `data` into the buffer starting at `offset`.
    pub fn write(&self, offset: usize, data: &[u8]) {
        self.bytes.borrow_mut()[offset..offset + data.len()].copy_from_slice(data);
    }

    /// Store a single byte at `offset`.
    pub fn write_u8(&self, offset: usize, value: u8) {
        self.bytes.borrow_mut()[offset] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_pages_allocates_zeroed_pages() {
        let mem = SharedMemory::with_pages(2);
        assert_eq!(mem.size(), 2 * PAGE_SIZE);
        assert_eq!(mem.read_u8(0), 0);
        assert_eq!(mem.read_u8(2 * PAGE_SIZE - 1), 0);
    }

    #[test]
    fn write_then_read_roundtrips() {
        let mem = SharedMemory::with_pages(1);
        mem.write(100, b"hello");
        assert_eq!(mem.read(100, 5), b"hello");
        mem.write_u8(105, b'!');
        assert_eq!(mem.read(100, 6), b"hello!");
    }

    #[test]
    fn clones_alias_the_same_buffer() {
        let mem = SharedMemory::with_pages(1);
        let alias = mem.clone();
        alias.write(0, &[7, 8, 9]);
        assert_eq!(mem.read(0, 3), vec![7, 8, 9]);
    }

    #[test]
    fn from_bytes_wraps_an_image() {
        let mem = SharedMemory::from_bytes(vec![1, 2, 3, 4]);
        assert_eq!(mem.size(), 4);
        assert_eq!(mem.read(1, 2), vec![2, 3]);
    }

    #[test]
    #[should_panic]
    fn out_of_range_access_panics() {
        let mem = SharedMemory::from_bytes(vec![0; 8]);
        mem.read(4, 8);
    }
}
