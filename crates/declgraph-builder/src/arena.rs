//! Identity arena: interned byte strings for identity keys
//!
//! Identity keys are compared and hashed constantly during a build, so
//! their name bytes are interned once into fixed-size blocks and
//! referred to by a small [`Symbol`] handle. The arena is monotonic:
//! nothing is freed individually, `reset` reclaims everything at once.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Block granularity for the bump allocator. A single symbol must fit
/// in one block; longer names are a hard caller error.
pub const BLOCK_SIZE: usize = 4096;

/// Handle to an interned byte string.
///
/// Interning deduplicates, so two symbols are equal exactly when their
/// bytes are equal. This is what makes identity keys cheap to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

#[derive(Debug, Clone, Copy)]
struct SymbolData {
    block: u32,
    offset: u32,
    len: u32,
}

/// Monotonic block allocator with an intern table on top
#[derive(Debug, Default)]
pub struct IdentityArena {
    blocks: Vec<Vec<u8>>,
    symbols: Vec<SymbolData>,
    dedup: HashMap<u64, Vec<Symbol>>,
}

impl IdentityArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a byte string, returning the existing symbol when the
    /// same bytes were interned before.
    ///
    /// Panics if `bytes` is longer than [`BLOCK_SIZE`].
    pub fn intern(&mut self, bytes: &[u8]) -> Symbol {
        let hash = hash_bytes(bytes);
        if let Some(candidates) = self.dedup.get(&hash) {
            for &symbol in candidates {
                if self.resolve(symbol) == bytes {
                    return symbol;
                }
            }
        }

        let data = self.allocate(bytes);
        let symbol = Symbol(self.symbols.len() as u32);
        self.symbols.push(data);
        self.dedup.entry(hash).or_default().push(symbol);
        symbol
    }

    /// The bytes behind a symbol.
    pub fn resolve(&self, symbol: Symbol) -> &[u8] {
        let data = self.symbols[symbol.0 as usize];
        let start = data.offset as usize;
        &self.blocks[data.block as usize][start..start + data.len as usize]
    }

    /// Copy `bytes` into the current block, failing over to a fresh
    /// block when it does not fit.
    fn allocate(&mut self, bytes: &[u8]) -> SymbolData {
        assert!(
            bytes.len() <= BLOCK_SIZE,
            "symbol of {} bytes exceeds the arena block size of {BLOCK_SIZE}",
            bytes.len()
        );

        let needs_block = match self.blocks.last() {
            Some(block) => block.len() + bytes.len() > BLOCK_SIZE,
            None => true,
        };
        if needs_block {
            self.blocks.push(Vec::with_capacity(BLOCK_SIZE));
        }

        let block = self.blocks.len() - 1;
        let target = &mut self.blocks[block];
        let offset = target.len();
        target.extend_from_slice(bytes);
        SymbolData {
            block: block as u32,
            offset: offset as u32,
            len: bytes.len() as u32,
        }
    }

    /// Mark every block reusable without releasing memory. All
    /// previously returned symbols are invalidated.
    pub fn reset(&mut self) {
        for block in &mut self.blocks {
            block.clear();
        }
        self.symbols.clear();
        self.dedup.clear();
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut arena = IdentityArena::new();
        let a = arena.intern(b"gfx::Vector3");
        let b = arena.intern(b"gfx::Vector3");
        let c = arena.intern(b"gfx::Vector4");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(arena.resolve(a), b"gfx::Vector3");
        assert_eq!(arena.symbol_count(), 2);
    }

    #[test]
    fn test_fails_over_to_new_block() {
        let mut arena = IdentityArena::new();
        let big = vec![b'x'; BLOCK_SIZE - 10];
        arena.intern(&big);
        let symbol = arena.intern(b"does not fit in the remainder");
        assert_eq!(arena.block_count(), 2);
        assert_eq!(arena.resolve(symbol), b"does not fit in the remainder");
    }

    #[test]
    fn test_reset_reclaims_without_releasing() {
        let mut arena = IdentityArena::new();
        arena.intern(b"name");
        let blocks = arena.block_count();
        arena.reset();
        assert_eq!(arena.symbol_count(), 0);
        assert_eq!(arena.block_count(), blocks);
        let symbol = arena.intern(b"other");
        assert_eq!(arena.resolve(symbol), b"other");
    }

    #[test]
    #[should_panic(expected = "exceeds the arena block size")]
    fn test_oversized_symbol_panics() {
        let mut arena = IdentityArena::new();
        let oversized = vec![b'x'; BLOCK_SIZE + 1];
        arena.intern(&oversized);
    }
}
