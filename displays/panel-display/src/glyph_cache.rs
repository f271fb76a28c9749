//! Least-recently-used mapping of logical symbols onto glyph slots
//!
//! The display has eight programmable characters but the console knows more
//! symbols than that. The cache keeps the eight most recently requested
//! symbols resident and reprograms the least recently used slot on a miss.
//! Recency spans calls, so a symbol that every refresh asks for (the AM/PM
//! marker of the clock) is never the one evicted.

use heapless::Vec;
use panel_protocol::{Symbol, GLYPH_SLOTS};
use tracing::trace;

use crate::backend::{DisplayBackend, DisplayError};

/// Symbol to slot mapping with LRU reuse order
#[derive(Debug, Clone)]
pub struct GlyphCache {
    /// Symbol currently programmed into each slot
    slots: [Symbol; GLYPH_SLOTS],
    /// Slot numbers, least recently used first
    order: Vec<u8, GLYPH_SLOTS>,
}

impl GlyphCache {
    /// Program slots 0..8 with symbols 0..8 and start with slot 0 as the
    /// eviction candidate
    pub fn new<D: DisplayBackend>(backend: &mut D) -> Result<Self, DisplayError> {
        let mut slots = [Symbol::Backslash; GLYPH_SLOTS];
        let mut order = Vec::new();
        for (slot, symbol) in Symbol::ALL.iter().take(GLYPH_SLOTS).enumerate() {
            backend.program_glyph(slot as u8, &symbol.bitmap())?;
            slots[slot] = *symbol;
            let _ = order.push(slot as u8);
        }
        Ok(Self { slots, order })
    }

    /// Slot holding `symbol`, programming it on a miss
    ///
    /// A hit marks the symbol most recently used. A miss evicts the least
    /// recently used slot, writes the bitmap through `backend` and returns
    /// the reused slot. If programming fails the slot is left as it was.
    pub fn get_slot<D: DisplayBackend>(
        &mut self,
        symbol: Symbol,
        backend: &mut D,
    ) -> Result<u8, DisplayError> {
        if let Some(slot) = self.lookup(symbol) {
            self.touch(slot);
            return Ok(slot);
        }

        let slot = self.order.first().copied().ok_or(DisplayError::InvalidSlot)?;
        backend.program_glyph(slot, &symbol.bitmap())?;
        trace!(
            "glyph slot {} reprogrammed: {:?} -> {:?}",
            slot,
            self.slots[slot as usize],
            symbol
        );
        self.slots[slot as usize] = symbol;
        self.touch(slot);
        Ok(slot)
    }

    /// Slot of a resident symbol, without changing recency
    pub fn lookup(&self, symbol: Symbol) -> Option<u8> {
        self.slots
            .iter()
            .position(|s| *s == symbol)
            .map(|slot| slot as u8)
    }

    /// Symbol programmed into `slot`
    pub fn symbol_at(&self, slot: u8) -> Option<Symbol> {
        self.slots.get(slot as usize).copied()
    }

    /// Resident symbols, least recently used first
    pub fn resident(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.order.iter().map(|slot| self.slots[*slot as usize])
    }

    fn touch(&mut self, slot: u8) {
        if let Some(pos) = self.order.iter().position(|s| *s == slot) {
            self.order.remove(pos);
            let _ = self.order.push(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDisplay;

    fn setup() -> (MemoryDisplay, GlyphCache) {
        let mut display = MemoryDisplay::new();
        let cache = GlyphCache::new(&mut display).unwrap();
        (display, cache)
    }

    #[test]
    fn test_preloads_first_eight() {
        let (display, cache) = setup();
        for (slot, symbol) in Symbol::ALL.iter().take(GLYPH_SLOTS).enumerate() {
            assert_eq!(cache.lookup(*symbol), Some(slot as u8));
            assert_eq!(display.glyph(slot as u8), Some(symbol.bitmap()));
        }
        assert_eq!(display.glyph_programs(), GLYPH_SLOTS);
    }

    #[test]
    fn test_hit_does_not_reprogram() {
        let (mut display, mut cache) = setup();
        assert_eq!(cache.get_slot(Symbol::Moon, &mut display), Ok(6));
        assert_eq!(display.glyph_programs(), GLYPH_SLOTS);
    }

    #[test]
    fn test_miss_evicts_least_recent() {
        let (mut display, mut cache) = setup();
        // Slot 0 (Backslash) is the oldest preload
        let slot = cache.get_slot(Symbol::LeftArrow, &mut display).unwrap();
        assert_eq!(slot, 0);
        assert_eq!(cache.lookup(Symbol::Backslash), None);
        assert_eq!(display.glyph(0), Some(Symbol::LeftArrow.bitmap()));
    }

    #[test]
    fn test_recently_used_symbol_is_protected() {
        let (mut display, mut cache) = setup();
        // Touch Backslash so UpArrow becomes the eviction candidate
        cache.get_slot(Symbol::Backslash, &mut display).unwrap();
        let slot = cache.get_slot(Symbol::LeftArrow, &mut display).unwrap();
        assert_eq!(slot, 1);
        assert!(cache.lookup(Symbol::Backslash).is_some());
        assert_eq!(cache.lookup(Symbol::UpArrow), None);
    }

    #[test]
    fn test_lru_across_calls() {
        let (mut display, mut cache) = setup();
        // Fill with A, B, then request C: the least recent (B after A is
        // re-requested) is evicted
        let a = Symbol::LeftArrow;
        let b = Symbol::RightArrow;
        let c = Symbol::Celsius;
        cache.get_slot(a, &mut display).unwrap();
        cache.get_slot(b, &mut display).unwrap();
        for symbol in &Symbol::ALL[2..GLYPH_SLOTS] {
            cache.get_slot(*symbol, &mut display).unwrap();
        }
        cache.get_slot(a, &mut display).unwrap();
        cache.get_slot(c, &mut display).unwrap();
        assert!(cache.lookup(a).is_some());
        assert_eq!(cache.lookup(b), None);
        assert!(cache.lookup(c).is_some());
    }

    #[test]
    fn test_failed_program_keeps_mapping() {
        let (mut display, mut cache) = setup();
        display.fail_writes(true);
        assert_eq!(
            cache.get_slot(Symbol::Celsius, &mut display),
            Err(DisplayError::Communication)
        );
        assert_eq!(cache.lookup(Symbol::Backslash), Some(0));
        assert_eq!(cache.lookup(Symbol::Celsius), None);
    }
}
