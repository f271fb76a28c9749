//! Render surface
//!
//! Owns the display backend and its glyph cache and turns a [`Message`] into
//! the two raw lines the controller expects.

use panel_protocol::{Cell, Line, Message, LINE_WIDTH, MAX_SYMBOLS_PER_MESSAGE};
use tracing::warn;

use crate::backend::{DisplayBackend, DisplayError, RawLine};
use crate::glyph_cache::GlyphCache;

/// The one place that writes to the display
pub struct Surface<D: DisplayBackend> {
    backend: D,
    cache: GlyphCache,
    last: Option<Message>,
}

impl<D: DisplayBackend> Surface<D> {
    /// Take ownership of a backend, clear it and preload the glyph slots
    pub fn new(mut backend: D) -> Result<Self, DisplayError> {
        backend.clear()?;
        let cache = GlyphCache::new(&mut backend)?;
        Ok(Self {
            backend,
            cache,
            last: None,
        })
    }

    /// Show `message`
    ///
    /// A message with more distinct symbols than glyph slots is a caller
    /// bug: it fails with [`DisplayError::TooManyGlyphs`] (and asserts in
    /// debug builds) without touching the display.
    pub fn render(&mut self, message: &Message) -> Result<(), DisplayError> {
        let distinct = message.distinct_symbols().len();
        debug_assert!(
            distinct <= MAX_SYMBOLS_PER_MESSAGE,
            "message uses {} symbols, only {} glyph slots",
            distinct,
            MAX_SYMBOLS_PER_MESSAGE
        );
        if distinct > MAX_SYMBOLS_PER_MESSAGE {
            warn!("refusing to render message with {} symbols", distinct);
            return Err(DisplayError::TooManyGlyphs);
        }

        let line_one = self.resolve(&message.line_one)?;
        let line_two = self.resolve(&message.line_two)?;
        self.backend.write(&line_one, &line_two)?;
        self.last = Some(message.clone());
        Ok(())
    }

    /// Blank the display
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.last = None;
        self.backend.clear()
    }

    /// Most recently rendered message
    pub fn last(&self) -> Option<&Message> {
        self.last.as_ref()
    }

    pub fn backend(&self) -> &D {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut D {
        &mut self.backend
    }

    pub fn glyph_cache(&self) -> &GlyphCache {
        &self.cache
    }

    fn resolve(&mut self, line: &Line) -> Result<RawLine, DisplayError> {
        let mut raw = [b' '; LINE_WIDTH];
        for (out, cell) in raw.iter_mut().zip(line.cells()) {
            *out = match cell {
                Cell::Char(b) => *b,
                Cell::Glyph(symbol) => self.cache.get_slot(*symbol, &mut self.backend)?,
            };
        }
        Ok(raw)
    }
}
