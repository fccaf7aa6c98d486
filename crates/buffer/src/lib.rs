//! Line store and viewport mapping for linedit.
//!
//! [`TextBuffer`] keeps the document as a rope of terminated lines and
//! addresses it with grapheme-column [`Point`]s. [`WrapMap`] projects it
//! onto a fixed-width window, wrapping lazily and invalidating on edit.

mod buffer;
pub mod coords;
mod indent;
mod point;
pub mod words;
mod wrap;
mod wrap_map;

pub use buffer::{Deletion, TextBuffer};
pub use indent::{leading_whitespace, IndentType};
pub use point::{Point, Range};
pub use wrap::{
    display_width, narrow_glyph_width, unicode_glyph_width, wrap_line, GlyphWidth, WrapOptions,
    WrappedSegment,
};
pub use wrap_map::WrapMap;
