//! Item collections, uniform random draws and the result lifecycle of a
//! single picker session. Everything here is synchronous and free of I/O;
//! pacing and transport live in the callers.

pub mod collection;
pub mod draw;
pub mod error;
pub mod item;
pub mod random;
pub mod session;

pub use collection::Collection;
pub use draw::{draw, ensure_drawable, Drawn, DEFAULT_DRAW_DELAY};
pub use error::PickError;
pub use item::Item;
pub use random::{FixedSource, RandomSource, RngSource};
pub use session::{PickerSession, Reveal};
