//! In-memory cache index.
//!
//! The [`CacheIndex`] maps every level known to exist to a [`Slot`]. The key
//! set is fixed when the index is built; only the slots change. A slot is
//! `Loaded` while its isoline is resident and falls back to `Unloaded` when
//! the bounded store evicts it, after which the factory reloads it from the
//! archive on demand.

mod index;

pub use index::{CacheIndex, Slot};
