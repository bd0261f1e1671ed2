//! Collision-avoiding object names.
//!
//! A naming template mixes literal text with `{command arg...}`
//! placeholders:
//!
//! - `{chars N}` - N random base36 characters from the OS CSPRNG
//! - `{pick FILE}` - a random non-empty line of a word list
//!
//! [`NameGenerator`] resolves a template, appends the file extension and
//! checks the catalog, retrying within a fixed budget. It never writes: the
//! caller inserts the name, and the catalog's unique constraint settles any
//! race between two ingestions that picked the same name.

mod generator;
mod template;
mod wordlist;

pub(crate) use generator::random_base36;
pub use generator::{NameGenerator, DEFAULT_MAX_ATTEMPTS};
pub use template::{NameTemplate, Placeholder, Segment};
pub use wordlist::WordListCache;
