//! Sheet nesting - turn header paths and rows into nested JSON
//!
//! Headers are either plain column names (flat sheets) or paths:
//!
//! - `address.city` writes into nested objects
//! - `tags[name]` writes field `name` of the current element of the
//!   repeating group `tags`
//!
//! Flat sheets produce one object per row. Structured sheets produce a
//! single document: every row adds to the same objects and groups, and
//! empty values are pruned at the end.

pub mod types;
pub mod path;
pub mod assembler;
pub mod prune;
pub mod writer;

pub use types::{Layout, NestConfig};
pub use path::{GroupAccumulators, HeaderPath, Segment};
pub use assembler::SheetNester;
pub use prune::{prune, prune_document};
pub use writer::{DocumentWriter, OutputFormat};
