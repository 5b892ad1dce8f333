//! Encoding DBN records into DBN, Zstandard-compressed or not.
mod sync;
pub use sync::{Encoder, MetadataEncoder, RecordEncoder};
