//! A crate for reading and writing Databento Binary Encoding (DBN) files and streams.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(clippy::missing_errors_doc)]

pub mod compat;
pub mod decode;
pub mod encode;
pub mod enums;
pub mod error;
pub mod flags;
pub mod macros;
pub mod metadata;
pub mod pretty;
pub mod publishers;
pub mod record;
pub mod record_enum;
pub mod record_ref;
pub mod symbol_map;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod v1;
pub mod v2;
pub mod v3;

pub use crate::{
    compat::{InstrumentDefRec, SymbolMappingRec},
    enums::*,
    error::{Error, Result},
    flags::FlagSet,
    metadata::{MappingInterval, Metadata, MetadataBuilder, SymbolMapping},
    record::*,
    record_enum::{RecordEnum, RecordRefEnum},
    record_ref::RecordRef,
    symbol_map::{PitSymbolMap, SymbolIndex, TsSymbolMap},
};

/// The current version of the DBN encoding that this crate encodes by default, which
/// is different from the crate version. DBN version 3 is also supported for decoding
/// and can be requested explicitly for encoding.
pub const DBN_VERSION: u8 = 2;
const METADATA_DATASET_CSTR_LEN: usize = 16;
/// The number of bytes reserved for future use in the metadata header of DBN version 2
/// and 3 files, following the addition of the `ts_out` flag and `symbol_cstr_len`.
const METADATA_RESERVED_LEN: usize = 53;
/// Excludes magic string, version, and length.
const METADATA_FIXED_LEN: usize = 100;
/// The width in bytes of fixed-length symbol fields in DBN version 2 and 3 records.
const SYMBOL_CSTR_LEN: usize = compat::SYMBOL_CSTR_LEN_V2;
const NULL_LIMIT: u64 = 0;
const NULL_RECORD_COUNT: u64 = u64::MAX;
const NULL_SCHEMA: u16 = u16::MAX;
const NULL_STYPE: u8 = u8::MAX;

/// The maximum size in bytes of any DBN record.
pub const MAX_RECORD_LEN: usize = std::mem::size_of::<record::WithTsOut<v3::InstrumentDefMsg>>();

/// The denominator of fixed prices in DBN.
pub const FIXED_PRICE_SCALE: i64 = 1_000_000_000;
/// The sentinel value for an unset or null price.
pub const UNDEF_PRICE: i64 = i64::MIN;
/// The sentinel value for an unset or null order quantity.
pub const UNDEF_ORDER_SIZE: u32 = u32::MAX;
/// The sentinel value for an unset or null stat quantity.
pub const UNDEF_STAT_QUANTITY: i32 = i32::MAX;
/// The sentinel value for an unset or null timestamp.
pub const UNDEF_TIMESTAMP: u64 = u64::MAX;

/// Contains dataset code constants.
pub mod datasets {
    /// The dataset code for CME Globex MDP 3.0.
    pub const GLBX_MDP3: &str = "GLBX.MDP3";
    /// The dataset code for Nasdaq TotalView ITCH.
    pub const XNAS_ITCH: &str = "XNAS.ITCH";
}
