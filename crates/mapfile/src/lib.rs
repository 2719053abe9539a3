//! MAPT: memory-mapped map tiles with interned UTF-16 strings.
//!
//! File layout (little-endian, every record packed):
//!   00  : FileHeader        magic b"MAPT", u32 version = 1, u32 tile_count
//!   0C  : TileHeaderEntry[tile_count]   { i32 id, u64 offset_in_bytes }
//!   ..  : per tile, at its offset_in_bytes:
//!           TileBlockHeader   { u32 features, coordinates, strings, characters;
//!                               u64 coordinates_at, strings_at, characters_at }
//!           MapFeature[features]
//!           Coordinate[coordinates]    (at coordinates_at)  { f64 lat, f64 lon }
//!           StringEntry[strings]       (at strings_at)      { u32 offset, u32 length }
//!           u16[characters]            (at characters_at)   UTF-16 code units
//!
//! A feature's tags are `property_count` key/value pairs stored in
//! consecutive string slots from `properties_offset` (always even). The label,
//! if any, is the single string at `label_offset`.
//!
//! Nothing is copied out of the file while traversing it: features,
//! coordinate runs and strings are borrowed views into the mapping.

pub mod error;
pub mod layout;
pub mod query;
pub mod reader;
pub mod records;
pub mod tags;
pub mod text;
pub mod tiling;
pub mod writer;

pub use error::{MapFileError, Result};
pub use query::{BoundingBox, MapFeatureData};
pub use reader::{DataFile, Tile};
pub use records::{
    Coordinate, FileHeader, GeometryType, MapFeature, StringEntry, TileBlockHeader,
    TileHeaderEntry, MAPT_MAGIC, MAPT_VERSION,
};
pub use tags::ClassifiedTags;
pub use text::Utf16Str;
pub use tiling::{GridTiling, SpatialIndex};
pub use writer::{FeatureSpec, TileFileBuilder, TileSpec};
