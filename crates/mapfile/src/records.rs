//! Fixed-size on-disk records.
//!
//! Every record is `#[repr(C, packed)]`, so its size is exactly the sum of its
//! fields and its alignment is 1. That lets the decoder view records at any
//! byte offset of the mapping. Fields are never borrowed (unaligned), only
//! copied out through the accessors.

use bytemuck::{Pod, Zeroable};

use crate::error::MapFileError;

#[cfg(not(target_endian = "little"))]
compile_error!("MAPT records are little-endian and viewed in place; big-endian hosts are not supported");

pub const MAPT_MAGIC: [u8; 4] = *b"MAPT";
pub const MAPT_VERSION: u32 = 1;

#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FileHeader {
    magic: [u8; 4],
    version: u32,
    tile_count: u32,
}

impl FileHeader {
    pub fn new(tile_count: u32) -> Self {
        Self {
            magic: MAPT_MAGIC,
            version: MAPT_VERSION,
            tile_count,
        }
    }

    #[inline]
    pub fn magic(&self) -> [u8; 4] {
        self.magic
    }

    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }
}

/// One entry of the tile directory that follows the [`FileHeader`].
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TileHeaderEntry {
    id: i32,
    offset_in_bytes: u64,
}

impl TileHeaderEntry {
    pub fn new(id: i32, offset_in_bytes: u64) -> Self {
        Self { id, offset_in_bytes }
    }

    #[inline]
    pub fn id(&self) -> i32 {
        self.id
    }

    #[inline]
    pub fn offset_in_bytes(&self) -> u64 {
        self.offset_in_bytes
    }
}

#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TileBlockHeader {
    features_count: u32,
    coordinates_count: u32,
    strings_count: u32,
    characters_count: u32,
    coordinates_offset_in_bytes: u64,
    strings_offset_in_bytes: u64,
    characters_offset_in_bytes: u64,
}

impl TileBlockHeader {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        features_count: u32,
        coordinates_count: u32,
        strings_count: u32,
        characters_count: u32,
        coordinates_offset_in_bytes: u64,
        strings_offset_in_bytes: u64,
        characters_offset_in_bytes: u64,
    ) -> Self {
        Self {
            features_count,
            coordinates_count,
            strings_count,
            characters_count,
            coordinates_offset_in_bytes,
            strings_offset_in_bytes,
            characters_offset_in_bytes,
        }
    }

    #[inline]
    pub fn features_count(&self) -> u32 {
        self.features_count
    }

    #[inline]
    pub fn coordinates_count(&self) -> u32 {
        self.coordinates_count
    }

    #[inline]
    pub fn strings_count(&self) -> u32 {
        self.strings_count
    }

    #[inline]
    pub fn characters_count(&self) -> u32 {
        self.characters_count
    }

    #[inline]
    pub fn coordinates_offset_in_bytes(&self) -> u64 {
        self.coordinates_offset_in_bytes
    }

    #[inline]
    pub fn strings_offset_in_bytes(&self) -> u64 {
        self.strings_offset_in_bytes
    }

    #[inline]
    pub fn characters_offset_in_bytes(&self) -> u64 {
        self.characters_offset_in_bytes
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GeometryType {
    Point = 0,
    Line = 1,
    Polygon = 2,
}

impl TryFrom<u8> for GeometryType {
    type Error = MapFileError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(GeometryType::Point),
            1 => Ok(GeometryType::Line),
            2 => Ok(GeometryType::Polygon),
            x => Err(MapFileError::UnknownGeometry(x)),
        }
    }
}

/// A feature record. `coordinate_offset` and `properties_offset` index the
/// tile's coordinate and string-entry arrays, they are not byte offsets.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MapFeature {
    id: i64,
    geometry_type: u8,
    coordinate_offset: u32,
    coordinate_count: u32,
    label_offset: i32,
    properties_offset: u32,
    property_count: u32,
}

impl MapFeature {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        geometry_type: GeometryType,
        coordinate_offset: u32,
        coordinate_count: u32,
        label_offset: i32,
        properties_offset: u32,
        property_count: u32,
    ) -> Self {
        Self {
            id,
            geometry_type: geometry_type as u8,
            coordinate_offset,
            coordinate_count,
            label_offset,
            properties_offset,
            property_count,
        }
    }

    #[inline]
    pub fn id(&self) -> i64 {
        self.id
    }

    #[inline]
    pub fn geometry_tag(&self) -> u8 {
        self.geometry_type
    }

    #[inline]
    pub fn geometry_type(&self) -> Result<GeometryType, MapFileError> {
        GeometryType::try_from(self.geometry_type)
    }

    #[inline]
    pub fn coordinate_offset(&self) -> u32 {
        self.coordinate_offset
    }

    #[inline]
    pub fn coordinate_count(&self) -> u32 {
        self.coordinate_count
    }

    /// String slot of the label, `None` when the feature has no label.
    #[inline]
    pub fn label_offset(&self) -> Option<u32> {
        let offset = self.label_offset;
        u32::try_from(offset).ok()
    }

    #[inline]
    pub fn properties_offset(&self) -> u32 {
        self.properties_offset
    }

    #[inline]
    pub fn property_count(&self) -> u32 {
        self.property_count
    }
}

#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Locates one string in the tile's character blob, in 2-byte code units.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StringEntry {
    offset: u32,
    length: u32,
}

impl StringEntry {
    pub fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }

    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn length(&self) -> u32 {
        self.length
    }
}
