use std::fmt;
use std::fs::File;
use std::mem::size_of;
use std::path::Path;

use log::debug;

use crate::error::{MapFileError, Result};
use crate::layout::{element_offset, record, records};
use crate::records::{
    Coordinate, FileHeader, MapFeature, StringEntry, TileBlockHeader, TileHeaderEntry,
    MAPT_MAGIC, MAPT_VERSION,
};
use crate::text::Utf16Str;

const FILE_HEADER_SIZE: u64 = size_of::<FileHeader>() as u64;
const TILE_BLOCK_HEADER_SIZE: u64 = size_of::<TileBlockHeader>() as u64;
const CODE_UNIT_SIZE: u64 = 2;

enum Backing {
    #[cfg(feature = "mmap")]
    Mapped(memmap2::Mmap),
    Owned(Vec<u8>),
}

impl Backing {
    #[inline]
    fn bytes(&self) -> &[u8] {
        match self {
            #[cfg(feature = "mmap")]
            Backing::Mapped(map) => &map[..],
            Backing::Owned(bytes) => bytes.as_slice(),
        }
    }
}

/// A read-only MAPT file.
///
/// Construction validates the file header and the tile directory; a
/// `DataFile` is never handed out half-initialised. The mapping is released
/// when the value is dropped. All accessors borrow from the backing bytes,
/// so the file can be queried from many threads at once.
pub struct DataFile {
    backing: Backing,
    tile_count: u32,
}

impl DataFile {
    /// Memory-map `path`.
    #[cfg(feature = "mmap")]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        // Safety: the map is read-only and nothing in this process writes the
        // file while it is mapped.
        let map = unsafe { memmap2::MmapOptions::new().map(&file)? };
        debug!(
            "mapped {} ({} bytes)",
            path.as_ref().display(),
            map.len()
        );
        Self::from_backing(Backing::Mapped(map))
    }

    #[cfg(not(feature = "mmap"))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path.as_ref())?;
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(&mut file, &mut bytes)?;
        debug!("read {} ({} bytes)", path.as_ref().display(), bytes.len());
        Self::from_backing(Backing::Owned(bytes))
    }

    /// Use an in-memory copy of a MAPT file.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_backing(Backing::Owned(bytes))
    }

    fn from_backing(backing: Backing) -> Result<Self> {
        let bytes = backing.bytes();
        let header: &FileHeader = record(bytes, 0)?;

        if header.magic() != MAPT_MAGIC {
            return Err(MapFileError::BadMagic {
                found: header.magic(),
            });
        }
        if header.version() != MAPT_VERSION {
            return Err(MapFileError::UnsupportedVersion(header.version()));
        }

        let tile_count = header.tile_count();
        records::<TileHeaderEntry>(bytes, FILE_HEADER_SIZE, tile_count as usize)?;

        Ok(Self {
            backing,
            tile_count,
        })
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        self.backing.bytes()
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }

    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    /// The tile directory. Its extent was checked in the constructor.
    pub fn tile_entries(&self) -> &[TileHeaderEntry] {
        let start = FILE_HEADER_SIZE as usize;
        let end = start + self.tile_count as usize * size_of::<TileHeaderEntry>();
        bytemuck::cast_slice(&self.bytes()[start..end])
    }

    pub fn tile_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.tile_entries().iter().map(TileHeaderEntry::id)
    }

    /// Find a tile by id with a linear scan of the directory. The first entry
    /// with a matching id wins; `Ok(None)` when no entry matches.
    pub fn locate_tile(&self, tile_id: i32) -> Result<Option<Tile<'_>>> {
        match self.tile_entries().iter().find(|entry| entry.id() == tile_id) {
            Some(entry) => Tile::at(self.bytes(), tile_id, entry.offset_in_bytes()).map(Some),
            None => Ok(None),
        }
    }
}

/// One tile block, borrowed from a [`DataFile`].
#[derive(Clone, Copy)]
pub struct Tile<'a> {
    bytes: &'a [u8],
    id: i32,
    offset: u64,
    header: TileBlockHeader,
}

impl fmt::Debug for Tile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("id", &self.id)
            .field("offset", &self.offset)
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

impl<'a> Tile<'a> {
    fn at(bytes: &'a [u8], id: i32, offset: u64) -> Result<Self> {
        let header: TileBlockHeader = *record(bytes, offset)?;

        // Every array the block points at has to lie inside the file.
        let features_base = offset
            .checked_add(TILE_BLOCK_HEADER_SIZE)
            .ok_or(MapFileError::OutOfBounds {
                offset,
                len: TILE_BLOCK_HEADER_SIZE,
                size: bytes.len() as u64,
            })?;
        records::<MapFeature>(bytes, features_base, header.features_count() as usize)?;
        records::<Coordinate>(
            bytes,
            header.coordinates_offset_in_bytes(),
            header.coordinates_count() as usize,
        )?;
        records::<StringEntry>(
            bytes,
            header.strings_offset_in_bytes(),
            header.strings_count() as usize,
        )?;
        records::<[u8; 2]>(
            bytes,
            header.characters_offset_in_bytes(),
            header.characters_count() as usize,
        )?;

        Ok(Self {
            bytes,
            id,
            offset,
            header,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    /// Byte offset of the tile block within the file.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn header(&self) -> &TileBlockHeader {
        &self.header
    }

    pub fn features_count(&self) -> u32 {
        self.header.features_count()
    }

    pub fn feature(&self, index: u32) -> Result<&'a MapFeature> {
        check_index("feature", index as u64, self.header.features_count() as u64)?;
        let base = self.offset + TILE_BLOCK_HEADER_SIZE;
        record(self.bytes, element_offset::<MapFeature>(self.bytes, base, index as u64)?)
    }

    pub fn features(&self) -> impl Iterator<Item = Result<&'a MapFeature>> + 'a {
        let tile = *self;
        (0..tile.features_count()).map(move |index| tile.feature(index))
    }

    /// The feature's vertices, viewed in place.
    pub fn coordinates(&self, feature: &MapFeature) -> Result<&'a [Coordinate]> {
        let start = feature.coordinate_offset() as u64;
        let count = feature.coordinate_count() as u64;
        check_range(
            "coordinate",
            start,
            count,
            self.header.coordinates_count() as u64,
        )?;

        let base = self.header.coordinates_offset_in_bytes();
        records(
            self.bytes,
            element_offset::<Coordinate>(self.bytes, base, start)?,
            count as usize,
        )
    }

    pub fn string(&self, index: u32) -> Result<Utf16Str<'a>> {
        check_index("string", index as u64, self.header.strings_count() as u64)?;

        let entry: &StringEntry = record(
            self.bytes,
            element_offset::<StringEntry>(
                self.bytes,
                self.header.strings_offset_in_bytes(),
                index as u64,
            )?,
        )?;
        let (start, len) = (entry.offset() as u64, entry.length() as u64);
        check_range(
            "character",
            start,
            len,
            self.header.characters_count() as u64,
        )?;

        let chars_at = self.header.characters_offset_in_bytes() + start * CODE_UNIT_SIZE;
        let units = records::<[u8; 2]>(self.bytes, chars_at, len as usize)?;
        Ok(Utf16Str::from_units(units))
    }

    /// Key and value stored at string slots `slot` and `slot + 1`.
    ///
    /// Pairs always start at an even slot; an odd `slot` is a usage error.
    pub fn property(&self, slot: u32) -> Result<(Utf16Str<'a>, Utf16Str<'a>)> {
        if slot % 2 != 0 {
            return Err(MapFileError::OddPropertySlot(slot));
        }

        let value_slot = slot.checked_add(1).ok_or(MapFileError::CountOutOfRange {
            what: "string",
            index: slot as u64 + 1,
            count: self.header.strings_count() as u64,
        })?;

        Ok((self.string(slot)?, self.string(value_slot)?))
    }

    /// All key/value pairs of `feature`, in file order.
    pub fn properties(
        &self,
        feature: &MapFeature,
    ) -> impl Iterator<Item = Result<(Utf16Str<'a>, Utf16Str<'a>)>> + 'a {
        let tile = *self;
        let first = feature.properties_offset() as u64;
        let strings_count = tile.header.strings_count() as u64;

        (0..feature.property_count() as u64).map(move |pair| {
            let slot = first + pair * 2;
            let slot = u32::try_from(slot).map_err(|_| MapFileError::CountOutOfRange {
                what: "string",
                index: slot,
                count: strings_count,
            })?;
            tile.property(slot)
        })
    }

    /// The feature's label, empty when it has none.
    pub fn label(&self, feature: &MapFeature) -> Result<Utf16Str<'a>> {
        match feature.label_offset() {
            Some(slot) => self.string(slot),
            None => Ok(Utf16Str::default()),
        }
    }
}

#[inline]
fn check_index(what: &'static str, index: u64, count: u64) -> Result<()> {
    if index < count {
        Ok(())
    } else {
        Err(MapFileError::CountOutOfRange { what, index, count })
    }
}

#[inline]
fn check_range(what: &'static str, start: u64, len: u64, count: u64) -> Result<()> {
    match start.checked_add(len) {
        Some(end) if end <= count => Ok(()),
        _ => Err(MapFileError::CountOutOfRange {
            what,
            index: start.saturating_add(len),
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::GeometryType;
    use crate::writer::{FeatureSpec, TileFileBuilder, TileSpec};

    fn sample_file() -> DataFile {
        let mut builder = TileFileBuilder::new();
        builder.add_tile(
            TileSpec::new(7)
                .with_feature(
                    FeatureSpec::new(100, GeometryType::Line)
                        .with_coordinates([(1.0, 2.0), (3.0, 4.0)])
                        .with_label("Main Street")
                        .with_tag("highway", "primary")
                        .with_tag("lanes", "2"),
                )
                .with_feature(
                    FeatureSpec::new(101, GeometryType::Point)
                        .with_coordinates([(5.0, 6.0)])
                        .with_tag("place", "city"),
                ),
        );
        builder.add_tile(TileSpec::new(3));
        DataFile::from_bytes(builder.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn accessors_return_written_values() {
        let file = sample_file();
        assert_eq!(file.tile_count(), 2);
        assert_eq!(file.tile_ids().collect::<Vec<_>>(), vec![7, 3]);

        let tile = file.locate_tile(7).unwrap().unwrap();
        assert_eq!(tile.id(), 7);
        assert_eq!(tile.features_count(), 2);
        assert_eq!(tile.header().coordinates_count(), 3);

        let road = tile.feature(0).unwrap();
        assert_eq!(road.id(), 100);
        assert_eq!(road.geometry_type().unwrap(), GeometryType::Line);

        let coords = tile.coordinates(road).unwrap();
        let pairs: Vec<_> = coords
            .iter()
            .map(|c| (c.latitude(), c.longitude()))
            .collect();
        assert_eq!(pairs, vec![(1.0, 2.0), (3.0, 4.0)]);

        assert_eq!(tile.label(road).unwrap().to_string(), "Main Street");

        let tags: Vec<(String, String)> = tile
            .properties(road)
            .map(|kv| {
                let (k, v) = kv.unwrap();
                (k.to_string(), v.to_string())
            })
            .collect();
        assert_eq!(
            tags,
            vec![
                ("highway".to_string(), "primary".to_string()),
                ("lanes".to_string(), "2".to_string()),
            ]
        );

        let place = tile.feature(1).unwrap();
        assert!(tile.label(place).unwrap().is_empty());
        let (key, value) = tile.property(place.properties_offset()).unwrap();
        assert!(key.eq_str("place"));
        assert!(value.eq_str("city"));
    }

    #[test]
    fn tile_debug_leaves_out_file_bytes() {
        let file = sample_file();
        let tile = file.locate_tile(7).unwrap().unwrap();
        let shown = format!("{tile:?}");

        assert!(shown.starts_with("Tile { id: 7, offset: "), "{shown}");
        assert!(shown.contains("features_count"), "{shown}");
        assert!(!shown.contains("bytes"), "{shown}");
        assert!(shown.len() < file.len() * 2, "{shown}");
    }

    #[test]
    fn views_point_into_the_backing_buffer() {
        let file = sample_file();
        let range = file.bytes().as_ptr_range();
        let tile = file.locate_tile(7).unwrap().unwrap();
        let feature = tile.feature(0).unwrap();

        let feature_ptr = feature as *const MapFeature as *const u8;
        assert!(range.contains(&feature_ptr));

        let coords = tile.coordinates(feature).unwrap();
        assert!(range.contains(&(coords.as_ptr() as *const u8)));

        let label = tile.label(feature).unwrap();
        assert!(range.contains(&label.as_bytes().as_ptr()));
    }

    #[test]
    fn locates_every_tile_by_linear_scan() {
        let ids = [42, -5, 9, 1000, 0, 17];
        let mut builder = TileFileBuilder::new();
        for id in ids {
            builder.add_tile(
                TileSpec::new(id).with_feature(
                    FeatureSpec::new(id as i64 * 10, GeometryType::Point)
                        .with_coordinates([(0.0, 0.0)]),
                ),
            );
        }
        let file = DataFile::from_bytes(builder.to_bytes().unwrap()).unwrap();

        for id in ids {
            let tile = file.locate_tile(id).unwrap().unwrap();
            assert_eq!(tile.id(), id);
            assert_eq!(tile.feature(0).unwrap().id(), id as i64 * 10);
        }
        assert!(file.locate_tile(12345).unwrap().is_none());
    }

    #[test]
    fn duplicate_ids_resolve_to_first_entry() {
        let mut builder = TileFileBuilder::new();
        builder.add_tile(
            TileSpec::new(1)
                .with_feature(FeatureSpec::new(1, GeometryType::Point).with_coordinates([(0.0, 0.0)])),
        );
        builder.add_tile(
            TileSpec::new(1)
                .with_feature(FeatureSpec::new(2, GeometryType::Point).with_coordinates([(0.0, 0.0)])),
        );
        let file = DataFile::from_bytes(builder.to_bytes().unwrap()).unwrap();

        let tile = file.locate_tile(1).unwrap().unwrap();
        assert_eq!(tile.feature(0).unwrap().id(), 1);
    }

    #[test]
    fn odd_property_slot_is_a_usage_error() {
        let file = sample_file();
        let tile = file.locate_tile(7).unwrap().unwrap();
        let err = tile.property(1).unwrap_err();
        assert!(matches!(err, MapFileError::OddPropertySlot(1)));
        assert!(err.is_usage_error());
    }

    #[test]
    fn indices_past_counts_are_integrity_errors() {
        let file = sample_file();
        let tile = file.locate_tile(7).unwrap().unwrap();

        assert!(matches!(
            tile.feature(2),
            Err(MapFileError::CountOutOfRange { what: "feature", .. })
        ));
        assert!(tile.string(tile.header().strings_count()).is_err());

        let bogus = MapFeature::new(9, GeometryType::Line, 2, 5, -1, 0, 0);
        assert!(matches!(
            tile.coordinates(&bogus),
            Err(MapFileError::CountOutOfRange {
                what: "coordinate",
                ..
            })
        ));
    }

    #[test]
    fn rejects_foreign_and_truncated_files() {
        assert!(matches!(
            DataFile::from_bytes(b"MAPX\x01\0\0\0\0\0\0\0".to_vec()),
            Err(MapFileError::BadMagic { .. })
        ));
        assert!(matches!(
            DataFile::from_bytes(b"MAPT".to_vec()),
            Err(MapFileError::OutOfBounds { .. })
        ));

        let mut bytes = sample_file().bytes().to_vec();
        bytes[4] = 9;
        assert!(matches!(
            DataFile::from_bytes(bytes),
            Err(MapFileError::UnsupportedVersion(9))
        ));

        // Directory claims more tiles than the file holds.
        let mut bytes = sample_file().bytes().to_vec();
        bytes[8..12].copy_from_slice(&1_000u32.to_le_bytes());
        assert!(matches!(
            DataFile::from_bytes(bytes),
            Err(MapFileError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn tile_block_past_end_fails_on_locate() {
        let bytes = sample_file().bytes().to_vec();
        let truncated = bytes[..bytes.len() - 4].to_vec();
        let file = DataFile::from_bytes(truncated).unwrap();

        // Tile 3 is written last, so its block header is what got cut.
        assert!(file.locate_tile(7).unwrap().is_some());
        assert!(matches!(
            file.locate_tile(3),
            Err(MapFileError::OutOfBounds { .. })
        ));
    }
}
