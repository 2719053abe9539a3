//! MAPT encoder for in-memory tiles.
//!
//! Used to produce fixtures and demo files. Per tile the block is laid out as
//! `TileBlockHeader | MapFeature[] | Coordinate[] | StringEntry[] | u16[]`.
//! Property pairs of every feature are written before any label, so each
//! feature's `properties_offset` is even. Identical strings share characters.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Write};
use std::mem::size_of;
use std::path::Path;

use bytemuck::bytes_of;

use crate::records::{
    Coordinate, FileHeader, GeometryType, MapFeature, StringEntry, TileBlockHeader,
    TileHeaderEntry,
};

#[derive(Debug, Clone)]
pub struct FeatureSpec {
    pub id: i64,
    pub geometry: GeometryType,
    /// `(latitude, longitude)` pairs.
    pub coordinates: Vec<(f64, f64)>,
    pub label: Option<String>,
    pub tags: Vec<(String, String)>,
}

impl FeatureSpec {
    pub fn new(id: i64, geometry: GeometryType) -> Self {
        Self {
            id,
            geometry,
            coordinates: Vec::new(),
            label: None,
            tags: Vec::new(),
        }
    }

    pub fn with_coordinates<I: IntoIterator<Item = (f64, f64)>>(mut self, coordinates: I) -> Self {
        self.coordinates.extend(coordinates);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct TileSpec {
    pub id: i32,
    pub features: Vec<FeatureSpec>,
}

impl TileSpec {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            features: Vec::new(),
        }
    }

    pub fn with_feature(mut self, feature: FeatureSpec) -> Self {
        self.features.push(feature);
        self
    }
}

#[derive(Debug, Default, Clone)]
pub struct TileFileBuilder {
    tiles: Vec<TileSpec>,
}

impl TileFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiles are written (and listed in the directory) in insertion order.
    pub fn add_tile(&mut self, tile: TileSpec) -> &mut Self {
        self.tiles.push(tile);
        self
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let tile_count = to_u32(self.tiles.len(), "tile count")?;
        let mut position =
            (size_of::<FileHeader>() + self.tiles.len() * size_of::<TileHeaderEntry>()) as u64;

        let mut directory = Vec::with_capacity(self.tiles.len());
        let mut blocks = Vec::with_capacity(self.tiles.len());
        for tile in &self.tiles {
            let block = encode_tile(tile, position)?;
            directory.push(TileHeaderEntry::new(tile.id, position));
            position += block.len() as u64;
            blocks.push(block);
        }

        out.write_all(bytes_of(&FileHeader::new(tile_count)))?;
        for entry in &directory {
            out.write_all(bytes_of(entry))?;
        }
        for block in &blocks {
            out.write_all(block)?;
        }

        out.flush()
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write_to(&mut file)
    }
}

#[derive(Default)]
struct StringTable {
    entries: Vec<StringEntry>,
    chars: Vec<u16>,
    interned: HashMap<String, StringEntry>,
}

impl StringTable {
    fn push(&mut self, text: &str) -> io::Result<u32> {
        let entry = match self.interned.get(text) {
            Some(entry) => *entry,
            None => {
                let offset = to_u32(self.chars.len(), "character count")?;
                self.chars.extend(text.encode_utf16());
                let length = to_u32(self.chars.len() - offset as usize, "string length")?;
                let entry = StringEntry::new(offset, length);
                self.interned.insert(text.to_owned(), entry);
                entry
            }
        };

        let slot = to_u32(self.entries.len(), "string count")?;
        self.entries.push(entry);
        Ok(slot)
    }
}

fn encode_tile(tile: &TileSpec, start: u64) -> io::Result<Vec<u8>> {
    let mut strings = StringTable::default();
    let mut coordinates = Vec::<Coordinate>::new();

    let mut property_slots = Vec::with_capacity(tile.features.len());
    for feature in &tile.features {
        let first = to_u32(strings.entries.len(), "string count")?;
        for (key, value) in &feature.tags {
            strings.push(key)?;
            strings.push(value)?;
        }
        property_slots.push(first);
    }

    let mut features = Vec::with_capacity(tile.features.len());
    for (feature, properties_offset) in tile.features.iter().zip(property_slots) {
        let label_offset = match &feature.label {
            Some(label) => i32::try_from(strings.push(label)?)
                .map_err(|_| invalid("label slot exceeds i32"))?,
            None => -1,
        };

        let coordinate_offset = to_u32(coordinates.len(), "coordinate count")?;
        coordinates.extend(
            feature
                .coordinates
                .iter()
                .map(|&(lat, lon)| Coordinate::new(lat, lon)),
        );

        features.push(MapFeature::new(
            feature.id,
            feature.geometry,
            coordinate_offset,
            to_u32(feature.coordinates.len(), "coordinate count")?,
            label_offset,
            properties_offset,
            to_u32(feature.tags.len(), "property count")?,
        ));
    }

    let features_at = start + size_of::<TileBlockHeader>() as u64;
    let coordinates_at = features_at + (features.len() * size_of::<MapFeature>()) as u64;
    let strings_at = coordinates_at + (coordinates.len() * size_of::<Coordinate>()) as u64;
    let characters_at = strings_at + (strings.entries.len() * size_of::<StringEntry>()) as u64;

    let header = TileBlockHeader::new(
        to_u32(features.len(), "feature count")?,
        to_u32(coordinates.len(), "coordinate count")?,
        to_u32(strings.entries.len(), "string count")?,
        to_u32(strings.chars.len(), "character count")?,
        coordinates_at,
        strings_at,
        characters_at,
    );

    let mut block = Vec::new();
    block.extend_from_slice(bytes_of(&header));
    block.extend_from_slice(bytemuck::cast_slice(&features));
    block.extend_from_slice(bytemuck::cast_slice(&coordinates));
    block.extend_from_slice(bytemuck::cast_slice(&strings.entries));
    for unit in &strings.chars {
        block.extend_from_slice(&unit.to_le_bytes());
    }

    Ok(block)
}

#[cold]
fn invalid(msg: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidInput, msg.to_owned())
}

#[inline]
fn to_u32(n: usize, what: &str) -> io::Result<u32> {
    u32::try_from(n).map_err(|_| invalid(&format!("{what} exceeds u32")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_just_a_header() {
        let bytes = TileFileBuilder::new().to_bytes().unwrap();
        assert_eq!(bytes.len(), size_of::<FileHeader>());
        assert_eq!(&bytes[..4], b"MAPT");
    }

    #[test]
    fn property_offsets_are_even_even_with_labels() {
        let tile = TileSpec::new(1)
            .with_feature(
                FeatureSpec::new(1, GeometryType::Point)
                    .with_label("a")
                    .with_tag("k", "v"),
            )
            .with_feature(
                FeatureSpec::new(2, GeometryType::Point)
                    .with_label("b")
                    .with_tag("k2", "v2")
                    .with_tag("k3", "v3"),
            );

        let block = encode_tile(&tile, 0).unwrap();
        let header: &TileBlockHeader = bytemuck::from_bytes(&block[..40]);
        let features: &[MapFeature] = bytemuck::cast_slice(&block[40..40 + 2 * 29]);

        assert_eq!(header.strings_count(), 8);
        assert_eq!(features[0].properties_offset(), 0);
        assert_eq!(features[1].properties_offset(), 2);
        assert_eq!(features[0].label_offset(), Some(6));
        assert_eq!(features[1].label_offset(), Some(7));
    }

    #[test]
    fn repeated_strings_share_characters() {
        let tile = TileSpec::new(1)
            .with_feature(FeatureSpec::new(1, GeometryType::Line).with_tag("highway", "primary"))
            .with_feature(FeatureSpec::new(2, GeometryType::Line).with_tag("highway", "primary"));

        let block = encode_tile(&tile, 0).unwrap();
        let header: &TileBlockHeader = bytemuck::from_bytes(&block[..40]);
        assert_eq!(header.strings_count(), 4);
        assert_eq!(
            header.characters_count() as usize,
            "highway".len() + "primary".len()
        );
    }
}
