use crate::chunk::block::BlockState;
use crate::chunk::column::DecodedColumn;
use crate::chunk::heightmap::Heightmap;
use crate::chunk::palette::PalettedData;
use crate::chunk::section::{Section, BIOMES_PER_SECTION, BLOCKS_PER_SECTION, DEFAULT_BIOME};
use crate::chunk::status::ChunkStatus;
use crate::logger::{log, LogSeverity};
use std::io::{self, Cursor};
use std::sync::Arc;
use surveyor_common::error::DecodeError;
use surveyor_common::pos::ChunkPos;
use surveyor_common::shape::WorldShape;
use surveyor_nbt::{NbtFile, Tag};

const WORLD_SURFACE: &str = "WORLD_SURFACE";

/// Parses a raw stored record into its NBT root, sniffing the
/// compression scheme from the leading bytes. Region records are
/// usually zlib, standalone dumps gzip, test fixtures sometimes plain.
pub fn parse_record(raw: &[u8]) -> io::Result<Tag> {
    let mut cursor = Cursor::new(raw);

    let file = match raw {
        [0x1f, 0x8b, ..] => NbtFile::read_gzip(&mut cursor)?,
        [0x78, ..] => NbtFile::read_zlib(&mut cursor)?,
        _ => NbtFile::read(&mut cursor)?,
    };

    Ok(file.root)
}

fn log_recoverable(pos: ChunkPos, y: i32, message: &str) {
    log(
        format!(
            "Recoverable errors when loading section [{}, {}, {}]: {}",
            pos.x, y, pos.z, message
        ),
        LogSeverity::Warning,
    );
}

/// Decodes a chunk record into a read-only column view.
///
/// Columns below "full" are rejected, except those carrying the initial
/// "empty" marker: the data-fixer upgrade path stamps that marker onto
/// chunks that actually hold complete legacy terrain, and those render
/// fine. The heightmap is adopted from the record when stored, and
/// recomputed from section contents otherwise.
pub fn decode_column(
    record: &Tag,
    pos: ChunkPos,
    shape: WorldShape,
) -> Result<DecodedColumn, DecodeError> {
    if record.as_compound().is_none() {
        return Err(DecodeError::Corrupt {
            x: pos.x,
            z: pos.z,
            message: "record root is not a compound".to_string(),
        });
    }

    let status = ChunkStatus::from_id(record.get_str("Status").unwrap_or(""));
    if !status.is_at_least(ChunkStatus::Full) && status != ChunkStatus::Empty {
        return Err(DecodeError::NotGenerated);
    }

    let mut sections: Vec<Option<Section>> = Vec::with_capacity(shape.section_count());
    for _ in 0..shape.section_count() {
        sections.push(None);
    }

    let empty_list = Vec::new();
    let section_tags = record.get_list("sections").unwrap_or(&empty_list);

    for section_tag in section_tags {
        let y = i32::from(section_tag.get_i8("Y").unwrap_or(0));
        let slot = shape.section_slot(y);
        if slot < 0 || slot as usize >= sections.len() {
            // sections outside the world's vertical range are dropped
            continue;
        }

        let block_states = match section_tag.get("block_states") {
            Some(tag) => {
                let (data, quirks) = decode_block_container(tag).map_err(|message| {
                    DecodeError::Corrupt {
                        x: pos.x,
                        z: pos.z,
                        message,
                    }
                })?;
                for quirk in &quirks {
                    log_recoverable(pos, y, quirk);
                }
                data
            }
            None => PalettedData::single(BlockState::air(), BLOCKS_PER_SECTION),
        };

        let biomes = match section_tag.get("biomes") {
            Some(tag) => {
                let (data, quirks) = decode_biome_container(tag).map_err(|message| {
                    DecodeError::Corrupt {
                        x: pos.x,
                        z: pos.z,
                        message,
                    }
                })?;
                for quirk in &quirks {
                    log_recoverable(pos, y, quirk);
                }
                data
            }
            None => PalettedData::single(Arc::from(DEFAULT_BIOME), BIOMES_PER_SECTION),
        };

        sections[slot as usize] = Some(Section::new(block_states, biomes));
    }

    // Stored heightmaps live at the record root; upgraded legacy chunks
    // still carry them under the old "Level" child.
    let heightmaps = record
        .get("Heightmaps")
        .or_else(|| record.get("Level").and_then(|level| level.get("Heightmaps")));

    let heightmap = match heightmaps.and_then(|tag| tag.get_long_array(WORLD_SURFACE)) {
        Some(longs) => Heightmap::from_longs(longs, shape),
        None => Heightmap::populate(&sections, shape),
    };

    Ok(DecodedColumn::new(pos, shape, sections, heightmap))
}

fn data_longs(tag: &Tag) -> Option<Vec<u64>> {
    tag.get_long_array("data")
        .map(|longs| longs.iter().map(|&long| long as u64).collect())
}

fn decode_block_container(
    tag: &Tag,
) -> Result<(PalettedData<BlockState>, Vec<String>), String> {
    let palette_tags = tag
        .get_list("palette")
        .ok_or_else(|| "block_states has no palette".to_string())?;

    let mut quirks = Vec::new();
    let mut palette = Vec::with_capacity(palette_tags.len());

    for entry in palette_tags {
        match entry.get_str("Name") {
            Some(name) => {
                let mut properties = Vec::new();
                if let Some(props) = entry.get_compound("Properties") {
                    for (key, value) in props {
                        if let Some(value) = value.as_str() {
                            properties.push((key.clone(), value.to_string()));
                        }
                    }
                    // property order must not depend on map iteration
                    properties.sort();
                }
                palette.push(BlockState::with_properties(name, properties));
            }
            None => {
                quirks.push("palette entry without a Name, substituting air".to_string());
                palette.push(BlockState::air());
            }
        }
    }

    let (data, mut parse_quirks) =
        PalettedData::from_parts(palette, data_longs(tag), BLOCKS_PER_SECTION, 4)?;
    quirks.append(&mut parse_quirks);
    Ok((data, quirks))
}

fn decode_biome_container(
    tag: &Tag,
) -> Result<(PalettedData<Arc<str>>, Vec<String>), String> {
    let palette_tags = tag
        .get_list("palette")
        .ok_or_else(|| "biomes has no palette".to_string())?;

    let mut quirks = Vec::new();
    let mut palette = Vec::with_capacity(palette_tags.len());

    for entry in palette_tags {
        match entry.as_str() {
            Some(name) => palette.push(Arc::from(name)),
            None => {
                quirks.push("biome palette entry is not a string".to_string());
                palette.push(Arc::from(DEFAULT_BIOME));
            }
        }
    }

    let (data, mut parse_quirks) =
        PalettedData::from_parts(palette, data_longs(tag), BIOMES_PER_SECTION, 0)?;
    quirks.append(&mut parse_quirks);
    Ok((data, quirks))
}
