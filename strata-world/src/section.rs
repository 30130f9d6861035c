//! A single 16x16x16 block volume plus its biome sub-palette, as stored
//! inside one vertical slice of a [`crate::Column`].

use std::io::{Result, Write};

use strata_utils::codec::VarInt;
use strata_utils::serial::WriteTo;

use crate::bit_storage::BitStorage;
use crate::palette::{Palette, PaletteLimits};

/// A palette plus the bit storage it indexes, bundled with the limits that
/// govern promotion. Used for both the 4096-entry block-state array and the
/// 64-entry biome array of a section.
#[derive(Debug, Clone)]
pub struct PaletteKind {
    limits: PaletteLimits,
    palette: Palette,
    storage: BitStorage,
}

impl PaletteKind {
    #[must_use]
    pub fn new(limits: PaletteLimits, default_state: i32) -> Self {
        Self {
            limits,
            palette: Palette::singleton(default_state),
            storage: BitStorage::new(0, limits.storage_size),
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> i32 {
        if matches!(self.palette, Palette::Singleton(_)) {
            return self.palette.id_to_state(0);
        }
        let id = self.storage.get(index).expect("index within storage_size") as i32;
        self.palette.id_to_state(id)
    }

    pub fn set(&mut self, index: usize, state: i32) {
        loop {
            match self.palette.state_to_id(state) {
                Some(id) => {
                    if let Palette::Singleton(only) = self.palette {
                        if only == state {
                            return;
                        }
                    }
                    self.storage
                        .set(index, id as u64)
                        .expect("index within storage_size");
                    return;
                }
                None => self.promote(),
            }
        }
    }

    fn promote(&mut self) {
        let new_palette = self.palette.promoted(self.limits);
        let new_bits = match &new_palette {
            Palette::List { .. } | Palette::Map { .. } => bits_for_max_id(&new_palette),
            Palette::Global => self.limits.global_bits,
            Palette::Singleton(_) => 0,
        };
        let mut new_storage = BitStorage::new(new_bits, self.limits.storage_size);
        let mut rebuilt_palette = new_palette;

        for index in 0..self.limits.storage_size {
            let state = self.get(index);
            let id = rebuilt_palette
                .state_to_id(state)
                .expect("freshly widened palette has room for every prior state");
            new_storage
                .set(index, id as u64)
                .expect("index within storage_size");
        }

        self.palette = rebuilt_palette;
        self.storage = new_storage;
    }
}

impl WriteTo for PaletteKind {
    /// `u8(bitsPerEntry)` ‖ palette body ‖ `varint(dataWordCount)` ‖ words.
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        let bits = self.storage.bits_per_entry();
        (bits as u8).write(writer)?;
        match &self.palette {
            Palette::Singleton(state) => VarInt(*state).write(writer)?,
            Palette::List { data, .. } => {
                VarInt::from(data.len()).write(writer)?;
                for state in data {
                    VarInt(*state).write(writer)?;
                }
            }
            Palette::Map { id_to_state, .. } => {
                VarInt::from(id_to_state.len()).write(writer)?;
                for state in id_to_state {
                    VarInt(*state).write(writer)?;
                }
            }
            Palette::Global => {}
        }
        let words = self.storage.data();
        VarInt::from(words.len()).write(writer)?;
        for word in words {
            word.write(writer)?;
        }
        Ok(())
    }
}

fn bits_for_max_id(palette: &Palette) -> u32 {
    match palette {
        Palette::List { max_id, .. } | Palette::Map { max_id, .. } => {
            32 - max_id.max(&0).unsigned_abs().leading_zeros()
        }
        _ => 0,
    }
}

/// One 16x16x16 block volume with its own block-state palette and biome
/// sub-palette, plus a running count of non-air blocks used for the
/// section-presence bitmask in `ChunkData`.
#[derive(Debug, Clone)]
pub struct ChunkSection {
    block_count: i16,
    blocks: PaletteKind,
    biomes: PaletteKind,
    air_state: i32,
}

impl ChunkSection {
    #[must_use]
    pub fn new(air_state: i32, default_biome: i32) -> Self {
        Self {
            block_count: 0,
            blocks: PaletteKind::new(PaletteLimits::CHUNK, air_state),
            biomes: PaletteKind::new(PaletteLimits::BIOME, default_biome),
            air_state,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.block_count == 0
    }

    #[must_use]
    pub fn block_count(&self) -> i16 {
        self.block_count
    }

    /// `(x, y, z)` are each in `0..16`; returns the block-state ID.
    #[must_use]
    pub fn block(&self, x: usize, y: usize, z: usize) -> i32 {
        self.blocks.get(section_index(x, y, z))
    }

    pub fn set_block(&mut self, x: usize, y: usize, z: usize, state: i32) {
        let index = section_index(x, y, z);
        let was_air = self.block(x, y, z) == self.air_state;
        let is_air = state == self.air_state;
        self.blocks.set(index, state);
        match (was_air, is_air) {
            (true, false) => self.block_count += 1,
            (false, true) => self.block_count -= 1,
            _ => {}
        }
    }

    #[must_use]
    pub fn biome(&self, x: usize, y: usize, z: usize) -> i32 {
        self.biomes.get(biome_index(x, y, z))
    }

    pub fn set_biome(&mut self, x: usize, y: usize, z: usize, biome: i32) {
        self.biomes.set(biome_index(x, y, z), biome);
    }

    #[must_use]
    pub fn block_palette(&self) -> &PaletteKind {
        &self.blocks
    }

    #[must_use]
    pub fn biome_palette(&self) -> &PaletteKind {
        &self.biomes
    }
}

impl WriteTo for ChunkSection {
    /// `i16(blockCount)` ‖ block sub-palette ‖ biome sub-palette.
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        self.block_count.write(writer)?;
        self.blocks.write(writer)?;
        self.biomes.write(writer)
    }
}

/// `y<<8 | z<<4 | x`, the standard in-section block index.
fn section_index(x: usize, y: usize, z: usize) -> usize {
    (y << 8) | (z << 4) | x
}

/// Each biome cell covers a 4x4x4 block region, giving a 4x4x4 = 64-entry
/// array per section.
fn biome_index(x: usize, y: usize, z: usize) -> usize {
    ((y / 4) << 4) | ((z / 4) << 2) | (x / 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_reports_air_everywhere() {
        let section = ChunkSection::new(0, 1);
        assert!(section.is_empty());
        assert_eq!(section.block(3, 3, 3), 0);
    }

    #[test]
    fn block_count_tracks_air_transitions() {
        let mut section = ChunkSection::new(0, 1);
        section.set_block(1, 1, 1, 5);
        assert_eq!(section.block_count(), 1);
        section.set_block(1, 2, 1, 6);
        assert_eq!(section.block_count(), 2);
        section.set_block(1, 1, 1, 0);
        assert_eq!(section.block_count(), 1);
        assert!(!section.is_empty());
    }

    #[test]
    fn writing_past_the_list_palette_promotes_without_losing_data() {
        let mut section = ChunkSection::new(0, 1);
        for state in 1..40 {
            section.set_block(state % 16, state / 16, 0, state as i32);
        }
        for state in 1..40 {
            assert_eq!(
                section.block(state % 16, state / 16, 0),
                state as i32,
                "state at {state} must survive palette promotion"
            );
        }
    }

    #[test]
    fn biome_cells_cover_four_by_four_by_four_regions() {
        let mut section = ChunkSection::new(0, 0);
        section.set_biome(0, 0, 0, 3);
        assert_eq!(section.biome(1, 2, 3), 3);
        assert_eq!(section.biome(4, 0, 0), 0);
    }
}
