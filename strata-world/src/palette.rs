//! The four palette variants mapping a block-state (or biome) ID to a
//! compact local storage ID, and the promotion chain between them.

use std::collections::HashMap;

/// Bit-width and capacity limits for one kind of palette (block-state vs.
/// biome), per `wiki.vg`'s chunk format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteLimits {
    pub min_bits: u32,
    pub max_bits: u32,
    pub storage_size: usize,
    pub global_bits: u32,
}

impl PaletteLimits {
    pub const CHUNK: Self = Self {
        min_bits: 4,
        max_bits: 8,
        storage_size: 4096,
        global_bits: 14,
    };

    pub const BIOME: Self = Self {
        min_bits: 1,
        max_bits: 3,
        storage_size: 64,
        global_bits: 4,
    };
}

/// Maps between a 32-bit state ID and the compact local ID a [`crate::BitStorage`]
/// entry actually holds.
#[derive(Debug, Clone)]
pub enum Palette {
    /// Exactly one state is known; no storage backs it.
    Singleton(i32),
    /// Small linear-scan palette, used while `bits <= limits.min_bits`.
    List { max_id: i32, data: Vec<i32> },
    /// Hash-indexed palette, used once the list grows past `min_bits`.
    Map {
        max_id: i32,
        id_to_state: Vec<i32>,
        state_to_id: HashMap<i32, i32>,
    },
    /// One-to-one passthrough: the storage cell value *is* the state.
    Global,
}

impl Palette {
    #[must_use]
    pub fn singleton(state: i32) -> Self {
        Self::Singleton(state)
    }

    #[must_use]
    pub fn new_list(bits: u32) -> Self {
        let max_id = (1i32 << bits) - 1;
        Self::List {
            max_id,
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn new_map(bits: u32) -> Self {
        let max_id = (1i32 << bits) - 1;
        Self::Map {
            max_id,
            id_to_state: Vec::new(),
            state_to_id: HashMap::new(),
        }
    }

    #[must_use]
    pub fn global() -> Self {
        Self::Global
    }

    /// Known entry count.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Singleton(_) => 1,
            Self::List { data, .. } => data.len(),
            Self::Map { id_to_state, .. } => id_to_state.len(),
            Self::Global => usize::MAX,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Singleton(_)) || self.len() == 0
    }

    /// Looks up (and if capacity allows, allocates) the local ID for `state`.
    /// Returns `None` when the palette is full and must be promoted by the
    /// caller.
    pub fn state_to_id(&mut self, state: i32) -> Option<i32> {
        match self {
            Self::Singleton(known) => (*known == state).then_some(0),
            Self::List { max_id, data } => {
                if let Some(pos) = data.iter().position(|&s| s == state) {
                    return Some(pos as i32);
                }
                let next_id = data.len() as i32;
                if next_id > *max_id {
                    return None;
                }
                data.push(state);
                Some(next_id)
            }
            Self::Map {
                max_id,
                id_to_state,
                state_to_id,
            } => {
                if let Some(&id) = state_to_id.get(&state) {
                    return Some(id);
                }
                let next_id = id_to_state.len() as i32;
                if next_id > *max_id {
                    return None;
                }
                id_to_state.push(state);
                state_to_id.insert(state, next_id);
                Some(next_id)
            }
            Self::Global => Some(state),
        }
    }

    #[must_use]
    pub fn id_to_state(&self, id: i32) -> i32 {
        match self {
            Self::Singleton(state) => {
                if id == 0 {
                    *state
                } else {
                    0
                }
            }
            Self::List { data, .. } => data.get(id as usize).copied().unwrap_or(0),
            Self::Map { id_to_state, .. } => id_to_state.get(id as usize).copied().unwrap_or(0),
            Self::Global => id,
        }
    }

    /// The bit width the next promotion step should use, given this
    /// palette's current state and the limits it is governed by.
    #[must_use]
    pub fn promoted(&self, limits: PaletteLimits) -> Self {
        let next_bits = match self {
            Self::Singleton(_) => limits.min_bits,
            Self::List { .. } => current_bits(self) + 1,
            Self::Map { .. } => current_bits(self) + 1,
            Self::Global => return Self::Global,
        };

        if next_bits > limits.max_bits {
            Self::global()
        } else if next_bits <= limits.min_bits {
            Self::new_list(next_bits)
        } else {
            Self::new_map(next_bits)
        }
    }
}

fn current_bits(palette: &Palette) -> u32 {
    let max_id = match palette {
        Palette::List { max_id, .. } | Palette::Map { max_id, .. } => *max_id,
        _ => return 0,
    };
    32 - (max_id.max(0) as u32).leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_palette_allocates_sequentially_from_zero() {
        let mut palette = Palette::new_list(4);
        assert_eq!(palette.state_to_id(100), Some(0));
        assert_eq!(palette.state_to_id(200), Some(1));
        assert_eq!(palette.state_to_id(100), Some(0));
        assert_eq!(palette.id_to_state(0), 100);
        assert_eq!(palette.id_to_state(1), 200);
    }

    #[test]
    fn map_palette_allocates_sequentially_from_zero() {
        let mut palette = Palette::new_map(5);
        assert_eq!(palette.state_to_id(7), Some(0));
        assert_eq!(palette.state_to_id(8), Some(1));
        assert_eq!(palette.id_to_state(0), 7);
    }

    #[test]
    fn palette_promotion_preserves_ids_via_rebuild() {
        let limits = PaletteLimits::CHUNK;
        let mut old = Palette::new_list(4);
        for state in 0..16 {
            old.state_to_id(state).unwrap();
        }
        assert_eq!(old.state_to_id(16), None, "list palette is full");

        let mut new = old.promoted(limits);
        for id in 0..16 {
            let state = old.id_to_state(id);
            let new_id = new.state_to_id(state).unwrap();
            assert_eq!(new_id, id, "promotion must preserve existing IDs");
        }
    }

    #[test]
    fn full_map_palette_promotes_to_global_past_max_bits() {
        let limits = PaletteLimits::CHUNK;
        let full_map = Palette::Map {
            max_id: (1 << limits.max_bits) - 1,
            id_to_state: vec![0; 1 << limits.max_bits],
            state_to_id: HashMap::new(),
        };
        assert!(matches!(full_map.promoted(limits), Palette::Global));
    }
}
