//! Mapping turns onto compression bands by relative position

use crate::types::{Band, Turn};

/// Position of turn `index` out of `total`, as a percentage
pub fn turn_position(index: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * index as f64 / total as f64
}

/// First band (in list order) containing each turn's position, if any
pub fn map_bands(turns: &[Turn], bands: &[Band]) -> Vec<Option<Band>> {
    let total = turns.len();
    turns
        .iter()
        .map(|turn| {
            let position = turn_position(turn.index, total);
            bands.iter().find(|band| band.contains(position)).copied()
        })
        .collect()
}
