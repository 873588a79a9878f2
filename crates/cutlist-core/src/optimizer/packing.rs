use super::*;
use std::cmp::Ordering;

/// Simulated fill of one bar
#[derive(Debug, Clone, PartialEq)]
pub struct PackedStock {
    /// Indices into the requirement slice, one per placed piece, in cut order
    pub placed: Vec<usize>,
    pub used_length: f64,
    pub wastage: f64,
    /// Pieces still outstanding after this bar
    pub remaining: u32,
}

/// Fills one bar of `stock` from `remaining`, longest pieces first.
///
/// Pure: works on a scratch copy of the counts, so the same pool can be
/// tried against every stock size.
pub fn pack_stock(stock: &StockOption, remaining: &[PieceRequirement]) -> PackedStock {
    let mut counts: Vec<u32> = remaining.iter().map(|r| r.count).collect();

    let mut order: Vec<usize> = (0..remaining.len()).collect();
    order.sort_by(|&a, &b| {
        remaining[b]
            .length
            .partial_cmp(&remaining[a].length)
            .unwrap_or(Ordering::Equal)
    });

    let mut placed = Vec::new();
    let mut used_length = 0.0;

    for idx in order {
        let length = remaining[idx].length;
        while counts[idx] > 0 && used_length + length <= stock.length {
            placed.push(idx);
            used_length += length;
            counts[idx] -= 1;
        }
    }

    PackedStock {
        placed,
        used_length,
        wastage: stock.length - used_length,
        remaining: counts.iter().sum(),
    }
}
