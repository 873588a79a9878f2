use crate::types::*;
use std::collections::BTreeMap;
use tracing::debug;

mod degenerate;
mod packing;
mod tally;

pub use packing::{pack_stock, PackedStock};

/// Cuts required pieces from a catalogue of stock bar lengths.
///
/// Both strategies are greedy heuristics and make no optimality claim. Output
/// depends only on the inputs and their order.
#[derive(Debug, Clone)]
pub struct StockOptimizer {
    stock_options: Vec<StockOption>,
}

impl StockOptimizer {
    /// Validates the catalogue and builds a new optimizer instance.
    pub fn new(stock_options: Vec<StockOption>) -> Result<Self> {
        if stock_options.is_empty() {
            return Err(CalculationError::EmptyCatalogue);
        }

        for stock in &stock_options {
            if !stock.length.is_finite() || stock.length <= 0.0 {
                return Err(CalculationError::InvalidInput(format!(
                    "Stock '{}' has non-positive length {}",
                    stock.name, stock.length
                )));
            }
        }

        Ok(Self { stock_options })
    }

    pub fn stock_options(&self) -> &[StockOption] {
        &self.stock_options
    }

    /// Bar used for pieces that fit nothing, and reported when nothing is cut.
    fn fallback_stock(&self) -> &StockOption {
        &self.stock_options[0]
    }

    /// Picks the single stock size with the lowest wastage percentage for
    /// `total_pieces` pieces of one length.
    ///
    /// Earlier catalogue entries win ties. When no size holds even one piece
    /// every piece gets its own bar of the first catalogue entry.
    pub fn optimize_single(&self, required_length: f64, total_pieces: u32) -> Result<StockBreakdown> {
        check_piece_length(required_length)?;

        if total_pieces == 0 {
            return Ok(self.empty_breakdown(PackingStrategy::SingleLength, Some(required_length)));
        }

        let mut best: Option<(&StockOption, u32, u32, f64)> = None;

        for stock in &self.stock_options {
            let pieces_per_stock = (stock.length / required_length).floor() as u32;
            if pieces_per_stock == 0 {
                continue;
            }

            let stocks_needed = total_pieces.div_ceil(pieces_per_stock);
            let total_length = stocks_needed as f64 * stock.length;
            let wastage = total_length - total_pieces as f64 * required_length;
            let wastage_percent = percent(wastage, total_length);

            match best {
                Some((_, _, _, best_percent)) if wastage_percent >= best_percent => {}
                _ => best = Some((stock, pieces_per_stock, stocks_needed, wastage_percent)),
            }
        }

        let Some((stock, pieces_per_stock, stocks_needed, _)) = best else {
            return Ok(self.degenerate_single(required_length, total_pieces));
        };

        debug!(
            "Single-length {}mm x{}: {} bars of {}",
            required_length, total_pieces, stocks_needed, stock.name
        );

        let mut cutting_plans = Vec::with_capacity(stocks_needed as usize);
        let mut remaining = total_pieces;
        for i in 0..stocks_needed {
            let count = pieces_per_stock.min(remaining);
            cutting_plans.push(CuttingPlan {
                stock_index: i + 1,
                stock_name: stock.name.clone(),
                stock_length: stock.length,
                pieces: vec![required_length; count as usize],
                piece_types: Vec::new(),
                wastage: stock.length - count as f64 * required_length,
                oversized: false,
            });
            remaining -= count;
        }

        let total_stock_length = stocks_needed as f64 * stock.length;
        let total_wastage = total_stock_length - total_pieces as f64 * required_length;

        Ok(StockBreakdown {
            stock_length: stock.length,
            stock_name: stock.name.clone(),
            stocks_needed,
            pieces_per_stock: pieces_per_stock as f64,
            total_pieces,
            total_wastage,
            wastage_percent: percent(total_wastage, total_stock_length),
            total_stock_length,
            strategy: PackingStrategy::SingleLength,
            required_length: Some(required_length),
            cutting_plans,
            piece_breakdown: None,
            all_stock_counts: None,
        })
    }

    /// Packs mixed piece lengths bar by bar.
    ///
    /// Each round simulates filling one bar of every stock size from the
    /// pieces still outstanding, keeps the size with the least leftover and
    /// commits it. Pieces that fit no size end up on dedicated bars.
    pub fn optimize_combined(&self, requirements: &[PieceRequirement]) -> Result<StockBreakdown> {
        for req in requirements {
            check_piece_length(req.length)?;
        }

        let mut remaining: Vec<PieceRequirement> = requirements
            .iter()
            .filter(|r| r.count > 0)
            .cloned()
            .collect();

        if remaining.is_empty() {
            return Ok(self.empty_breakdown(PackingStrategy::GreedyCombined, None));
        }

        let mut tally = tally::Tally::default();

        while !remaining.is_empty() {
            let mut best: Option<(&StockOption, PackedStock)> = None;

            for stock in &self.stock_options {
                let packed = pack_stock(stock, &remaining);
                if packed.placed.is_empty() {
                    continue;
                }
                match &best {
                    Some((_, best_packed)) if packed.wastage >= best_packed.wastage => {}
                    _ => best = Some((stock, packed)),
                }
            }

            let Some((stock, packed)) = best else {
                break;
            };

            let mut pieces = Vec::with_capacity(packed.placed.len());
            let mut piece_types = Vec::with_capacity(packed.placed.len());
            for &idx in &packed.placed {
                let req = &mut remaining[idx];
                req.count -= 1;
                pieces.push(req.length);
                piece_types.push(req.kind);
            }

            tally.commit(stock, pieces, piece_types, packed.wastage, false);
            remaining.retain(|r| r.count > 0);
        }

        let strategy = if remaining.is_empty() {
            PackingStrategy::GreedyCombined
        } else {
            self.degenerate_remaining(&remaining, &mut tally);
            PackingStrategy::Degenerate
        };

        Ok(tally.into_breakdown(&self.stock_options, strategy))
    }

    fn empty_breakdown(&self, strategy: PackingStrategy, required_length: Option<f64>) -> StockBreakdown {
        let stock = self.fallback_stock();
        let combined = strategy != PackingStrategy::SingleLength;
        StockBreakdown {
            stock_length: stock.length,
            stock_name: stock.name.clone(),
            stocks_needed: 0,
            pieces_per_stock: 0.0,
            total_pieces: 0,
            total_wastage: 0.0,
            wastage_percent: 0.0,
            total_stock_length: 0.0,
            strategy,
            required_length,
            cutting_plans: Vec::new(),
            piece_breakdown: combined.then(BTreeMap::new),
            all_stock_counts: combined.then(BTreeMap::new),
        }
    }
}

fn check_piece_length(length: f64) -> Result<()> {
    if !length.is_finite() || length <= 0.0 {
        return Err(CalculationError::InvalidPieceLength { length });
    }
    Ok(())
}

/// `part / whole * 100`, or 0 when nothing was consumed.
pub(crate) fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
