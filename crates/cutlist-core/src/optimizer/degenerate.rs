use super::*;
use tracing::warn;

impl StockOptimizer {
    /// One bar of the first catalogue entry per piece, for a length that
    /// fits no stock size.
    pub(super) fn degenerate_single(&self, required_length: f64, total_pieces: u32) -> StockBreakdown {
        let stock = self.fallback_stock();
        warn!(
            "{} piece(s) of {}mm fit no stock size; assigning one {} bar each",
            total_pieces, required_length, stock.name
        );

        let mut tally = tally::Tally::default();
        for _ in 0..total_pieces {
            tally.commit(
                stock,
                vec![required_length],
                Vec::new(),
                stock.length - required_length,
                true,
            );
        }

        let mut breakdown = tally.into_breakdown(&self.stock_options, PackingStrategy::Degenerate);
        breakdown.required_length = Some(required_length);
        breakdown.piece_breakdown = None;
        breakdown
    }

    /// Gives every outstanding piece its own bar of the first catalogue entry.
    /// Bars already committed by the greedy pass are kept.
    pub(super) fn degenerate_remaining(&self, remaining: &[PieceRequirement], tally: &mut tally::Tally) {
        let stock = self.fallback_stock();
        let oversized: Vec<f64> = remaining.iter().map(|r| r.length).collect();
        warn!(
            "Pieces {:?}mm fit no stock size; assigning one {} bar per piece",
            oversized, stock.name
        );

        for req in remaining {
            for _ in 0..req.count {
                tally.commit(
                    stock,
                    vec![req.length],
                    vec![req.kind],
                    stock.length - req.length,
                    true,
                );
            }
        }
    }
}
