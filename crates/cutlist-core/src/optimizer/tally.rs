use super::*;

/// Running totals of committed bars.
#[derive(Debug, Default)]
pub(super) struct Tally {
    cutting_plans: Vec<CuttingPlan>,
    stock_counts: BTreeMap<String, u32>,
    piece_breakdown: BTreeMap<String, u32>,
    total_stock_length: f64,
    total_wastage: f64,
    total_pieces: u32,
}

impl Tally {
    /// Records one cut bar.
    pub(super) fn commit(
        &mut self,
        stock: &StockOption,
        pieces: Vec<f64>,
        piece_types: Vec<PieceKind>,
        wastage: f64,
        oversized: bool,
    ) {
        *self.stock_counts.entry(stock.name.clone()).or_insert(0) += 1;
        for kind in &piece_types {
            *self.piece_breakdown.entry(kind.to_string()).or_insert(0) += 1;
        }

        self.total_stock_length += stock.length;
        self.total_wastage += wastage;
        self.total_pieces += pieces.len() as u32;

        self.cutting_plans.push(CuttingPlan {
            stock_index: self.cutting_plans.len() as u32 + 1,
            stock_name: stock.name.clone(),
            stock_length: stock.length,
            pieces,
            piece_types,
            wastage,
            oversized,
        });
    }

    /// The stock size used for the most bars. Ties go to the earlier
    /// catalogue entry.
    fn primary_stock<'a>(&self, catalogue: &'a [StockOption]) -> &'a StockOption {
        let mut primary = &catalogue[0];
        let mut most = 0;
        for stock in catalogue {
            let count = self.stock_counts.get(&stock.name).copied().unwrap_or(0);
            if count > most {
                primary = stock;
                most = count;
            }
        }
        primary
    }

    pub(super) fn into_breakdown(
        self,
        catalogue: &[StockOption],
        strategy: PackingStrategy,
    ) -> StockBreakdown {
        let primary = self.primary_stock(catalogue);
        let stocks_needed = self.cutting_plans.len() as u32;
        let pieces_per_stock = if stocks_needed > 0 {
            self.total_pieces as f64 / stocks_needed as f64
        } else {
            0.0
        };

        StockBreakdown {
            stock_length: primary.length,
            stock_name: primary.name.clone(),
            stocks_needed,
            pieces_per_stock,
            total_pieces: self.total_pieces,
            total_wastage: self.total_wastage,
            wastage_percent: percent(self.total_wastage, self.total_stock_length),
            total_stock_length: self.total_stock_length,
            strategy,
            required_length: None,
            cutting_plans: self.cutting_plans,
            piece_breakdown: Some(self.piece_breakdown),
            all_stock_counts: Some(self.stock_counts),
        }
    }
}
