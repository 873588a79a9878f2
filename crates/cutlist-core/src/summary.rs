//! Section and project roll-ups of optimized materials.

use crate::optimizer::percent;
use crate::types::{ComponentGroup, DimensionGlassInfo, MaterialRequirement, MaterialSummary};
use std::collections::BTreeMap;

/// Totals and stock histograms for one section.
///
/// Stock usage counts every bar of every size, not just the primary size of
/// each breakdown. Histograms are bucketed by each material's group.
pub fn summarize_section(
    materials: &[MaterialRequirement],
    glass_info: &[DimensionGlassInfo],
) -> MaterialSummary {
    let mut summary = MaterialSummary::default();

    for material in materials {
        let breakdown = &material.stock_breakdown;
        summary.total_material += material.total_required;
        summary.total_stock_used += breakdown.total_stock_length;
        summary.total_wastage += breakdown.total_wastage;

        for plan in &breakdown.cutting_plans {
            let offcut = plan.wastage > 0.0;
            bump(&mut summary.stock_summary, &plan.stock_name, true);
            bump(&mut summary.wastage_pieces_summary, &plan.stock_name, offcut);

            let (stock, wastage) = match material.group {
                ComponentGroup::Frame => (
                    &mut summary.frame_stock_summary,
                    &mut summary.frame_wastage_pieces_summary,
                ),
                ComponentGroup::Shutter => (
                    &mut summary.shutter_stock_summary,
                    &mut summary.shutter_wastage_pieces_summary,
                ),
                ComponentGroup::Interlock => (
                    &mut summary.interlock_stock_summary,
                    &mut summary.interlock_wastage_pieces_summary,
                ),
                ComponentGroup::TrackRail => continue,
            };
            bump(stock, &plan.stock_name, true);
            bump(wastage, &plan.stock_name, offcut);
        }
    }

    for info in glass_info {
        summary.total_glass_area += info.glass_area;
        summary.total_mosquito_area += info.mosquito_area;
    }

    summary.wastage_percent = percent(summary.total_wastage, summary.total_stock_used);
    summary
}

/// Field-wise sum of section summaries. The wastage percentage is recomputed
/// from the summed totals rather than averaged.
pub fn combine_summaries<'a, I>(summaries: I) -> MaterialSummary
where
    I: IntoIterator<Item = &'a MaterialSummary>,
{
    let mut combined = MaterialSummary::default();

    for s in summaries {
        combined.total_material += s.total_material;
        combined.total_stock_used += s.total_stock_used;
        combined.total_wastage += s.total_wastage;
        combined.total_glass_area += s.total_glass_area;
        combined.total_mosquito_area += s.total_mosquito_area;

        merge(&mut combined.stock_summary, &s.stock_summary);
        merge(&mut combined.frame_stock_summary, &s.frame_stock_summary);
        merge(&mut combined.shutter_stock_summary, &s.shutter_stock_summary);
        merge(&mut combined.interlock_stock_summary, &s.interlock_stock_summary);
        merge(&mut combined.wastage_pieces_summary, &s.wastage_pieces_summary);
        merge(&mut combined.frame_wastage_pieces_summary, &s.frame_wastage_pieces_summary);
        merge(&mut combined.shutter_wastage_pieces_summary, &s.shutter_wastage_pieces_summary);
        merge(
            &mut combined.interlock_wastage_pieces_summary,
            &s.interlock_wastage_pieces_summary,
        );
    }

    combined.wastage_percent = percent(combined.total_wastage, combined.total_stock_used);
    combined
}

fn bump(histogram: &mut BTreeMap<String, u32>, stock_name: &str, counted: bool) {
    if counted {
        *histogram.entry(stock_name.to_string()).or_insert(0) += 1;
    }
}

fn merge(into: &mut BTreeMap<String, u32>, from: &BTreeMap<String, u32>) {
    for (name, count) in from {
        *into.entry(name.clone()).or_insert(0) += count;
    }
}
