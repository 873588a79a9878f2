//! Piece derivation: validated window openings to optimized material
//! requirements, one or more per structural component.

use crate::catalogue::{SectionConfiguration, SectionLookup};
use crate::format::mm_to_feet;
use crate::geometry::SectionGeometry;
use crate::optimizer::StockOptimizer;
use crate::types::*;
use crate::validation::ValidDimension;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Stock bars available to one section, per material category.
///
/// A category listed in the section's own stock map wins; anything else
/// falls back to the section type's stock lengths.
pub struct SectionStock<'a> {
    section_type_id: &'a str,
    overrides: &'a BTreeMap<StockCategory, Vec<StockOption>>,
    defaults: &'a [StockOption],
}

impl<'a> SectionStock<'a> {
    pub fn new<L: SectionLookup + ?Sized>(section: &'a WindowSection, lookup: &'a L) -> Self {
        Self {
            section_type_id: &section.section_type_id,
            overrides: &section.stock_map,
            defaults: lookup.stock_lengths(&section.section_type_id),
        }
    }

    pub fn options(&self, category: StockCategory) -> Result<Vec<StockOption>> {
        let options = match self.overrides.get(&category) {
            Some(options) if !options.is_empty() => options.as_slice(),
            _ => self.defaults,
        };

        if options.is_empty() {
            return Err(CalculationError::MissingStock {
                section_type_id: self.section_type_id.to_string(),
                category,
            });
        }
        Ok(options.to_vec())
    }

    fn optimizer(&self, category: StockCategory) -> Result<StockOptimizer> {
        StockOptimizer::new(self.options(category)?)
    }
}

/// Every cut material of a section: frame, shutters, interlock and, when the
/// section type defines one, track rail. Empty when there is nothing to cut.
pub fn derive_section_materials(
    config: &SectionConfiguration,
    dimensions: &[ValidDimension],
    stock: &SectionStock<'_>,
) -> Result<Vec<MaterialRequirement>> {
    if dimensions.is_empty() {
        return Ok(Vec::new());
    }

    let mut materials = frame_materials(config, dimensions, stock)?;
    materials.extend(shutter_materials(config, dimensions, stock)?);
    materials.push(interlock_material(config, dimensions, stock)?);
    materials.extend(track_rail_material(config, dimensions, stock)?);

    debug!(
        "Derived {} materials from {} dimensions ({} {})",
        materials.len(),
        dimensions.len(),
        config.track_type,
        config.configuration
    );

    Ok(materials)
}

/// Frame pieces are cut to the literal opening size. Widths and heights share
/// one stock pool unless the section type splits frame materials.
pub fn frame_materials(
    config: &SectionConfiguration,
    dimensions: &[ValidDimension],
    stock: &SectionStock<'_>,
) -> Result<Vec<MaterialRequirement>> {
    let widths = dimensions
        .iter()
        .map(|d| {
            Ok(PieceRequirement::new(
                ComponentGroup::Frame,
                PieceSubtype::Width,
                d.width,
                frame_count(config.frame_multiplier_width, d.quantity)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    let heights = dimensions
        .iter()
        .map(|d| {
            Ok(PieceRequirement::new(
                ComponentGroup::Frame,
                PieceSubtype::Height,
                d.height,
                frame_count(config.frame_multiplier_height, d.quantity)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    if config.different_frame_materials {
        let width_breakdown = stock
            .optimizer(StockCategory::FrameWidth)?
            .optimize_combined(&widths)?;
        let height_breakdown = stock
            .optimizer(StockCategory::FrameHeight)?
            .optimize_combined(&heights)?;

        return Ok(vec![
            material(
                "Frame (Width)",
                ComponentGroup::Frame,
                StockCategory::FrameWidth,
                &widths,
                width_breakdown,
                format!("Frame Widths: {}", describe(&widths)),
            ),
            material(
                "Frame (Height)",
                ComponentGroup::Frame,
                StockCategory::FrameHeight,
                &heights,
                height_breakdown,
                format!("Frame Heights: {}", describe(&heights)),
            ),
        ]);
    }

    let pieces: Vec<PieceRequirement> = widths.iter().chain(&heights).cloned().collect();
    let breakdown = stock
        .optimizer(StockCategory::FrameWidth)?
        .optimize_combined(&pieces)?;

    Ok(vec![material(
        "Frame (Combined)",
        ComponentGroup::Frame,
        StockCategory::FrameWidth,
        &pieces,
        breakdown,
        format!(
            "Frame: {} width + {} height",
            describe(&widths),
            describe(&heights)
        ),
    )])
}

fn frame_count(multiplier: u32, quantity: u32) -> Result<u32> {
    multiplier.checked_mul(quantity).ok_or_else(|| {
        CalculationError::InvalidInput(format!(
            "Frame multiplier {} overflows for quantity {}",
            multiplier, quantity
        ))
    })
}

/// Whether mosquito shutters are cut from their own pool.
fn splits_mosquito(config: &SectionConfiguration) -> bool {
    config.separate_mosquito_net && config.configuration == Configuration::GlassMosquito
}

/// Each shutter needs two heights and two widths at its final size.
///
/// With a separate mosquito net, one shutter per window is mesh and goes to
/// its own component; the remaining shutters are glass.
pub fn shutter_materials(
    config: &SectionConfiguration,
    dimensions: &[ValidDimension],
    stock: &SectionStock<'_>,
) -> Result<Vec<MaterialRequirement>> {
    let geometry = SectionGeometry::new(config);
    let shutters = geometry.number_of_shutters();

    let pieces_for = |subtypes: (PieceSubtype, PieceSubtype), shutters_per_window: u32| {
        let mut heights = Vec::with_capacity(dimensions.len());
        let mut widths = Vec::with_capacity(dimensions.len());
        for d in dimensions {
            let finals = geometry.final_dimensions(d.width, d.height);
            let count = 2 * shutters_per_window * d.quantity;
            heights.push(PieceRequirement::new(
                ComponentGroup::Shutter,
                subtypes.0,
                finals.height,
                count,
            ));
            widths.push(PieceRequirement::new(
                ComponentGroup::Shutter,
                subtypes.1,
                finals.shutter_width,
                count,
            ));
        }
        (heights, widths)
    };

    if splits_mosquito(config) {
        let (glass_heights, glass_widths) =
            pieces_for((PieceSubtype::GlassHeight, PieceSubtype::GlassWidth), shutters - 1);
        let (mesh_heights, mesh_widths) =
            pieces_for((PieceSubtype::MosquitoHeight, PieceSubtype::MosquitoWidth), 1);

        let glass: Vec<PieceRequirement> = glass_heights.iter().chain(&glass_widths).cloned().collect();
        let mesh: Vec<PieceRequirement> = mesh_heights.iter().chain(&mesh_widths).cloned().collect();

        let glass_breakdown = stock
            .optimizer(StockCategory::ShutterGlass)?
            .optimize_combined(&glass)?;
        let mesh_breakdown = stock
            .optimizer(StockCategory::ShutterMosquito)?
            .optimize_combined(&mesh)?;

        return Ok(vec![
            material(
                "Shutter - Glass",
                ComponentGroup::Shutter,
                StockCategory::ShutterGlass,
                &glass,
                glass_breakdown,
                format!(
                    "Shutter Glass: {}H + {}W",
                    count_of(&glass_heights),
                    count_of(&glass_widths)
                ),
            ),
            material(
                "Shutter - Mosquito",
                ComponentGroup::Shutter,
                StockCategory::ShutterMosquito,
                &mesh,
                mesh_breakdown,
                format!(
                    "Shutter Mosquito: {}H + {}W",
                    count_of(&mesh_heights),
                    count_of(&mesh_widths)
                ),
            ),
        ]);
    }

    let (heights, widths) = pieces_for((PieceSubtype::Height, PieceSubtype::Width), shutters);
    let pieces: Vec<PieceRequirement> = heights.iter().chain(&widths).cloned().collect();
    let breakdown = stock
        .optimizer(StockCategory::ShutterGlass)?
        .optimize_combined(&pieces)?;

    Ok(vec![material(
        "Shutter (Combined)",
        ComponentGroup::Shutter,
        StockCategory::ShutterGlass,
        &pieces,
        breakdown,
        format!(
            "Shutter: {} H + {} W ({})",
            describe(&heights),
            describe(&widths),
            geometry.shutter_label()
        ),
    )])
}

/// One interlock piece per dimension at the final height. A single shared
/// length takes the single-length optimizer.
pub fn interlock_material(
    config: &SectionConfiguration,
    dimensions: &[ValidDimension],
    stock: &SectionStock<'_>,
) -> Result<MaterialRequirement> {
    let geometry = SectionGeometry::new(config);
    let pieces: Vec<PieceRequirement> = dimensions
        .iter()
        .map(|d| {
            PieceRequirement::new(
                ComponentGroup::Interlock,
                PieceSubtype::Interlock,
                geometry.interlock_length(d.height),
                geometry.interlock_count(d.quantity),
            )
        })
        .collect();

    let optimizer = stock.optimizer(StockCategory::Interlock)?;
    let breakdown = match pieces.first() {
        Some(first) if pieces.iter().all(|p| p.length == first.length) => {
            optimizer.optimize_single(first.length, count_of(&pieces))?
        }
        _ => optimizer.optimize_combined(&pieces)?,
    };

    Ok(material(
        "Interlock",
        ComponentGroup::Interlock,
        StockCategory::Interlock,
        &pieces,
        breakdown,
        format!("Interlock clips: {}", describe(&pieces)),
    ))
}

/// Track rail pieces, or `None` when any rail length comes out non-positive
/// (no rail deduction configured, or a deduction wider than an opening).
/// The component is all or nothing; no window's rails are dropped alone.
pub fn track_rail_material(
    config: &SectionConfiguration,
    dimensions: &[ValidDimension],
    stock: &SectionStock<'_>,
) -> Result<Option<MaterialRequirement>> {
    if config.track_rail_deduction.is_none() || dimensions.is_empty() {
        debug!("No track rail: no deduction configured or nothing to cut");
        return Ok(None);
    }

    let geometry = SectionGeometry::new(config);
    let pieces: Vec<PieceRequirement> = dimensions
        .iter()
        .map(|d| {
            let (length, count) = geometry.track_rail_piece(d.width, d.quantity);
            PieceRequirement::new(ComponentGroup::TrackRail, PieceSubtype::Track, length, count)
        })
        .collect();

    if let Some(short) = pieces.iter().find(|p| p.length <= 0.0) {
        warn!(
            "Track rail suppressed: rail length {} mm is not positive",
            short.length
        );
        return Ok(None);
    }

    let breakdown = stock
        .optimizer(StockCategory::TrackRail)?
        .optimize_combined(&pieces)?;

    Ok(Some(material(
        "Track Rail",
        ComponentGroup::TrackRail,
        StockCategory::TrackRail,
        &pieces,
        breakdown,
        format!("Track Rails: {}", describe(&pieces)),
    )))
}

pub fn sum_accessories(config: &SectionConfiguration, dimensions: &[ValidDimension]) -> Accessories {
    let geometry = SectionGeometry::new(config);
    let mut total = Accessories::default();
    for d in dimensions {
        total += geometry.accessories(d.quantity);
    }
    total
}

/// Glass sizes per dimension with the glass/mesh split applied to the areas.
/// `glass_size.total_area` keeps the all-glass figure.
pub fn glass_info(config: &SectionConfiguration, dimensions: &[ValidDimension]) -> Vec<DimensionGlassInfo> {
    let geometry = SectionGeometry::new(config);
    let shutters = geometry.number_of_shutters();
    let (glass_shutters, mosquito_shutters) = if splits_mosquito(config) {
        (shutters - 1, 1)
    } else {
        (shutters, 0)
    };

    dimensions
        .iter()
        .map(|d| {
            let glass_size = geometry.glass_size(d.width, d.height, d.quantity);
            let quantity = d.quantity as f64;
            DimensionGlassInfo {
                dimension_id: d.id.clone(),
                quantity: d.quantity,
                glass_size,
                glass_shutters,
                mosquito_shutters,
                glass_area: glass_size.area * glass_shutters as f64 * quantity,
                mosquito_area: glass_size.area * mosquito_shutters as f64 * quantity,
            }
        })
        .collect()
}

fn material(
    component: &str,
    group: ComponentGroup,
    stock_category: StockCategory,
    pieces: &[PieceRequirement],
    stock_breakdown: StockBreakdown,
    description: String,
) -> MaterialRequirement {
    MaterialRequirement {
        component: component.to_string(),
        group,
        stock_category,
        total_required: pieces.iter().map(PieceRequirement::total_length).sum(),
        stock_breakdown,
        description: Some(description),
    }
}

/// `2×3.28ft + 4×4.92ft`
fn describe(pieces: &[PieceRequirement]) -> String {
    pieces
        .iter()
        .map(|p| format!("{}×{}ft", p.count, mm_to_feet(p.length)))
        .collect::<Vec<_>>()
        .join(" + ")
}

fn count_of(pieces: &[PieceRequirement]) -> u32 {
    pieces.iter().map(|p| p.count).sum()
}
