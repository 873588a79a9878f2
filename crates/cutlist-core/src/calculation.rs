//! Orchestration: window input in, materials, glass and summaries out.

use crate::catalogue::SectionLookup;
use crate::derivation::{derive_section_materials, glass_info, sum_accessories, SectionStock};
use crate::summary::{combine_summaries, summarize_section};
use crate::types::*;
use crate::validation::{filter_valid_dimensions, validate_section_dimensions, UnitMode};
use tracing::{debug, info, warn};

/// Calculates every section of `input` against the section types in `lookup`.
///
/// Sections whose track/configuration tuple is unknown, or whose deductions
/// produce a non-positive piece, are reported in `skipped_sections` and the
/// rest still compute. Missing stock and invalid catalogues are errors.
pub fn calculate_materials<L>(input: &WindowInput, lookup: &L) -> Result<CalculationResult>
where
    L: SectionLookup + ?Sized,
{
    let mut section_results = Vec::with_capacity(input.sections.len());
    let mut skipped_sections = Vec::new();

    for section in &input.sections {
        let Some(config) = lookup.configuration(
            &section.section_type_id,
            section.track_type,
            section.configuration,
        ) else {
            let reason = format!(
                "No {} {} configuration for section type '{}'",
                section.track_type, section.configuration, section.section_type_id
            );
            warn!("Skipping section '{}': {}", section.name, reason);
            skipped_sections.push(skipped(section, reason));
            continue;
        };

        let dimensions = filter_valid_dimensions(&section.dimensions);
        let rejected_dimensions =
            validate_section_dimensions(&section.dimensions, UnitMode::Millimeters).errors;

        if !rejected_dimensions.is_empty() {
            debug!(
                "Section '{}': {} dimensions rejected",
                section.name,
                rejected_dimensions.len()
            );
        }

        let stock = SectionStock::new(section, lookup);
        let materials = match derive_section_materials(config, &dimensions, &stock) {
            Ok(materials) => materials,
            Err(e @ CalculationError::InvalidPieceLength { .. }) => {
                warn!("Skipping section '{}': {}", section.name, e);
                skipped_sections.push(skipped(section, e.to_string()));
                continue;
            }
            Err(e) => return Err(e),
        };

        let glass_info = glass_info(config, &dimensions);
        let summary = summarize_section(&materials, &glass_info);

        section_results.push(SectionResult {
            section_id: section.id.clone(),
            section_name: section.name.clone(),
            materials,
            accessories: sum_accessories(config, &dimensions),
            glass_info,
            summary,
            rejected_dimensions,
        });
    }

    let combined_summary = combine_summaries(section_results.iter().map(|r| &r.summary));

    info!(
        "Calculated {} sections ({} skipped), {:.2}% wastage",
        section_results.len(),
        skipped_sections.len(),
        combined_summary.wastage_percent
    );

    Ok(CalculationResult {
        input: input.clone(),
        section_results,
        combined_summary,
        skipped_sections,
    })
}

fn skipped(section: &WindowSection, reason: String) -> SkippedSection {
    SkippedSection {
        section_id: section.id.clone(),
        section_name: section.name.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{default_stock_options, Catalogue, SectionConfiguration};
    use std::collections::BTreeMap;

    fn section(id: &str, track_type: TrackType, configuration: Configuration) -> WindowSection {
        WindowSection {
            id: id.to_string(),
            name: format!("Section {}", id),
            section_type_id: "27mm-domal".to_string(),
            track_type,
            configuration,
            dimensions: vec![WindowDimension {
                id: "d1".to_string(),
                height: Some(1000.0),
                width: Some(1000.0),
                quantity: Some(1),
            }],
            stock_map: BTreeMap::new(),
            mosquito_mesh_grade: None,
        }
    }

    /// A lookup with one configuration whose height deduction exceeds any opening.
    struct Oversized {
        config: SectionConfiguration,
        stock: Vec<StockOption>,
    }

    impl SectionLookup for Oversized {
        fn configuration(&self, _: &str, track: TrackType, config: Configuration) -> Option<&SectionConfiguration> {
            (track == self.config.track_type && config == self.config.configuration).then_some(&self.config)
        }

        fn stock_lengths(&self, _: &str) -> &[StockOption] {
            &self.stock
        }
    }

    #[test]
    fn test_unknown_configuration_is_skipped() {
        let mut catalogue = Catalogue::domal_27mm();
        catalogue.section_types[0]
            .configurations
            .retain(|c| c.track_type == TrackType::TwoTrack);

        let input = WindowInput {
            sections: vec![
                section("a", TrackType::TwoTrack, Configuration::AllGlass),
                section("b", TrackType::ThreeTrack, Configuration::AllGlass),
            ],
        };
        let result = calculate_materials(&input, &catalogue).unwrap();

        assert_eq!(result.section_results.len(), 1);
        assert_eq!(result.section_results[0].section_id, "a");
        assert_eq!(result.skipped_sections.len(), 1);
        assert_eq!(result.skipped_sections[0].section_id, "b");
        assert!(result.skipped_sections[0].reason.contains("3-track all-glass"));
    }

    #[test]
    fn test_invalid_piece_length_skips_only_that_section() {
        let mut config = Catalogue::domal_27mm()
            .configuration("27mm-domal", TrackType::TwoTrack, Configuration::AllGlass)
            .cloned()
            .unwrap();
        config.height_deduction = 5000.0;
        let lookup = Oversized {
            config,
            stock: default_stock_options(),
        };

        let input = WindowInput {
            sections: vec![section("a", TrackType::TwoTrack, Configuration::AllGlass)],
        };
        let result = calculate_materials(&input, &lookup).unwrap();

        assert!(result.section_results.is_empty());
        assert!(result.skipped_sections[0].reason.contains("Piece length must be positive"));
    }

    #[test]
    fn test_missing_stock_propagates() {
        let mut catalogue = Catalogue::domal_27mm();
        catalogue.section_types[0].stock_lengths.clear();

        let input = WindowInput {
            sections: vec![section("a", TrackType::TwoTrack, Configuration::AllGlass)],
        };
        let err = calculate_materials(&input, &catalogue).unwrap_err();
        assert!(matches!(err, CalculationError::MissingStock { .. }));
    }

    #[test]
    fn test_rejected_rows_reported_and_section_still_computes() {
        let mut section = section("a", TrackType::TwoTrack, Configuration::AllGlass);
        section.dimensions.push(WindowDimension {
            id: "partial".to_string(),
            height: Some(1200.0),
            width: None,
            quantity: Some(1),
        });
        section.dimensions.push(WindowDimension {
            id: "blank".to_string(),
            height: None,
            width: None,
            quantity: None,
        });

        let input = WindowInput {
            sections: vec![section],
        };
        let result = calculate_materials(&input, &Catalogue::domal_27mm()).unwrap();
        let section = &result.section_results[0];

        assert_eq!(section.glass_info.len(), 1);
        assert_eq!(section.rejected_dimensions.len(), 1);
        assert_eq!(section.rejected_dimensions[0].dimension_id, "partial");
        assert_eq!(
            section.rejected_dimensions[0].errors.width.as_deref(),
            Some("Width is required")
        );
        assert_eq!(section.materials[0].total_required, 4000.0);
    }

    #[test]
    fn test_section_without_valid_rows() {
        let mut section = section("a", TrackType::TwoTrack, Configuration::AllGlass);
        section.dimensions.clear();

        let result = calculate_materials(
            &WindowInput {
                sections: vec![section],
            },
            &Catalogue::domal_27mm(),
        )
        .unwrap();

        let section = &result.section_results[0];
        assert!(section.materials.is_empty());
        assert_eq!(section.accessories, Accessories::default());
        assert_eq!(result.combined_summary.wastage_percent, 0.0);
    }
}
