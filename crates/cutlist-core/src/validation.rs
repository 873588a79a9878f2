//! Range checks on entered window dimensions.
//!
//! A row with every field empty is a placeholder and is neither an error nor
//! part of the calculation. A partially filled or out-of-range row is
//! reported field by field and left out of the calculation.

use crate::types::{DimensionErrors, DimensionIssue, WindowDimension};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Inclusive bounds for each dimension field, in mm for lengths.
pub struct DimensionConstraints {
    pub height: RangeInclusive<f64>,
    pub width: RangeInclusive<f64>,
    pub quantity: RangeInclusive<u32>,
}

pub const DIMENSION_CONSTRAINTS: DimensionConstraints = DimensionConstraints {
    height: 300.0..=3000.0,
    width: 300.0..=5000.0,
    quantity: 1..=100,
};

/// Unit the user entered lengths in; only changes message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitMode {
    #[default]
    Millimeters,
    Feet,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DimensionValidation {
    pub is_valid: bool,
    pub errors: DimensionErrors,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionValidation {
    pub is_valid: bool,
    /// Rejected rows in input order
    pub errors: Vec<DimensionIssue>,
}

/// A dimension row with every field present and in range
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDimension {
    pub id: String,
    pub height: f64,
    pub width: f64,
    pub quantity: u32,
}

pub fn is_blank(dimension: &WindowDimension) -> bool {
    dimension.height.is_none() && dimension.width.is_none() && dimension.quantity.is_none()
}

pub fn validate_dimension(dimension: &WindowDimension, unit_mode: UnitMode) -> DimensionValidation {
    if is_blank(dimension) {
        return DimensionValidation {
            is_valid: true,
            errors: DimensionErrors::default(),
        };
    }

    let c = &DIMENSION_CONSTRAINTS;
    let mut errors = DimensionErrors::default();

    errors.height = match dimension.height {
        None => Some("Height is required".to_string()),
        Some(h) if !c.height.contains(&h) => Some(match unit_mode {
            UnitMode::Millimeters => format!(
                "Height must be between {}mm and {}mm",
                c.height.start(),
                c.height.end()
            ),
            UnitMode::Feet => "Height must be between 1ft and 10ft (approx.)".to_string(),
        }),
        Some(_) => None,
    };

    errors.width = match dimension.width {
        None => Some("Width is required".to_string()),
        Some(w) if !c.width.contains(&w) => Some(match unit_mode {
            UnitMode::Millimeters => format!(
                "Width must be between {}mm and {}mm",
                c.width.start(),
                c.width.end()
            ),
            UnitMode::Feet => "Width must be between 1ft and 16ft (approx.)".to_string(),
        }),
        Some(_) => None,
    };

    errors.quantity = match dimension.quantity {
        None => Some("Quantity is required".to_string()),
        Some(q) if !c.quantity.contains(&q) => Some(format!(
            "Quantity must be between {} and {}",
            c.quantity.start(),
            c.quantity.end()
        )),
        Some(_) => None,
    };

    DimensionValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn validate_section_dimensions(
    dimensions: &[WindowDimension],
    unit_mode: UnitMode,
) -> SectionValidation {
    let errors: Vec<DimensionIssue> = dimensions
        .iter()
        .enumerate()
        .filter_map(|(row, dim)| {
            let result = validate_dimension(dim, unit_mode);
            (!result.is_valid).then(|| DimensionIssue {
                dimension_id: row_label(row, dim),
                errors: result.errors,
            })
        })
        .collect();

    SectionValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn row_label(row: usize, dimension: &WindowDimension) -> String {
    if dimension.id.is_empty() {
        format!("#{}", row + 1)
    } else {
        dimension.id.clone()
    }
}

/// Typed view of a dimension if it can be calculated.
pub fn to_valid_dimension(dimension: &WindowDimension) -> Option<ValidDimension> {
    let c = &DIMENSION_CONSTRAINTS;
    let height = dimension.height.filter(|h| c.height.contains(h))?;
    let width = dimension.width.filter(|w| c.width.contains(w))?;
    let quantity = dimension.quantity.filter(|q| c.quantity.contains(q))?;

    Some(ValidDimension {
        id: dimension.id.clone(),
        height,
        width,
        quantity,
    })
}

pub fn is_valid_dimension(dimension: &WindowDimension) -> bool {
    to_valid_dimension(dimension).is_some()
}

pub fn filter_valid_dimensions(dimensions: &[WindowDimension]) -> Vec<ValidDimension> {
    dimensions.iter().filter_map(to_valid_dimension).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dim(id: &str, height: Option<f64>, width: Option<f64>, quantity: Option<u32>) -> WindowDimension {
        WindowDimension {
            id: id.to_string(),
            height,
            width,
            quantity,
        }
    }

    #[test]
    fn test_blank_row_is_valid_but_not_calculated() {
        let blank = dim("d1", None, None, None);
        assert!(validate_dimension(&blank, UnitMode::Millimeters).is_valid);
        assert!(!is_valid_dimension(&blank));
        assert!(filter_valid_dimensions(&[blank]).is_empty());
    }

    #[test]
    fn test_partial_row_reports_missing_fields() {
        let partial = dim("d1", Some(1200.0), None, None);
        let result = validate_dimension(&partial, UnitMode::Millimeters);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            DimensionErrors {
                height: None,
                width: Some("Width is required".to_string()),
                quantity: Some("Quantity is required".to_string()),
            }
        );
    }

    #[test]
    fn test_out_of_range_messages() {
        let row = dim("d1", Some(299.0), Some(5001.0), Some(101));
        let mm = validate_dimension(&row, UnitMode::Millimeters);
        assert_eq!(
            mm.errors.height.as_deref(),
            Some("Height must be between 300mm and 3000mm")
        );
        assert_eq!(
            mm.errors.width.as_deref(),
            Some("Width must be between 300mm and 5000mm")
        );
        assert_eq!(
            mm.errors.quantity.as_deref(),
            Some("Quantity must be between 1 and 100")
        );

        let ft = validate_dimension(&row, UnitMode::Feet);
        assert_eq!(
            ft.errors.height.as_deref(),
            Some("Height must be between 1ft and 10ft (approx.)")
        );
        assert_eq!(
            ft.errors.width.as_deref(),
            Some("Width must be between 1ft and 16ft (approx.)")
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let low = dim("low", Some(300.0), Some(300.0), Some(1));
        let high = dim("high", Some(3000.0), Some(5000.0), Some(100));
        assert!(is_valid_dimension(&low));
        assert!(is_valid_dimension(&high));
        assert!(!is_valid_dimension(&dim("zero", Some(1000.0), Some(1000.0), Some(0))));
    }

    #[test]
    fn test_section_validation_lists_rows_in_order() {
        let dims = vec![
            dim("ok", Some(1000.0), Some(1000.0), Some(1)),
            dim("blank", None, None, None),
            dim("bad", Some(10.0), Some(1000.0), Some(1)),
        ];
        let result = validate_section_dimensions(&dims, UnitMode::Millimeters);
        assert!(!result.is_valid);
        let ids: Vec<&str> = result.errors.iter().map(|e| e.dimension_id.as_str()).collect();
        assert_eq!(ids, vec!["bad"]);

        let valid = filter_valid_dimensions(&dims);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].id, "ok");
    }

    #[test]
    fn test_rows_without_ids_are_reported_separately() {
        let dims = vec![
            dim("", Some(1000.0), Some(1000.0), Some(1)),
            dim("", Some(10.0), Some(1000.0), Some(1)),
            dim("", Some(1000.0), Some(10.0), Some(1)),
        ];
        let result = validate_section_dimensions(&dims, UnitMode::Millimeters);

        assert_eq!(
            result.errors,
            vec![
                DimensionIssue {
                    dimension_id: "#2".to_string(),
                    errors: DimensionErrors {
                        height: Some("Height must be between 300mm and 3000mm".to_string()),
                        ..Default::default()
                    },
                },
                DimensionIssue {
                    dimension_id: "#3".to_string(),
                    errors: DimensionErrors {
                        width: Some("Width must be between 300mm and 5000mm".to_string()),
                        ..Default::default()
                    },
                },
            ]
        );
    }
}
