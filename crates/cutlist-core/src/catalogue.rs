//! Section-type catalogue: deduction constants and stock lengths per section type.
//!
//! The catalogue is owned by whatever stores section types (a database, a YAML
//! file, the built-in seed). Calculation only reads it through [`SectionLookup`].

use crate::types::{CalculationError, Configuration, Result, StockOption, TrackType};
use serde::{Deserialize, Serialize};

/// Deduction constants for one (section type, track type, configuration) tuple.
/// All values in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfiguration {
    pub track_type: TrackType,
    pub configuration: Configuration,
    /// Subtracted from half the opening width (2-shutter formula)
    pub shutter_width_deduction: f64,
    /// Subtracted from the opening height for shutters and interlocks
    pub height_deduction: f64,
    /// Added to the opening width before dividing by three (3-track all-glass)
    pub three_track_width_addition: f64,
    pub glass_width_deduction: f64,
    pub glass_height_deduction: f64,
    /// Subtracted from the opening width for each track rail; `None` disables rails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_rail_deduction: Option<f64>,
    /// Frame width pieces per window
    #[serde(default = "default_frame_multiplier")]
    pub frame_multiplier_width: u32,
    /// Frame height pieces per window
    #[serde(default = "default_frame_multiplier")]
    pub frame_multiplier_height: u32,
    /// Cut mosquito shutters from their own stock pool
    #[serde(default)]
    pub separate_mosquito_net: bool,
    /// Cut frame widths and heights from separate stock pools
    #[serde(default)]
    pub different_frame_materials: bool,
}

fn default_frame_multiplier() -> u32 {
    2
}

fn default_active() -> bool {
    true
}

/// A profile system (e.g. "27mm Domal") with its configurations and bar lengths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionType {
    pub id: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub configurations: Vec<SectionConfiguration>,
    pub stock_lengths: Vec<StockOption>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalogue {
    pub section_types: Vec<SectionType>,
}

/// Resolves deduction constants and default stock for a section.
pub trait SectionLookup {
    fn configuration(
        &self,
        section_type_id: &str,
        track_type: TrackType,
        configuration: Configuration,
    ) -> Option<&SectionConfiguration>;

    /// Stock lengths used for categories a section does not override
    fn stock_lengths(&self, section_type_id: &str) -> &[StockOption];
}

impl Catalogue {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CalculationError::InvalidInput(format!("Invalid catalogue: {}", e)))
    }

    pub fn section_type(&self, id: &str) -> Option<&SectionType> {
        self.section_types.iter().find(|s| s.id == id)
    }

    pub fn active_section_types(&self) -> impl Iterator<Item = &SectionType> {
        self.section_types.iter().filter(|s| s.is_active)
    }

    /// Built-in "27mm Domal" section type with all four track/configuration
    /// combinations and the 16/15/12 ft stock bars.
    pub fn domal_27mm() -> Self {
        let tuples = [
            (TrackType::TwoTrack, Configuration::AllGlass),
            (TrackType::TwoTrack, Configuration::GlassMosquito),
            (TrackType::ThreeTrack, Configuration::AllGlass),
            (TrackType::ThreeTrack, Configuration::GlassMosquito),
        ];

        let configurations = tuples
            .into_iter()
            .map(|(track_type, configuration)| SectionConfiguration {
                track_type,
                configuration,
                shutter_width_deduction: 3.175,
                height_deduction: 66.675,
                three_track_width_addition: 63.5,
                glass_width_deduction: 104.775,
                glass_height_deduction: 104.775,
                track_rail_deduction: None,
                frame_multiplier_width: 2,
                frame_multiplier_height: 2,
                separate_mosquito_net: false,
                different_frame_materials: false,
            })
            .collect();

        Self {
            section_types: vec![SectionType {
                id: "27mm-domal".to_string(),
                name: "27mm Domal".to_string(),
                is_active: true,
                configurations,
                stock_lengths: default_stock_options(),
            }],
        }
    }
}

impl SectionLookup for Catalogue {
    fn configuration(
        &self,
        section_type_id: &str,
        track_type: TrackType,
        configuration: Configuration,
    ) -> Option<&SectionConfiguration> {
        self.section_type(section_type_id)?
            .configurations
            .iter()
            .find(|c| c.track_type == track_type && c.configuration == configuration)
    }

    fn stock_lengths(&self, section_type_id: &str) -> &[StockOption] {
        self.section_type(section_type_id)
            .map(|s| s.stock_lengths.as_slice())
            .unwrap_or(&[])
    }
}

/// Standard aluminium bar lengths, longest first.
pub fn default_stock_options() -> Vec<StockOption> {
    vec![
        StockOption::new("16ft", 4877.0, 16.0),
        StockOption::new("15ft", 4572.0, 15.0),
        StockOption::new("12ft", 3658.0, 12.0),
    ]
}
