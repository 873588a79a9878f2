//! Shutter, glass, interlock and track-rail geometry derived from an opening.
//!
//! Nothing here validates: callers pass openings that already passed
//! [`crate::validation`], and deductions larger than the opening simply come
//! out as non-positive lengths.

use crate::catalogue::SectionConfiguration;
use crate::types::{Accessories, Configuration, GlassSize, TrackType};

/// Shutter size after deductions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalDimensions {
    pub shutter_width: f64,
    pub height: f64,
}

/// Geometry formulas bound to one section configuration.
#[derive(Debug, Clone, Copy)]
pub struct SectionGeometry<'a> {
    config: &'a SectionConfiguration,
}

impl<'a> SectionGeometry<'a> {
    pub fn new(config: &'a SectionConfiguration) -> Self {
        Self { config }
    }

    pub fn track_type(&self) -> TrackType {
        self.config.track_type
    }

    pub fn configuration(&self) -> Configuration {
        self.config.configuration
    }

    pub fn number_of_shutters(&self) -> u32 {
        self.config.track_type.tracks()
    }

    /// Final shutter width and height for an opening.
    ///
    /// 3-track all-glass splits the widened opening in three; every other
    /// layout uses half the opening less the shutter deduction.
    pub fn final_dimensions(&self, section_width: f64, section_height: f64) -> FinalDimensions {
        let c = self.config;
        let shutter_width = if c.track_type == TrackType::ThreeTrack
            && c.configuration == Configuration::AllGlass
        {
            (section_width + c.three_track_width_addition) / 3.0
        } else {
            section_width / 2.0 - c.shutter_width_deduction
        };

        FinalDimensions {
            shutter_width,
            height: section_height - c.height_deduction,
        }
    }

    /// Glass pane size. `total_area` counts every shutter as glass.
    pub fn glass_size(&self, section_width: f64, section_height: f64, quantity: u32) -> GlassSize {
        let finals = self.final_dimensions(section_width, section_height);
        let width = finals.shutter_width - self.config.glass_width_deduction;
        let height = finals.height - self.config.glass_height_deduction;
        let area = width * height;

        GlassSize {
            final_shutter_width: finals.shutter_width,
            final_height: finals.height,
            width,
            height,
            area,
            total_area: area * self.number_of_shutters() as f64 * quantity as f64,
        }
    }

    pub fn interlock_length(&self, section_height: f64) -> f64 {
        self.final_dimensions(0.0, section_height).height
    }

    /// Interlocks join glass shutters only; a mosquito shutter has none.
    pub fn interlock_count(&self, quantity: u32) -> u32 {
        let mosquito = match self.config.configuration {
            Configuration::GlassMosquito => 1,
            Configuration::AllGlass => 0,
        };
        (self.number_of_shutters() - mosquito) * quantity
    }

    /// Length and count of track rail pieces. Length is 0 when the section
    /// type has no rail deduction configured.
    pub fn track_rail_piece(&self, section_width: f64, quantity: u32) -> (f64, u32) {
        let length = match self.config.track_rail_deduction {
            Some(deduction) => section_width - deduction,
            None => 0.0,
        };
        (length, self.config.track_type.tracks() * quantity)
    }

    pub fn accessories(&self, quantity: u32) -> Accessories {
        let c_channel = self.config.configuration == Configuration::GlassMosquito
            && self.config.track_type == TrackType::ThreeTrack;

        Accessories {
            mosquito_c_channel: if c_channel { quantity } else { 0 },
            track_cap: quantity,
        }
    }

    pub fn shutter_label(&self) -> &'static str {
        match (self.config.track_type, self.config.configuration) {
            (TrackType::ThreeTrack, Configuration::AllGlass) => "Glass shutters (3)",
            (TrackType::ThreeTrack, Configuration::GlassMosquito) => {
                "Glass + Mosquito shutters (3)"
            }
            (TrackType::TwoTrack, _) => "Glass shutters (2)",
        }
    }
}

#[cfg(test)]
mod tests;
