use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::AddAssign;

/// Number of millimetres in one foot
pub const MM_PER_FOOT: f64 = 304.8;

/// Sliding rail layout of a window section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackType {
    #[serde(rename = "2-track")]
    TwoTrack,
    #[serde(rename = "3-track")]
    ThreeTrack,
}

impl TrackType {
    /// Number of rails, which is also the number of shutters
    pub fn tracks(&self) -> u32 {
        match self {
            TrackType::TwoTrack => 2,
            TrackType::ThreeTrack => 3,
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackType::TwoTrack => write!(f, "2-track"),
            TrackType::ThreeTrack => write!(f, "3-track"),
        }
    }
}

/// Shutter infill of a window section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Configuration {
    #[serde(rename = "all-glass")]
    AllGlass,
    #[serde(rename = "glass-mosquito")]
    GlassMosquito,
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Configuration::AllGlass => write!(f, "all-glass"),
            Configuration::GlassMosquito => write!(f, "glass-mosquito"),
        }
    }
}

/// One window opening as entered. All-`None` rows are blank placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowDimension {
    #[serde(default)]
    pub id: String,
    /// Opening height in mm
    pub height: Option<f64>,
    /// Opening width in mm
    pub width: Option<f64>,
    pub quantity: Option<u32>,
}

/// Group of openings sharing one section type, track type and configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSection {
    pub id: String,
    pub name: String,
    pub section_type_id: String,
    pub track_type: TrackType,
    pub configuration: Configuration,
    pub dimensions: Vec<WindowDimension>,
    /// Permitted stock bars per material category. Categories left out fall
    /// back to the section type's stock lengths.
    #[serde(default)]
    pub stock_map: BTreeMap<StockCategory, Vec<StockOption>>,
    /// Carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mosquito_mesh_grade: Option<String>,
}

/// Input: What user provides
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowInput {
    pub sections: Vec<WindowSection>,
}

impl WindowInput {
    /// Merges several named worksheets into one input.
    ///
    /// Section ids are prefixed with the 1-based worksheet position so that
    /// sections from different worksheets never collide, and each section
    /// name is suffixed with its worksheet name.
    pub fn combine<'a, I>(worksheets: I) -> WindowInput
    where
        I: IntoIterator<Item = (&'a str, WindowInput)>,
    {
        let mut sections = Vec::new();
        for (n, (worksheet, input)) in worksheets.into_iter().enumerate() {
            for section in input.sections {
                sections.push(WindowSection {
                    id: format!("{}-{}", n + 1, section.id),
                    name: format!("{} ({})", section.name, worksheet),
                    ..section
                });
            }
        }
        WindowInput { sections }
    }
}

/// A purchasable stock bar length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockOption {
    /// Bar length in mm
    pub length: f64,
    pub length_feet: f64,
    pub name: String,
}

impl StockOption {
    pub fn new(name: impl Into<String>, length: f64, length_feet: f64) -> Self {
        Self {
            length,
            length_feet,
            name: name.into(),
        }
    }

    /// Builds an option from a nominal length in feet, e.g. `12` -> "12ft".
    pub fn from_feet(feet: f64) -> Self {
        Self {
            length: feet * MM_PER_FOOT,
            length_feet: feet,
            name: format!("{}ft", feet),
        }
    }
}

/// Material category a stock list applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockCategory {
    FrameWidth,
    FrameHeight,
    ShutterGlass,
    ShutterMosquito,
    Interlock,
    TrackRail,
}

impl fmt::Display for StockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StockCategory::FrameWidth => "frame width",
            StockCategory::FrameHeight => "frame height",
            StockCategory::ShutterGlass => "shutter glass",
            StockCategory::ShutterMosquito => "shutter mosquito",
            StockCategory::Interlock => "interlock",
            StockCategory::TrackRail => "track rail",
        };
        write!(f, "{}", name)
    }
}

/// Structural component a material belongs to, used for summary buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentGroup {
    Frame,
    Shutter,
    Interlock,
    TrackRail,
}

/// Which edge of which part a piece is cut for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceSubtype {
    Width,
    Height,
    GlassWidth,
    GlassHeight,
    MosquitoWidth,
    MosquitoHeight,
    Interlock,
    Track,
}

impl PieceSubtype {
    fn label(&self) -> &'static str {
        match self {
            PieceSubtype::Width => "width",
            PieceSubtype::Height => "height",
            PieceSubtype::GlassWidth => "g-width",
            PieceSubtype::GlassHeight => "g-height",
            PieceSubtype::MosquitoWidth => "m-width",
            PieceSubtype::MosquitoHeight => "m-height",
            PieceSubtype::Interlock => "interlock",
            PieceSubtype::Track => "track",
        }
    }
}

/// Origin of a piece. Reporting only: packing never inspects it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceKind {
    pub group: ComponentGroup,
    pub subtype: PieceSubtype,
    pub length: f64,
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.subtype.label(), self.length)
    }
}

/// A number of identical pieces to cut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceRequirement {
    pub length: f64,
    pub count: u32,
    pub kind: PieceKind,
}

impl PieceRequirement {
    pub fn new(group: ComponentGroup, subtype: PieceSubtype, length: f64, count: u32) -> Self {
        Self {
            length,
            count,
            kind: PieceKind {
                group,
                subtype,
                length,
            },
        }
    }

    /// Total length of all pieces in this requirement
    pub fn total_length(&self) -> f64 {
        self.length * self.count as f64
    }
}

/// Cut layout of a single stock bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingPlan {
    /// 1-based bar number within its breakdown
    pub stock_index: u32,
    pub stock_name: String,
    pub stock_length: f64,
    pub pieces: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub piece_types: Vec<PieceKind>,
    /// Leftover length; negative only on oversized fallback bars
    pub wastage: f64,
    /// Bar holds a piece longer than any stock size
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub oversized: bool,
}

/// How a breakdown was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingStrategy {
    /// One piece length, whole-bar arithmetic
    SingleLength,
    /// Greedy per-bar bin packing over mixed lengths
    GreedyCombined,
    /// At least one piece fitted no stock size and got a dedicated bar
    Degenerate,
}

/// Stock usage for one component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockBreakdown {
    /// Most frequently used stock size
    pub stock_length: f64,
    pub stock_name: String,
    /// Bars across all sizes
    pub stocks_needed: u32,
    /// Average pieces per bar
    pub pieces_per_stock: f64,
    pub total_pieces: u32,
    pub total_wastage: f64,
    pub wastage_percent: f64,
    /// Bar length consumed across all sizes
    pub total_stock_length: f64,
    pub strategy: PackingStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_length: Option<f64>,
    pub cutting_plans: Vec<CuttingPlan>,
    /// Pieces cut per piece label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece_breakdown: Option<BTreeMap<String, u32>>,
    /// Bars used per stock name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_stock_counts: Option<BTreeMap<String, u32>>,
}

/// One optimized component of a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    pub component: String,
    pub group: ComponentGroup,
    pub stock_category: StockCategory,
    /// Sum of all piece lengths in mm
    pub total_required: f64,
    pub stock_breakdown: StockBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Shutter and glass dimensions for one opening
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlassSize {
    pub final_shutter_width: f64,
    pub final_height: f64,
    /// Glass pane width in mm
    pub width: f64,
    /// Glass pane height in mm
    pub height: f64,
    /// Area of one pane in mm²
    pub area: f64,
    /// Area of every shutter of every window, all counted as glass
    pub total_area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionGlassInfo {
    pub dimension_id: String,
    pub quantity: u32,
    pub glass_size: GlassSize,
    /// Glass-bearing shutters per window
    pub glass_shutters: u32,
    /// Mesh shutters per window when mosquito net is cut separately
    pub mosquito_shutters: u32,
    pub glass_area: f64,
    pub mosquito_area: f64,
}

/// Items counted rather than cut from bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Accessories {
    pub mosquito_c_channel: u32,
    pub track_cap: u32,
}

impl AddAssign for Accessories {
    fn add_assign(&mut self, other: Self) {
        self.mosquito_c_channel += other.mosquito_c_channel;
        self.track_cap += other.track_cap;
    }
}

/// Summary statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialSummary {
    pub total_material: f64,
    pub total_stock_used: f64,
    pub total_wastage: f64,
    pub wastage_percent: f64,
    pub total_glass_area: f64,
    pub total_mosquito_area: f64,
    pub stock_summary: BTreeMap<String, u32>,
    pub frame_stock_summary: BTreeMap<String, u32>,
    pub shutter_stock_summary: BTreeMap<String, u32>,
    pub interlock_stock_summary: BTreeMap<String, u32>,
    /// Bars with a non-zero offcut, per stock name
    pub wastage_pieces_summary: BTreeMap<String, u32>,
    pub frame_wastage_pieces_summary: BTreeMap<String, u32>,
    pub shutter_wastage_pieces_summary: BTreeMap<String, u32>,
    pub interlock_wastage_pieces_summary: BTreeMap<String, u32>,
}

/// Per-field validation messages for one dimension row
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DimensionErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

impl DimensionErrors {
    pub fn is_empty(&self) -> bool {
        self.height.is_none() && self.width.is_none() && self.quantity.is_none()
    }
}

/// A rejected row. Rows entered without an id are labelled `#<row>`, counting from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionIssue {
    pub dimension_id: String,
    pub errors: DimensionErrors,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionResult {
    pub section_id: String,
    pub section_name: String,
    pub materials: Vec<MaterialRequirement>,
    pub accessories: Accessories,
    pub glass_info: Vec<DimensionGlassInfo>,
    pub summary: MaterialSummary,
    /// Non-blank rows left out of the calculation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected_dimensions: Vec<DimensionIssue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSection {
    pub section_id: String,
    pub section_name: String,
    pub reason: String,
}

/// Output: What the calculation returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub input: WindowInput,
    pub section_results: Vec<SectionResult>,
    pub combined_summary: MaterialSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_sections: Vec<SkippedSection>,
}

/// Error type for calculation
#[derive(Debug, thiserror::Error)]
pub enum CalculationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Stock catalogue is empty")]
    EmptyCatalogue,

    #[error("Piece length must be positive, got {length}")]
    InvalidPieceLength { length: f64 },

    #[error("No {category} stock lengths available for section type '{section_type_id}'")]
    MissingStock {
        section_type_id: String,
        category: StockCategory,
    },
}

pub type Result<T> = std::result::Result<T, CalculationError>;
