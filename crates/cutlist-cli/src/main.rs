use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use cutlist_core::format::{format_mm, mm_to_feet, WastageBand};
use cutlist_core::validation::validate_section_dimensions;
use cutlist_core::{calculate_materials, Catalogue, CalculationResult, UnitMode, WindowInput};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cutlist")]
#[command(about = "Aluminium window cutlist - stock bar cutting plans and material summaries", long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate materials and cutting plans
    Calculate {
        /// Window input file(s) (YAML or JSON); several are merged by file name
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Section-type catalogue (YAML or JSON), built-in 27mm Domal if omitted
        #[arg(short, long)]
        catalogue: Option<PathBuf>,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check window dimensions against the allowed ranges
    Validate {
        /// Window input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Word range messages in feet
        #[arg(long)]
        feet: bool,
    },

    /// List section types and stock lengths
    Catalogue {
        /// Section-type catalogue (YAML or JSON), built-in 27mm Domal if omitted
        #[arg(short, long)]
        catalogue: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Calculate {
            input,
            catalogue,
            output,
        } => {
            calculate_command(&input, catalogue.as_deref(), output.as_deref())?;
        }
        Commands::Validate { input, feet } => {
            validate_command(&input, feet)?;
        }
        Commands::Catalogue { catalogue } => {
            catalogue_command(catalogue.as_deref())?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads YAML for `.yaml`/`.yml` files and JSON for anything else.
fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );

    let value = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON in {}", path.display()))?
    };

    Ok(value)
}

fn load_catalogue(path: Option<&Path>) -> Result<Catalogue> {
    match path {
        Some(path) => {
            debug!("Loading catalogue from {}", path.display());
            load_document(path)
        }
        None => Ok(Catalogue::domal_27mm()),
    }
}

fn load_input(paths: &[PathBuf]) -> Result<WindowInput> {
    if let [path] = paths {
        return load_document(path);
    }

    let mut worksheets = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("worksheet")
            .to_string();
        worksheets.push((name, load_document::<WindowInput>(path)?));
    }

    info!("Merging {} worksheets", worksheets.len());
    Ok(WindowInput::combine(
        worksheets.iter().map(|(name, input)| (name.as_str(), input.clone())),
    ))
}

fn calculate_command(inputs: &[PathBuf], catalogue: Option<&Path>, output: Option<&Path>) -> Result<()> {
    println!("{}", "🔍 Loading input...".bright_blue());

    let input = load_input(inputs)?;
    let catalogue = load_catalogue(catalogue)?;

    let dimensions: usize = input.sections.iter().map(|s| s.dimensions.len()).sum();
    println!(
        "  {} sections, {} dimension rows",
        input.sections.len().to_string().bright_white().bold(),
        dimensions.to_string().bright_white().bold()
    );
    println!(
        "  {} section types available",
        catalogue.section_types.len().to_string().bright_white().bold()
    );
    println!();

    println!("{}", "🚀 Calculating materials...".bright_blue());

    let result = calculate_materials(&input, &catalogue)?;

    println!();
    println!("{}", "✅ Calculation complete!".bright_green().bold());
    println!();

    print_report(&result);

    let json = serde_json::to_string_pretty(&result)?;
    if let Some(output_path) = output {
        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn colored_percent(percent: f64) -> ColoredString {
    let text = format!("{:.1}%", percent);
    match WastageBand::classify(percent) {
        WastageBand::Low => text.bright_green(),
        WastageBand::Moderate => text.bright_yellow(),
        WastageBand::High => text.bright_red(),
    }
}

fn print_histogram(label: &str, histogram: &BTreeMap<String, u32>) {
    if histogram.is_empty() {
        return;
    }
    let bars: Vec<String> = histogram
        .iter()
        .map(|(name, count)| format!("{} × {}", count, name))
        .collect();
    println!("    {}: {}", label, bars.join(", ").bright_white());
}

fn print_report(result: &CalculationResult) {
    println!("{}", "📊 Results:".bright_yellow().bold());

    for section in &result.section_results {
        println!();
        println!("  {}", section.section_name.bright_cyan().bold());

        for material in &section.materials {
            let breakdown = &material.stock_breakdown;
            println!(
                "    • {}: {} bars ({}), wastage {}",
                material.component.bright_white(),
                breakdown.stocks_needed,
                breakdown.stock_name,
                colored_percent(breakdown.wastage_percent)
            );
            if let Some(description) = &material.description {
                println!("      {}", description.dimmed());
            }
        }

        println!(
            "    Accessories: {} track caps, {} mosquito C-channels",
            section.accessories.track_cap, section.accessories.mosquito_c_channel
        );

        for issue in &section.rejected_dimensions {
            let errors = &issue.errors;
            let messages: Vec<&str> = [&errors.height, &errors.width, &errors.quantity]
                .into_iter()
                .filter_map(|m| m.as_deref())
                .collect();
            println!(
                "    {} row {}: {}",
                "⚠".bright_yellow(),
                issue.dimension_id,
                messages.join("; ")
            );
        }
    }

    for skipped in &result.skipped_sections {
        println!();
        println!(
            "  {} {} skipped: {}",
            "⚠".bright_yellow(),
            skipped.section_name.bright_white(),
            skipped.reason
        );
    }

    let summary = &result.combined_summary;
    println!();
    println!("{}", "📦 Project summary:".bright_yellow().bold());
    println!(
        "  Material required: {} mm ({} ft)",
        format_mm(summary.total_material).bright_white(),
        mm_to_feet(summary.total_material)
    );
    println!(
        "  Stock used: {} mm ({} ft)",
        format_mm(summary.total_stock_used).bright_white(),
        mm_to_feet(summary.total_stock_used)
    );
    println!(
        "  Total wastage: {} mm, {}",
        format_mm(summary.total_wastage),
        colored_percent(summary.wastage_percent)
    );
    println!(
        "  Glass area: {:.3} m², mosquito mesh: {:.3} m²",
        summary.total_glass_area / 1_000_000.0,
        summary.total_mosquito_area / 1_000_000.0
    );
    println!("  Bars to purchase:");
    print_histogram("All", &summary.stock_summary);
    print_histogram("Frame", &summary.frame_stock_summary);
    print_histogram("Shutter", &summary.shutter_stock_summary);
    print_histogram("Interlock", &summary.interlock_stock_summary);
    println!("  Bars leaving an offcut:");
    print_histogram("All", &summary.wastage_pieces_summary);
    println!();
}

fn validate_command(input: &Path, feet: bool) -> Result<()> {
    let input: WindowInput = load_document(input)?;
    let unit_mode = if feet {
        UnitMode::Feet
    } else {
        UnitMode::Millimeters
    };

    let mut invalid = 0;
    for section in &input.sections {
        let validation = validate_section_dimensions(&section.dimensions, unit_mode);
        if validation.is_valid {
            println!("{} {}", "✅".bright_green(), section.name.bright_white());
            continue;
        }

        println!("{} {}", "❌".bright_red(), section.name.bright_white());
        for issue in &validation.errors {
            let errors = &issue.errors;
            for message in [&errors.height, &errors.width, &errors.quantity]
                .into_iter()
                .flatten()
            {
                println!("    row {}: {}", issue.dimension_id, message.bright_red());
            }
        }
        invalid += validation.errors.len();
    }

    if invalid > 0 {
        bail!("{} invalid dimension rows", invalid);
    }

    println!();
    println!("{}", "All dimensions valid".bright_green().bold());
    Ok(())
}

fn catalogue_command(path: Option<&Path>) -> Result<()> {
    let catalogue = load_catalogue(path)?;

    for section_type in &catalogue.section_types {
        let status = if section_type.is_active {
            "active".bright_green()
        } else {
            "inactive".dimmed()
        };
        println!(
            "{} ({}) [{}]",
            section_type.name.bright_cyan().bold(),
            section_type.id,
            status
        );

        for config in &section_type.configurations {
            let rail = config
                .track_rail_deduction
                .map(|d| format!("{} mm", d))
                .unwrap_or_else(|| "none".to_string());
            println!(
                "  • {} {}: shutter -{} mm, height -{} mm, glass -{}/-{} mm, rail {}",
                config.track_type,
                config.configuration,
                config.shutter_width_deduction,
                config.height_deduction,
                config.glass_width_deduction,
                config.glass_height_deduction,
                rail
            );
        }

        let stock: Vec<String> = section_type
            .stock_lengths
            .iter()
            .map(|s| format!("{} ({} mm)", s.name, s.length))
            .collect();
        println!("  Stock: {}", stock.join(", ").bright_white());
        println!();
    }

    Ok(())
}
