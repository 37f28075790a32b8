//! Casecounts CLI - convert daily dashboard case series to hourly counts
//!
//! # Main Commands
//!
//! ```bash
//! casecounts convert york_actual_cases.csv -o york_formatted_actual_cases.csv
//! casecounts convert cases.csv -o out.csv --population 210000 --calendar-hours
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! casecounts parse cases.csv       # Just parse the daily CSV to JSON
//! casecounts inspect out.csv       # Summarise an hourly counts file
//! casecounts config                # Show the default configuration
//! ```

use casecounts::{
    convert_file, format_delimiter, parse_csv_file_auto, read_counts_file, ConversionConfig,
    ConvertOptions, HourIndexing, RowOrder,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "casecounts")]
#[command(about = "Convert daily case/death CSVs to hourly SEIHRD counts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a daily case CSV into an hourly counts CSV
    Convert {
        /// Input daily CSV file
        input: PathBuf,

        /// Output hourly counts file
        #[arg(short, long)]
        output: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Regional population (overrides config)
        #[arg(long)]
        population: Option<u32>,

        /// Epoch date for hour offsets, YYYY-MM-DD (overrides config)
        #[arg(long)]
        epoch_date: Option<NaiveDate>,

        /// Number hours from the epoch per date instead of one running counter
        #[arg(long)]
        calendar_hours: bool,

        /// Reverse file order instead of sorting by date
        #[arg(long)]
        reverse_rows: bool,

        /// Skip series validation
        #[arg(long)]
        no_validate: bool,
    },

    /// Parse a daily CSV file and output JSON
    Parse {
        /// Input daily CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarise an hourly counts CSV file
    Inspect {
        /// Hourly counts file
        input: PathBuf,
    },

    /// Show the default configuration as JSON
    Config {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            population,
            epoch_date,
            calendar_hours,
            reverse_rows,
            no_validate,
        } => cmd_convert(
            &input,
            &output,
            config.as_deref(),
            ConfigOverrides {
                population,
                epoch_date,
                calendar_hours,
                reverse_rows,
            },
            no_validate,
        ),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Inspect { input } => cmd_inspect(&input),

        Commands::Config { output } => cmd_config(output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line values layered over the config file.
struct ConfigOverrides {
    population: Option<u32>,
    epoch_date: Option<NaiveDate>,
    calendar_hours: bool,
    reverse_rows: bool,
}

impl ConfigOverrides {
    fn apply(self, mut config: ConversionConfig) -> ConversionConfig {
        if let Some(population) = self.population {
            config = config.with_population(population);
        }
        if let Some(epoch_date) = self.epoch_date {
            config = config.with_epoch_date(epoch_date);
        }
        if self.calendar_hours {
            config = config.with_hour_indexing(HourIndexing::Calendar);
        }
        if self.reverse_rows {
            config = config.with_row_order(RowOrder::Reverse);
        }
        config
    }
}

fn cmd_convert(
    input: &Path,
    output: &Path,
    config_path: Option<&Path>,
    overrides: ConfigOverrides,
    no_validate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let base = match config_path {
        Some(path) => ConversionConfig::from_file(path)?,
        None => ConversionConfig::default(),
    };

    let options = ConvertOptions {
        config: overrides.apply(base),
        skip_validation: no_validate,
    };

    let summary = convert_file(input, output, &options)?;

    eprintln!("   Rows: {} daily → {} hourly", summary.daily_rows, summary.hourly_rows);
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        eprintln!("   Dates: {} .. {}", first, last);
    }
    if let (Some(first), Some(last)) = (summary.first_hour, summary.last_hour) {
        eprintln!("   Hours: {} .. {}", first, last);
    }
    eprintln!("✨ Done!");
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_csv_file_auto(input)?;
    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.delimiter));
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.records.len());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output)
}

fn cmd_inspect(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let rows = read_counts_file(input)?;

    println!("rows: {}", rows.len());
    if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
        println!("hours: {} .. {}", first.hour, last.hour);
        println!("first: {:?}", first.compartments());
        println!("last: {:?}", last.compartments());
        let peak = rows.iter().map(|r| r.infected).max().unwrap_or(0);
        println!("peak infected: {}", peak);
    }
    Ok(())
}

fn cmd_config(output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let json = ConversionConfig::default().to_json()?;
    write_output(&json, output)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
