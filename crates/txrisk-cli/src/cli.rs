use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub fn parse_threshold(value: &str) -> Result<f64, String> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| "threshold must be a number (e.g. 10000)".to_string())?;
    if !parsed.is_finite() {
        return Err("threshold must be a finite number".to_string());
    }
    Ok(parsed)
}

pub fn parse_non_empty(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("value must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

/// Extended help shown after `txrisk classify --help`.
pub const CLASSIFY_AFTER_HELP: &str = "\
Input:
  CSV with one header row. <path> is a local file; use `-` to read stdin
  explicitly, or paste rows with --text. With no path, piped stdin is used.

  Required column:
    Amount    A number. Rows with a blank or non-numeric Amount stop the run
              and the error names the offending row.
  Optional columns:
    Country   Checked against the allow-list when one is configured.
    Time      Checked against the time prefix when one is configured.
    Customer  Shown in results.
  Any other columns are carried through to exports unchanged.

  Example:
    Customer,Amount,Country,Time
    ana,15000,USA,14:00
    bo,100,France,09:15

Rules (evaluated in this order; every match is listed as a reason):
  1. High transaction amount   Amount > threshold (default 10000)
  2. Unusual country           Country not in the allow-list
  3. Odd transaction time      Time starts with the configured prefix
  Rules 2 and 3 only run when configured and when the row has the field.

Configuration:
  --config <file>, else $TXRISK_CONFIG, else ~/.txrisk/rules.toml:

    [rules]
    amount_threshold = 5000
    country_allow_list = [\"Nigeria\", \"USA\", \"UK\"]
    time_prefix = \"2\"

  --threshold, --allow-country, and --time-prefix override the file.

Exports:
  --output <file> writes the rows shown (all, or flagged with --flagged-only)
  with Risk_Label, Flagged, and Fraud_Check columns appended.
";

#[derive(Debug, Parser)]
#[command(
    name = "txrisk",
    version,
    about = "rule-based transaction risk screening",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Path to a transactions CSV file (use `-` for stdin)
    pub path: Option<String>,
    /// Inline CSV text, header row included
    #[arg(long, conflicts_with = "path")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RuleArgs {
    /// Rules TOML file (defaults to $TXRISK_CONFIG or ~/.txrisk/rules.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Flag transactions whose Amount is strictly above this value
    #[arg(long, value_name = "AMOUNT", value_parser = parse_threshold)]
    pub threshold: Option<f64>,
    /// Country treated as usual; repeat to build the allow-list
    #[arg(long = "allow-country", value_name = "COUNTRY", value_parser = parse_non_empty)]
    pub allow_country: Vec<String>,
    /// Flag transactions whose Time starts with this prefix
    #[arg(long, value_name = "PREFIX", value_parser = parse_non_empty)]
    pub time_prefix: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Screen transactions and show the risk summary
    #[command(after_long_help = CLASSIFY_AFTER_HELP)]
    Classify {
        #[command(flatten)]
        input: InputArgs,
        /// Only list (and export) flagged transactions
        #[arg(long)]
        flagged_only: bool,
        /// Also write the listed rows to this CSV file
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
        #[command(flatten)]
        rules: RuleArgs,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Write screened transactions as CSV (stdout unless --output is given)
    Export {
        #[command(flatten)]
        input: InputArgs,
        /// Only export flagged transactions
        #[arg(long)]
        flagged_only: bool,
        /// Destination CSV file
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
        #[command(flatten)]
        rules: RuleArgs,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show the active rule set and where it came from
    Rules {
        #[command(flatten)]
        rules: RuleArgs,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
