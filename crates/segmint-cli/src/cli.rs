use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoDate(pub String);

impl IsoDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn parse_iso_date(value: &str) -> Result<IsoDate, String> {
    if value.len() != 10 {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    let bytes = value.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return Err("date must use YYYY-MM-DD format".to_string());
        }
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err("date must use valid calendar values".to_string());
    }

    Ok(IsoDate(value.to_string()))
}

pub fn parse_policy_kind(value: &str) -> Result<String, String> {
    match value {
        "pattern" | "range" => Ok(value.to_string()),
        _ => Err("policy must be one of: pattern, range".to_string()),
    }
}

/// Extended help shown after `segmint score --help`.
/// Contains workflow guidance, the input schema, and next-step instructions.
pub const SCORE_AFTER_HELP: &str = "\
How scoring works:
  Segmint reads a transaction table, derives one RFM row per customer
  (recency in days, frequency, monetary), splits each metric into
  quartile scores 1-4, and assigns a named segment.

  Accepted formats:
    CSV   one header row with exactly the schema field names
    JSON  one top-level array of transaction objects

  <path> is a local file path.
  To read stdin explicitly, use `-` as the path.
  Example: cat transactions.csv | segmint score -

What to do next:
  1. Run `segmint template` to see a valid example file.
  2. Export your transactions into the schema below.
  3. Run `segmint score <path>` and fix any reported row issues.

Input schema (all fields required on every row):
  customer_id    stable customer identifier
  branch         branch the customer purchased from
  route          delivery or sales route
  purchase_date  date only, exactly YYYY-MM-DD

  CSV example (header + rows):
  customer_id,branch,route,purchase_date
  Cust1,A,X,2023-01-01
  Cust1,A,X,2023-02-15

Scoring rules (strict):
  - Recency is measured against --as-of (default: today). Smaller is
    better: the most recent customers score r=4.
  - Frequency and monetary are transaction counts. Larger is better.
  - Quartiles need at least 4 customers and 4 distinct values per
    metric. Smaller or flatter datasets are rejected, not guessed at.

Segment policies:
  pattern  exact (r,f,m) triples map to named segments; everything
           else lands in `Other` (default)
  range    the 3-digit composite score falls into one of 4 buckets
";

#[derive(Debug, Parser)]
#[command(
    name = "segmint",
    version,
    about = "RFM customer segmentation for transaction tables",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score customers from a transaction table and assign segments
    #[command(after_long_help = SCORE_AFTER_HELP)]
    Score {
        /// Path to a CSV or JSON transaction file (use `-` for stdin)
        path: Option<String>,
        /// Evaluation date for recency (YYYY-MM-DD, default: today)
        #[arg(long, value_parser = parse_iso_date)]
        as_of: Option<IsoDate>,
        /// Segment policy: pattern or range
        #[arg(long, default_value = "pattern", value_parser = parse_policy_kind)]
        policy: String,
        /// Only show customers whose id contains this text (case-insensitive)
        #[arg(long)]
        customer: Option<String>,
        /// Only show customers in this exact segment
        #[arg(long)]
        segment: Option<String>,
        /// Also write the full scored table to this CSV file
        #[arg(long)]
        out: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Print an example transaction file matching the input schema
    Template {
        /// Write the example CSV to this file instead of only printing it
        #[arg(long)]
        out: Option<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
