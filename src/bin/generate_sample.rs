use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Moduli written next to the running number, one column each.
const MODULI: [u64; 3] = [350, 8000, 20002];

/// Write the sample dataset: `number` plus its remainders modulo 350, 8000
/// and 20002.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of data rows
    #[arg(short, long, default_value_t = 50_000)]
    rows: u64,

    /// Output CSV path
    #[arg(short, long, default_value = "dataset_large.csv")]
    output: PathBuf,
}

fn modulo_record(number: u64) -> Vec<String> {
    std::iter::once(number.to_string())
        .chain(MODULI.iter().map(|m| (number % m).to_string()))
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let header = std::iter::once("number".to_string())
        .chain(MODULI.iter().map(|m| format!("mod{m}")));
    writer.write_record(header).context("writing header")?;

    for number in 1..=args.rows {
        writer
            .write_record(modulo_record(number))
            .with_context(|| format!("writing row {number}"))?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {} rows to {}", args.rows, args.output.display());
    Ok(())
}
