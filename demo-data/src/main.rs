use anyhow::Result;
use clap::Parser;

mod sermon;

/// Print the demo sermon record as JSON.
///
/// The record is static; pipe it into whatever seeds your demo environment.
#[derive(Parser, Debug)]
#[command(name = "demo-data", version, about)]
struct Args {
    /// Print on a single line instead of pretty JSON
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let sermon = sermon::sample_sermon();

    let out = if args.compact {
        serde_json::to_string(&sermon)?
    } else {
        serde_json::to_string_pretty(&sermon)?
    };
    println!("{out}");

    Ok(())
}
