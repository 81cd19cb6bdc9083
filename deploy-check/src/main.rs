use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod checks;

/// Check that a checkout is ready to deploy.
///
/// Prints one ✅/❌ line per check and exits with status 1 if anything failed.
/// `<root>/.env` is loaded first when it exists.
#[derive(Parser, Debug)]
#[command(name = "deploy-check", version, about)]
struct Args {
    /// Repository root to inspect
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let env_file = args.root.join(".env");
    if env_file.is_file() {
        dotenvy::from_path(&env_file)?;
    }

    let results = checks::run_all(&args.root, |key| std::env::var(key).ok());

    println!("Deployment checklist for {}", args.root.display());
    for result in &results {
        println!("  {}", result.line());
    }

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed == 0 {
        println!("All {} checks passed.", results.len());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{failed} of {} checks failed.", results.len());
        Ok(ExitCode::FAILURE)
    }
}
