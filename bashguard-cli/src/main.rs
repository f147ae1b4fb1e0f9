//! Command-line interface entry point for bashguard.

use anyhow::Result;
use bashguard::entry_point;

fn main() -> Result<()> {
    // Delegate CLI args to shared entry_point function
    let code = entry_point::run_with_args(std::env::args().collect())?;
    std::process::exit(code);
}
