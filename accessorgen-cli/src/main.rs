//! CLI entrypoint for `accessorgen`.

use std::io::Write;

use accessorgen_cli::Outcome;
use accessorgen_cli::cli::Args;
use accessorgen_cli::error::CliError;
use clap::Parser;

fn main() -> Result<(), CliError> {
    let args = Args::parse();
    accessorgen_cli::logging::init(args.verbose)?;
    let outcome = accessorgen_cli::run(&args)?;
    report(&outcome)
}

/// Lists the planned units of a dry run on standard output.
fn report(outcome: &Outcome) -> Result<(), CliError> {
    let Outcome::Planned(manifest) = outcome else {
        return Ok(());
    };
    let mut stdout = std::io::stdout().lock();
    for unit in &manifest.units {
        writeln!(stdout, "{unit}").map_err(|err| CliError::io("<stdout>", err))?;
    }
    Ok(())
}
