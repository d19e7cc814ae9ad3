use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::Cli;

pub fn run(shell: Shell) -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "tally-cli", &mut std::io::stdout());
    Ok(())
}
