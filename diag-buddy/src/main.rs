use anyhow::Result;
use clap::Parser;

use diag_buddy::diag_call;
use netsys_diag::helpers::{bootstrap, logging};

mod cmd_logic;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[clap(flatten)]
    logging: logging::Params,

    #[clap(flatten)]
    diag: diag_call::Params,

    #[command(subcommand)]
    command: cmd_logic::Commands,
}

fn main() -> Result<()> {
    bootstrap::run(
        Cli::parse,
        |cli: &Cli| &cli.logging,
        do_run,
    )
}

fn do_run(cli: Cli) -> Result<()> {
    cmd_logic::handle(cli.command, &cli.diag)
}
