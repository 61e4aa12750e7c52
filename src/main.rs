//! Command line tool to expand response files over search paths.

use ::clap::Parser;
use ::log::LevelFilter;
use ::mimalloc::MiMalloc;
use ::respfile::cli::{Action, Cli};

/// Use mimalloc as global allocator
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ::color_eyre::Result<()> {
    let cli = Cli::parse();
    ::color_eyre::install()?;
    ::env_logger::builder()
        .filter_module("respfile", LevelFilter::Info)
        .init();

    match Action::from(cli) {
        Action::Completions(completions) => completions.generate(),
        Action::Expand(expand) => expand.run(),
        Action::Locate(locate) => locate.run(),
    }
}
