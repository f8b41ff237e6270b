use anyhow::Result;
use clap::Parser;
use log::info;

mod cli;
mod codegen;
mod convert;
mod error;
mod image;
mod palette;

use crate::{
    cli::{CLIArguments, Command},
    codegen::OutputKind,
    convert::convert,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CLIArguments::parse();

    let (request, kind) = match &args.command {
        Command::Convert(request) => (request, OutputKind::Combined),
        Command::Image(request) => (request, OutputKind::Image),
        Command::Palette(request) => (request, OutputKind::Palette),
    };
    let outputs = convert(request, kind)?;
    info!(
        "[OK] Converted: {} -> {} and {} ({} colors)",
        request.input.display(),
        outputs.header.display(),
        outputs.source.display(),
        outputs.palette_size
    );

    Ok(())
}
