use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CLIArguments {
   #[command(subcommand)]
   pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
   /// Emit the pixel array and the palette array in one header/source pair
   Convert(ConvertArgs),

   /// Emit only the pixel array and its Image struct
   Image(ConvertArgs),

   /// Emit only the RGBA palette and its Palette struct
   Palette(ConvertArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
   /// Path to the source PNG
   pub input: PathBuf,

   /// Path of the generated header, the source file is written next to it
   pub output: PathBuf,

   /// Symbol prefix, defaults to the input file stem
   #[arg(long)]
   pub name: Option<String>,

   /// Namespace pulled in by the generated header
   #[arg(long, default_value = "Engine")]
   pub namespace: String,

   /// Directory of Image.hpp / Palette.hpp, relative to the generated header
   #[arg(long, default_value = "../../core")]
   pub include_dir: String,

   /// Palette capacity, images with more colors are reduced to this many
   #[arg(long, default_value_t = 256)]
   pub max_colors: usize,

   /// Force every palette entry to full opacity
   #[arg(long, default_value_t = false)]
   pub opaque: bool,
}
