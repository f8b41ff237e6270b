use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use log::debug;

use crate::{
    cli::ConvertArgs,
    codegen::{identifier_from_stem, Asset, OutputKind},
    error::ConvertError,
    image::load_image_from_path,
    palette::{count_colors, Palette, ANALYSIS_LIMIT},
};

/// Paths written by one conversion.
#[derive(Debug)]
pub struct Outputs {
    pub header: PathBuf,
    pub source: PathBuf,
    pub palette_size: usize,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read the PNG at `args.input`, index it and write the header/source pair.
pub fn convert(args: &ConvertArgs, kind: OutputKind) -> Result<Outputs> {
    let name = match &args.name {
        Some(name) => identifier_from_stem(name)?,
        None => {
            let stem = args.input.file_stem().unwrap_or_default().to_string_lossy();
            identifier_from_stem(&stem)?
        }
    };

    let image = load_image_from_path(&args.input)?;
    debug!("{}: {}x{}", args.input.display(), image.width, image.height);

    let census = count_colors(&image, ANALYSIS_LIMIT).ok_or_else(|| ConvertError::TooManyColors {
        path: args.input.clone(),
        limit: ANALYSIS_LIMIT,
    })?;
    debug!("{} unique colors", census.len());

    let (mut palette, lookup) = Palette::from_image(&image, &census, args.max_colors)?;
    if args.opaque {
        palette.make_opaque();
    }
    let indexed = image.encode_to_palette(&lookup);
    let approximated = indexed
        .reconstruct(&palette.colors)
        .iter()
        .zip(&image.pixels)
        .filter(|(rebuilt, original)| rebuilt[..3] != original[..3])
        .count();
    if approximated > 0 {
        debug!("{} of {} pixels approximated", approximated, image.pixels.len());
    }

    let header = args.output.with_extension("hpp");
    let source = args.output.with_extension("cpp");
    let header_file = file_name(&header);
    let original_file = file_name(&args.input);

    let asset = Asset {
        name: &name,
        original_file: &original_file,
        header_file: &header_file,
        namespace: &args.namespace,
        include_dir: &args.include_dir,
        indexed: &indexed,
        palette: &palette,
    };

    if let Some(dir) = header.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    fs::write(&header, asset.render_header(kind))
        .with_context(|| format!("failed to write {}", header.display()))?;
    fs::write(&source, asset.render_source(kind))
        .with_context(|| format!("failed to write {}", source.display()))?;

    Ok(Outputs { header, source, palette_size: palette.len() })
}
