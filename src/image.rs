use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use log::debug;
use pix::{el::Pixel, Raster};
use png_pong::Decoder;

use crate::error::ConvertError;

/// An RGBA8 color, channels in R, G, B, A order.
pub type Rgba = [u8; 4];

#[derive(Debug)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgba>
}

impl Image {
    pub fn encode_to_palette(&self, lookup: &HashMap<Rgba, u8>) -> IndexedImage {
        IndexedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(| pixel | lookup[pixel]).collect()
        }
    }

    fn from_raster<P: Pixel>(raster: &Raster<P>, to_rgba: impl Fn(&P) -> Rgba) -> Self {
        Image {
            width: raster.width() as usize,
            height: raster.height() as usize,
            pixels: raster.pixels().iter().map(to_rgba).collect()
        }
    }
}

/// Pixel buffer of palette indices, row-major, one per source pixel.
#[derive(Debug)]
pub struct IndexedImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>
}

impl IndexedImage {
    /// Look every index up in `palette`, giving back an RGBA buffer.
    pub fn reconstruct(&self, palette: &[Rgba]) -> Vec<Rgba> {
        self.pixels.iter().map(| &index | palette[index as usize]).collect()
    }
}

fn narrow(channel: u16) -> u8 {
    (channel >> 8) as u8
}

// Load an image from a path, every color type ends up as RGBA8.
pub fn load_image_from_path(path: &Path) -> Result<Image> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let decoder = Decoder::new(BufReader::new(file))
        .with_context(|| format!("failed to read PNG header of {}", path.display()))?
        .into_steps();
    let png_pong::Step { raster, .. } = decoder.last()
        .ok_or_else(|| ConvertError::NoFrames { path: path.to_path_buf() })?
        .with_context(|| format!("failed to decode {}", path.display()))?;

    let image = match raster {
        png_pong::PngRaster::Gray8(raster) => {
            debug!("{}: Gray8", path.display());
            Image::from_raster(&raster, | pixel | {
                let v = u8::from(pixel.one());
                [v, v, v, 0xff]
            })
        },
        png_pong::PngRaster::Gray16(raster) => {
            debug!("{}: Gray16", path.display());
            Image::from_raster(&raster, | pixel | {
                let v = narrow(u16::from(pixel.one()));
                [v, v, v, 0xff]
            })
        },
        png_pong::PngRaster::Rgb8(raster) => {
            debug!("{}: Rgb8", path.display());
            Image::from_raster(&raster, | pixel | {
                [pixel.one().into(), pixel.two().into(), pixel.three().into(), 0xff]
            })
        },
        png_pong::PngRaster::Rgb16(raster) => {
            debug!("{}: Rgb16", path.display());
            Image::from_raster(&raster, | pixel | {
                let [r, g, b] = [pixel.one(), pixel.two(), pixel.three()].map(| channel | narrow(channel.into()));
                [r, g, b, 0xff]
            })
        },
        png_pong::PngRaster::Palette(raster, palette, alpha) => {
            debug!("{}: Palette", path.display());
            Image::from_raster(&raster, | pixel | {
                let index = u8::from(pixel.one()) as usize;
                let entry = palette.entry(index).unwrap_or_default();
                let a = alpha.get(index).copied().map(u8::from).unwrap_or(0xff);
                [entry.one().into(), entry.two().into(), entry.three().into(), a]
            })
        },
        png_pong::PngRaster::Graya8(raster) => {
            debug!("{}: Graya8", path.display());
            Image::from_raster(&raster, | pixel | {
                let v = u8::from(pixel.one());
                [v, v, v, pixel.two().into()]
            })
        },
        png_pong::PngRaster::Graya16(raster) => {
            debug!("{}: Graya16", path.display());
            Image::from_raster(&raster, | pixel | {
                let v = narrow(u16::from(pixel.one()));
                [v, v, v, narrow(u16::from(pixel.two()))]
            })
        },
        png_pong::PngRaster::Rgba8(raster) => {
            debug!("{}: Rgba8", path.display());
            Image::from_raster(&raster, | pixel | {
                [pixel.one().into(), pixel.two().into(), pixel.three().into(), pixel.four().into()]
            })
        },
        png_pong::PngRaster::Rgba16(raster) => {
            debug!("{}: Rgba16", path.display());
            Image::from_raster(&raster, | pixel | {
                [pixel.one(), pixel.two(), pixel.three(), pixel.four()].map(| channel | narrow(channel.into()))
            })
        },
    };

    if image.pixels.is_empty() {
        return Err(ConvertError::EmptyImage { path: path.to_path_buf() }.into());
    }

    Ok(image)
}

#[cfg(test)]
pub fn save_image_to_path(image: &Image, path: &Path) -> Result<()> {
    use std::io::BufWriter;
    use png_pong::Encoder;

    let Image{height, width, .. } = image;
    let buffer: Vec<u8> = image.pixels.iter().flatten().copied().collect();
    let raster: Raster<pix::rgb::SRgba8> = Raster::with_u8_buffer(*width as u32, *height as u32, buffer);

    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = Encoder::new(writer).into_step_enc();
    encoder.still(&raster)?;
    Ok(())
}

#[cfg(test)]
pub fn scratch_dir(label: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("pngindex-{}-{}", label, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
