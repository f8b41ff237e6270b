use std::collections::HashMap;

use log::debug;

use crate::{
    error::ConvertError,
    image::{Image, Rgba},
};

/// Unique colors past this count make an image unanalyzable.
pub const ANALYSIS_LIMIT: usize = 1_000_000;

/// Indices are emitted as `uint8_t`.
pub const MAX_PALETTE_SIZE: usize = 256;

/// `(pixel count, color)` per unique color, in order of first appearance.
pub type ColorCensus = Vec<(usize, Rgba)>;

/// Count the unique colors of `image`, giving up once there are more than `limit`.
pub fn count_colors(image: &Image, limit: usize) -> Option<ColorCensus> {
    let mut slots: HashMap<Rgba, usize> = HashMap::new();
    let mut census: ColorCensus = Vec::new();

    for pixel in &image.pixels {
        match slots.get(pixel) {
            Some(&slot) => census[slot].0 += 1,
            None => {
                if census.len() == limit {
                    return None;
                }
                slots.insert(*pixel, census.len());
                census.push((1, *pixel));
            }
        }
    }

    Some(census)
}

pub struct Palette {
    pub colors: Vec<Rgba>,
}

impl Palette {
    /// Build a palette of at most `max_colors` entries for `image`.
    ///
    /// A census that fits gets one entry per color, in census order. Anything
    /// larger is handed to libimagequant. Returns the palette together with the
    /// index every census color maps to.
    pub fn from_image(
        image: &Image,
        census: &[(usize, Rgba)],
        max_colors: usize,
    ) -> Result<(Palette, HashMap<Rgba, u8>), ConvertError> {
        if max_colors == 0 || max_colors > MAX_PALETTE_SIZE {
            return Err(ConvertError::InvalidMaxColors(max_colors));
        }

        if census.len() <= max_colors {
            let colors: Vec<Rgba> = census.iter().map(|&(_, color)| color).collect();
            let lookup = colors
                .iter()
                .enumerate()
                .map(|(index, &color)| (color, index as u8))
                .collect();
            return Ok((Palette { colors }, lookup));
        }

        debug!("reducing {} colors to at most {}", census.len(), max_colors);
        reduce(image, max_colors).map_err(ConvertError::Quantize)
    }

    pub(crate) fn len(&self) -> usize {
        self.colors.len()
    }

    /// Drop alpha information, every entry becomes fully opaque.
    pub fn make_opaque(&mut self) {
        for color in &mut self.colors {
            color[3] = 0xff;
        }
    }

    /// Entries packed as `0xRRGGBBAA`.
    pub fn packed(&self) -> Vec<u32> {
        self.colors.iter().map(|&color| u32::from_be_bytes(color)).collect()
    }
}

// Quantize with libimagequant, no dithering so equal colors share an index.
fn reduce(image: &Image, max_colors: usize) -> Result<(Palette, HashMap<Rgba, u8>), imagequant::Error> {
    let bitmap: Vec<imagequant::RGBA> = image
        .pixels
        .iter()
        .map(|&[r, g, b, a]| imagequant::RGBA::new(r, g, b, a))
        .collect();

    let mut liq = imagequant::new();
    liq.set_max_colors(max_colors as u32)?;
    liq.set_quality(0, 100)?;

    let mut img = liq.new_image(bitmap, image.width, image.height, 0.0)?;
    let mut res = liq.quantize(&mut img)?;
    res.set_dithering_level(0.0)?;
    let (palette, indices) = res.remapped(&mut img)?;

    let colors = palette.iter().map(|c| [c.r, c.g, c.b, c.a]).collect();
    let lookup = image.pixels.iter().copied().zip(indices).collect();
    Ok((Palette { colors }, lookup))
}
