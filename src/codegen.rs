use itertools::Itertools;

use crate::{error::ConvertError, image::IndexedImage, palette::Palette};

/// Which arrays end up in the generated pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Combined,
    Image,
    Palette,
}

impl OutputKind {
    fn has_pixels(self) -> bool {
        self != OutputKind::Palette
    }

    fn has_palette(self) -> bool {
        self != OutputKind::Image
    }

    fn guard_suffix(self) -> &'static str {
        match self {
            OutputKind::Combined => "",
            OutputKind::Image => "_IMAGE",
            OutputKind::Palette => "_PALETTE",
        }
    }
}

/// Turn a file stem into a usable C identifier.
pub fn identifier_from_stem(stem: &str) -> Result<String, ConvertError> {
    let mut ident: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.chars().all(|c| c == '_') {
        return Err(ConvertError::InvalidName(stem.to_string()));
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    Ok(ident)
}

/// Everything needed to render one header/source pair.
pub struct Asset<'a> {
    pub name: &'a str,
    pub original_file: &'a str,
    pub header_file: &'a str,
    pub namespace: &'a str,
    pub include_dir: &'a str,
    pub indexed: &'a IndexedImage,
    pub palette: &'a Palette,
}

impl<'a> Asset<'a> {
    pub fn guard(&self, kind: OutputKind) -> String {
        format!("GENERATED_GRAPHICS_{}{}_HPP", self.name.to_uppercase(), kind.guard_suffix())
    }

    fn include(&self, file: &str) -> String {
        let dir = self.include_dir.trim_end_matches('/');
        if dir.is_empty() {
            format!("#include \"{}\"\n", file)
        } else {
            format!("#include \"{}/{}\"\n", dir, file)
        }
    }

    fn pixel_count(&self) -> usize {
        self.indexed.width * self.indexed.height
    }

    pub fn render_header(&self, kind: OutputKind) -> String {
        let guard = self.guard(kind);
        let name = self.name;
        let mut out = String::new();

        out.push_str(&format!("#ifndef {}\n", guard));
        out.push_str(&format!("#define {}\n\n", guard));
        out.push_str("// This file is auto-generated. Do not edit manually.\n");
        out.push_str(&format!("// Original image: {}\n\n", self.original_file));
        out.push_str("#include <cstdint>\n");
        if kind.has_pixels() {
            out.push_str(&self.include("Image.hpp"));
        }
        if kind.has_palette() {
            out.push_str(&self.include("Palette.hpp"));
        }
        out.push('\n');

        if !self.namespace.is_empty() {
            out.push_str(&format!("using namespace {};\n\n", self.namespace));
        }

        if kind.has_pixels() {
            out.push_str(&format!("extern uint8_t {}_pixels[{}];\n\n", name, self.pixel_count()));
            out.push_str(&format!("extern Image {}_image;\n\n", name));
        }
        if kind.has_palette() {
            out.push_str(&format!("extern uint32_t {}_pal[{}];\n\n", name, self.palette.len()));
            out.push_str(&format!("extern Palette {}_palette;\n\n", name));
        }

        out.push_str(&format!("#endif // {}\n", guard));
        out
    }

    pub fn render_source(&self, kind: OutputKind) -> String {
        let name = self.name;
        let mut out = format!("#include \"{}\"\n\n", self.header_file);

        if kind.has_pixels() {
            let IndexedImage { width, height, .. } = self.indexed;
            out.push_str(&format!("uint8_t {}_pixels[{}] = {{\n", name, self.pixel_count()));
            for row in &self.indexed.pixels.iter().chunks(*width) {
                out.push_str("    ");
                out.push_str(&row.map(|index| format!("{:3}", index)).join(", "));
                out.push_str(", \n");
            }
            out.push_str("};\n\n");

            out.push_str(&format!("Image {}_image = {{\n", name));
            out.push_str(&format!("    .pixels = {}_pixels,\n", name));
            out.push_str(&format!("    .width = {},\n", width));
            out.push_str(&format!("    .height = {},\n", height));
            out.push_str(&format!("    .paletteSize = {},\n", self.palette.len()));
            out.push_str("};\n\n");
        }

        if kind.has_palette() {
            out.push_str(&format!("uint32_t {}_pal[{}] = {{\n", name, self.palette.len()));
            for rgba in self.palette.packed() {
                out.push_str(&format!("    0x{:08X},\n", rgba));
            }
            out.push_str("};\n\n");

            out.push_str(&format!("Palette {}_palette = {{\n", name));
            out.push_str(&format!("    .colors = {}_pal,\n", name));
            out.push_str(&format!("    .size = {},\n", self.palette.len()));
            out.push_str("};\n\n");
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (IndexedImage, Palette) {
        let indexed = IndexedImage { width: 3, height: 2, pixels: vec![0, 1, 2, 2, 1, 0] };
        let palette = Palette {
            colors: vec![[0xff, 0, 0, 0xff], [0, 0xff, 0, 0x80], [0, 0, 0xff, 0]],
        };
        (indexed, palette)
    }

    fn asset<'a>(indexed: &'a IndexedImage, palette: &'a Palette) -> Asset<'a> {
        Asset {
            name: "hero",
            original_file: "hero.png",
            header_file: "hero.hpp",
            namespace: "Engine",
            include_dir: "../../core",
            indexed,
            palette,
        }
    }

    #[test]
    fn image_header_layout() {
        let (indexed, palette) = fixture();
        let header = asset(&indexed, &palette).render_header(OutputKind::Image);
        let expected = "\
#ifndef GENERATED_GRAPHICS_HERO_IMAGE_HPP
#define GENERATED_GRAPHICS_HERO_IMAGE_HPP

// This file is auto-generated. Do not edit manually.
// Original image: hero.png

#include <cstdint>
#include \"../../core/Image.hpp\"

using namespace Engine;

extern uint8_t hero_pixels[6];

extern Image hero_image;

#endif // GENERATED_GRAPHICS_HERO_IMAGE_HPP
";
        assert_eq!(header, expected);
    }

    #[test]
    fn image_source_layout() {
        let (indexed, palette) = fixture();
        let source = asset(&indexed, &palette).render_source(OutputKind::Image);
        let expected = "\
#include \"hero.hpp\"

uint8_t hero_pixels[6] = {
      0,   1,   2,\x20
      2,   1,   0,\x20
};

Image hero_image = {
    .pixels = hero_pixels,
    .width = 3,
    .height = 2,
    .paletteSize = 3,
};

";
        assert_eq!(source, expected);
    }

    #[test]
    fn palette_source_layout() {
        let (indexed, palette) = fixture();
        let source = asset(&indexed, &palette).render_source(OutputKind::Palette);
        let expected = "\
#include \"hero.hpp\"

uint32_t hero_pal[3] = {
    0xFF0000FF,
    0x00FF0080,
    0x0000FF00,
};

Palette hero_palette = {
    .colors = hero_pal,
    .size = 3,
};

";
        assert_eq!(source, expected);
    }

    #[test]
    fn combined_pair_declares_both_arrays() {
        let (indexed, palette) = fixture();
        let asset = asset(&indexed, &palette);
        let header = asset.render_header(OutputKind::Combined);
        assert!(header.starts_with("#ifndef GENERATED_GRAPHICS_HERO_HPP\n"));
        assert!(header.contains("#include \"../../core/Image.hpp\"\n#include \"../../core/Palette.hpp\"\n"));
        assert!(header.contains("extern uint8_t hero_pixels[6];"));
        assert!(header.contains("extern uint32_t hero_pal[3];"));

        let source = asset.render_source(OutputKind::Combined);
        assert!(source.contains("uint8_t hero_pixels[6] = {"));
        assert!(source.contains("Palette hero_palette = {"));
        assert!(source.find("hero_image").unwrap() < source.find("hero_pal[").unwrap());
    }

    #[test]
    fn empty_include_dir_and_namespace() {
        let (indexed, palette) = fixture();
        let mut asset = asset(&indexed, &palette);
        asset.include_dir = "";
        asset.namespace = "";
        let header = asset.render_header(OutputKind::Palette);
        assert!(header.contains("#include \"Palette.hpp\"\n"));
        assert!(!header.contains("using namespace"));
    }

    #[test]
    fn identifiers_are_sanitized() {
        assert_eq!(identifier_from_stem("player").unwrap(), "player");
        assert_eq!(identifier_from_stem("tile-set.v2").unwrap(), "tile_set_v2");
        assert_eq!(identifier_from_stem("8bit").unwrap(), "_8bit");
        assert!(identifier_from_stem("").is_err());
        assert!(identifier_from_stem("--").is_err());
    }
}
