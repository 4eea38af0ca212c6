use std::fs;
use std::path::{Path, PathBuf};

use crate::logger;
use crate::rasterize::{self, RasterizeError};

/// Target pixel sizes, rendered in this order.
pub const SIZES: [u32; 4] = [16, 32, 48, 128];

pub const ICON_DIR: &str = "icons";
pub const SOURCE_SVG: &str = "icons/icon.svg";

pub fn output_path(dir: &Path, size: u32) -> PathBuf {
    dir.join(format!("icon{}.png", size))
}

/// Generate the full icon set at the fixed repository paths.
pub fn generate_all() -> Result<(), RasterizeError> {
    generate_into(Path::new(ICON_DIR), Path::new(SOURCE_SVG))
}

/// Render `source` at every size in [`SIZES`] into `out_dir`, creating the
/// directory if needed. Existing outputs are overwritten. The first failure
/// aborts the pass; files already written stay on disk.
pub fn generate_into(out_dir: &Path, source: &Path) -> Result<(), RasterizeError> {
    fs::create_dir_all(out_dir)?;
    let svg = rasterize::load_svg(source)?;
    for size in SIZES {
        let out = output_path(out_dir, size);
        rasterize::render_png(&svg, size, &out)?;
        logger::log_line(&format!("generated {}", out.display()));
        println!("Generated {}", out.display());
    }
    Ok(())
}
