use std::fs;
use std::path::Path;
use std::sync::Arc;

use resvg::{tiny_skia, usvg};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid svg: {0}")]
    Svg(#[from] usvg::Error),
    #[error("failed to allocate {0}x{0} pixmap")]
    Pixmap(u32),
    #[error("pixel buffer does not match {0}x{0}")]
    Buffer(u32),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// A parsed vector source, ready to be rendered at any pixel size.
#[derive(Debug)]
pub struct Svg {
    tree: usvg::Tree,
}

/// Read and parse an SVG file. System fonts are loaded so text elements
/// render; relative hrefs resolve against the file's directory.
pub fn load_svg(path: &Path) -> Result<Svg, RasterizeError> {
    let data = fs::read(path)?;
    let mut opt = usvg::Options::default();
    opt.resources_dir = fs::canonicalize(path)
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));
    Arc::make_mut(&mut opt.fontdb).load_system_fonts();
    let tree = usvg::Tree::from_data(&data, &opt)?;
    Ok(Svg { tree })
}

/// Render the source at exactly `size`x`size` pixels.
pub fn render(svg: &Svg, size: u32) -> Result<image::RgbaImage, RasterizeError> {
    let mut pixmap =
        tiny_skia::Pixmap::new(size, size).ok_or(RasterizeError::Pixmap(size))?;
    let scale_x = size as f32 / svg.tree.size().width();
    let scale_y = size as f32 / svg.tree.size().height();
    let transform = tiny_skia::Transform::from_scale(scale_x, scale_y);
    resvg::render(&svg.tree, transform, &mut pixmap.as_mut());

    // Pixmap pixels are premultiplied; straighten them out for the PNG.
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image::RgbaImage::from_raw(size, size, rgba).ok_or(RasterizeError::Buffer(size))
}

/// Render and write a PNG, overwriting any existing file at `out`.
pub fn render_png(svg: &Svg, size: u32, out: &Path) -> Result<(), RasterizeError> {
    let img = render(svg, size)?;
    img.save(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64"><rect width="64" height="64" fill="#ff0000"/></svg>"##;

    fn write_svg(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("icon.svg");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_render_exact_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let svg = load_svg(&write_svg(dir.path(), RECT_SVG)).unwrap();
        for size in [16u32, 32, 48, 128] {
            let img = render(&svg, size).unwrap();
            assert_eq!(img.dimensions(), (size, size));
        }
    }

    #[test]
    fn test_render_fill_color() {
        let dir = tempfile::tempdir().unwrap();
        let svg = load_svg(&write_svg(dir.path(), RECT_SVG)).unwrap();
        let img = render(&svg, 16).unwrap();
        let red = img
            .pixels()
            .filter(|p| p.0[0] > 200 && p.0[1] < 50 && p.0[2] < 50 && p.0[3] > 200)
            .count();
        // Full-viewbox rectangle: allow a little antialiasing at the edges.
        assert!(red >= 16 * 16 * 9 / 10, "only {red} red pixels");
    }

    #[test]
    fn test_missing_source_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_svg(&dir.path().join("nope.svg")).unwrap_err();
        assert!(matches!(err, RasterizeError::Io(_)));
    }

    #[test]
    fn test_invalid_svg_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_svg(dir.path(), "this is not markup");
        let err = load_svg(&path).unwrap_err();
        assert!(matches!(err, RasterizeError::Svg(_)));
    }
}
