use image::RgbaImage;

/// Blit `src` into `canvas` with its top-left corner at (dx, dy).
/// Pixels falling outside the canvas are discarded.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    for (x, y, px) in src.enumerate_pixels() {
        let cx = dx + x;
        let cy = dy + y;
        if cx < cw && cy < ch {
            canvas.put_pixel(cx, cy, *px);
        }
    }
}
