/// Placement of a `width × height` source inside a `target × target` square.
///
/// The source is scaled by `min(target / width, target / height)` so it fits
/// both axes, then centered; whatever is left over is black padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub target_size: u32,
    pub scale: f64,
    pub new_width: u32,
    pub new_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl Letterbox {
    /// Computes the placement. All three sizes must be non-zero.
    pub fn fit(width: u32, height: u32, target_size: u32) -> Letterbox {
        let target = target_size as f64;
        let scale = (target / width as f64).min(target / height as f64);

        // Rounding can overshoot by one pixel on extreme aspect ratios, and a
        // sliver-thin source must still cover at least one pixel.
        let new_width = ((width as f64 * scale).round() as u32).clamp(1, target_size);
        let new_height = ((height as f64 * scale).round() as u32).clamp(1, target_size);

        Letterbox {
            target_size,
            scale,
            new_width,
            new_height,
            offset_x: (target_size - new_width) / 2,
            offset_y: (target_size - new_height) / 2,
        }
    }

    /// True when `(x, y)` on the canvas is covered by the scaled source.
    pub fn covers(&self, x: u32, y: u32) -> bool {
        x >= self.offset_x
            && x < self.offset_x + self.new_width
            && y >= self.offset_y
            && y < self.offset_y + self.new_height
    }
}
