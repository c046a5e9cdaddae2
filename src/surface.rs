use cgmath::Vector2;

/// Straight (non-premultiplied) color with 8-bit channels and a float alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// A 2D raster target the field renders into once per tick.
///
/// `opacity` is passed through unclamped; implementations decide how to
/// treat values outside `[0, 1]`.
pub trait DrawSurface {
    /// Wipe the whole drawable area.
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vector2<f32>, radius: f32, color: Rgba, opacity: f32);
}

/// Discards everything. Useful for stepping the simulation without a display.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl DrawSurface for NullSurface {
    fn clear(&mut self) {}

    fn fill_circle(&mut self, _center: Vector2<f32>, _radius: f32, _color: Rgba, _opacity: f32) {}
}
