// Scan conversion
/// Vertical samples per pixel row.
pub const SUBSAMPLES: i32 = 5;
/// Fractional bits of the fixed point x coordinates of active edges.
pub const FIX_SHIFT: i32 = 10;
pub const FIX: i32 = 1 << FIX_SHIFT;
pub const FIX_MASK: i32 = FIX - 1;
/// Coverage one sub-scanline contributes to a fully covered pixel.
pub const MAX_WEIGHT: i32 = 255 / SUBSAMPLES;

// Flattening
/// Flatness tolerance in device pixels, divided by the scale to get document units.
pub const FLATNESS_TOLERANCE: f64 = 0.25 * 4.;
/// Subdivision depth after which a curve piece is emitted as a line regardless of flatness.
pub const MAX_FLATTEN_DEPTH: u32 = 10;

// Memory
/// Active edges per page of the edge pool.
pub const POOL_PAGE_SIZE: usize = 64;

// Paint
pub const LUT_SIZE: usize = 256;
