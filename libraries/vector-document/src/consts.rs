/// Length of a cubic bezier handle, relative to the radius, that best approximates a 90° circular arc.
pub const KAPPA90: f64 = 0.552_284_749_3;

/// Resolution assumed by absolute units (`in`, `cm`, `pt`, ...) when the caller does not provide one.
pub const DEFAULT_DPI: f64 = 96.;

/// Maximum number of attribute name/value pairs kept per tag. Further attributes are ignored.
pub const MAX_ATTRIBUTES: usize = 128;

/// Default limit on how deeply groups and other state-carrying elements may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Ratio of the x-height to the font size used to resolve `ex` units.
pub const EX_PER_EM: f64 = 0.52;

/// Color used when a color value cannot be understood.
pub const FALLBACK_GRAY: u8 = 128;

/// Leading coefficients smaller than this make the extrema equation degenerate to a lower degree.
pub const ROOT_EPSILON: f64 = 1e-12;

/// Arcs whose radii or chord length fall below this are treated as straight lines.
pub const ARC_DEGENERATE_EPSILON: f64 = 1e-6;

/// Limit on `xlink:href` hops followed while looking for a gradient's stops.
pub const MAX_GRADIENT_REFERENCE_DEPTH: usize = 32;
