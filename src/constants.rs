//! Application-wide constants.

/// Root element name of a persisted document
pub const DOCUMENT_ROOT_TAG: &str = "CanvasDataModel";

/// Decimal digits kept when floats are written to a document
pub const FLOAT_DIGITS: i32 = 8;

/// Default viewport zoom factor
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Default maximum number of commands kept in the undo history (0 = unlimited)
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Maximum number of recent documents remembered in config
pub const MAX_RECENT_DOCUMENTS: usize = 10;

/// Hit tolerance for drawable objects, in screen pixels
pub const HIT_TOLERANCE_PIXELS: f64 = 4.0;
