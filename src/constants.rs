use crate::types::Generation;

/// Constants defining the hybrid key text format.
///
/// The delimiters and the generation digit width are part of the stable key
/// format; changing any of them invalidates previously issued keys.
pub mod key {
    /// Delimiter between dimension codes and before the generation field.
    pub const DIMENSION_DELIMITER: char = '-';
    /// Delimiter introducing the optional trailing comment.
    pub const COMMENT_DELIMITER: char = '#';
    /// Fixed zero-padded width of the generation field.
    pub const GENERATION_WIDTH: usize = 2;
    /// Number of delimiter-separated segments before the comment
    /// (four dimension codes plus the generation field).
    pub const SEGMENT_COUNT: usize = 5;
}

/// Built-in vocabulary tables and generation bounds.
pub mod vocab {
    use super::Generation;

    /// Default duration codes (how long the reentry window lasted).
    pub const DEFAULT_DURATION: &[&str] = &["FLASH", "SHORT", "MEDIUM", "LONG", "EXTENDED"];
    /// Default proximity codes (where the reentry sat relative to the event).
    pub const DEFAULT_PROXIMITY: &[&str] = &["AT_EVENT", "PRE_EVENT", "POST_EVENT", "OFF_EVENT"];
    /// Default outcome codes (graded win/loss plus breakeven).
    pub const DEFAULT_OUTCOME: &[&str] = &["W1", "W2", "L1", "L2", "BE"];
    /// Default direction codes.
    pub const DEFAULT_DIRECTION: &[&str] = &["LONG", "SHORT"];
    /// Default lower generation bound.
    pub const DEFAULT_GENERATION_MIN: Generation = 1;
    /// Default upper generation bound.
    pub const DEFAULT_GENERATION_MAX: Generation = 5;
}

/// Constants used by indicator validation reporting.
pub mod validator {
    /// Field label used for record-level violations (e.g. record not a mapping).
    pub const RECORD_FIELD: &str = "$record";
}
