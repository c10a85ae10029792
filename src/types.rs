/// A single categorical code within one vocabulary dimension.
/// Examples: `FLASH`, `AT_EVENT`, `W1`, `LONG`
pub type DimensionCode = String;
/// Reentry generation counter (how many times an event has recurred).
/// Examples: `1`, `3`
pub type Generation = u32;
/// Free-form comment text carried verbatim at the end of a hybrid key.
/// Example: `second attempt after the gap fill`
pub type CommentText = String;
/// Field name inside an indicator record or schema; dotted for nested fields.
/// Examples: `symbol`, `context.session`
pub type FieldName = String;
