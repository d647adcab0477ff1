/// Zero-based index into the ordered sample list.
/// Example: `42`
pub type Position = usize;
/// Stable sample identifier (the image file name for folder datasets).
/// Example: `25747_airplane.png`
pub type SampleId = String;
/// Human-readable class name as it appears in folder names and label files.
/// Examples: `airplane`, `truck`
pub type CategoryName = String;
/// Integer class index; `NO_LABEL` marks unlabeled samples.
/// Examples: `0`, `9`, `-1`
pub type CategoryIndex = i64;
/// One batch of sample positions handed to the external loader.
/// Example: `[103, 107, 12, 88, 41]`
pub type PositionBatch = Vec<Position>;
/// Components used to derive per-stream RNG seeds.
/// Example: `labeled`
pub type StreamName = &'static str;
