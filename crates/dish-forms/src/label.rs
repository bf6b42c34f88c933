//! Human-readable labels derived from field keys.

use heck::ToTitleCase;

/// Converts a field key into a title-cased label.
///
/// `noOfSlices` becomes "No Of Slices", `preparation_time` becomes
/// "Preparation Time".
pub fn humanize(key: &str) -> String {
    key.to_title_case()
}
