//! Deterministic asset filenames.

/// Filename for a generated variant.
///
/// Convention: `{index}.png` when the row has a single variant, otherwise
/// `{index}_{n}.png` with `n` counted from 1. The index is left-padded with
/// zeros to two characters.
///
/// ```
/// use promptsheet_core::naming::asset_filename;
///
/// assert_eq!(asset_filename("3", 0, 1), "03.png");
/// assert_eq!(asset_filename("3", 1, 4), "03_2.png");
/// ```
pub fn asset_filename(index: &str, variant: u32, variant_count: u32) -> String {
    let padded = format!("{index:0>2}");
    if variant_count > 1 {
        format!("{padded}_{}.png", variant + 1)
    } else {
        format!("{padded}.png")
    }
}
