/// Native multi-file picker (`--pick`)
use std::path::PathBuf;

use thiserror::Error;

/// Why the picker could not be shown
#[derive(Error, Debug)]
#[error("GUI picker unavailable: {0}")]
pub struct PickerUnavailable(pub &'static str);

/// Ask the user for files. `Ok(empty)` means the dialog was cancelled.
#[cfg(feature = "picker")]
pub fn pick_files(title: &str) -> Result<Vec<PathBuf>, PickerUnavailable> {
    Ok(rfd::FileDialog::new().set_title(title).pick_files().unwrap_or_default())
}

#[cfg(not(feature = "picker"))]
pub fn pick_files(_title: &str) -> Result<Vec<PathBuf>, PickerUnavailable> {
    Err(PickerUnavailable("built without the `picker` feature"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "picker"))]
    #[test]
    fn test_picker_unavailable_without_feature() {
        let err = pick_files("Select").unwrap_err();
        assert!(err.to_string().contains("picker"));
    }
}
