use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{
    models::{file_set::FileSet, options::NormalizedOptions},
    utils::errors::{EmptyResult, ResultTrait as _},
};

// 1x1 PNG placeholders, replaced by the user's artwork.
const FAVICON_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";
const ICON_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==";

pub(super) fn add_icons(options: &NormalizedOptions, files: &mut FileSet) -> EmptyResult {
    for (file, encoded) in [("favicon.png", FAVICON_PNG), ("icon.png", ICON_PNG)] {
        let bytes = STANDARD
            .decode(encoded)
            .auto_err(format!("Embedded {file} is not valid base64"))?;
        files.add_binary(options.in_project(&format!("src/assets/icon/{file}")), bytes);
    }
    Ok(())
}
