//! Deterministic output paths for a resolved show.
//!
//! Pure functions, no I/O. Malformed show fields simply propagate into a
//! malformed path, which the download engine then fails to create.

use std::path::{Path, PathBuf};

use crate::show::Show;

/// Directory a show's files live in: `base/TitleSanitized/Year`.
pub fn output_path(base: &Path, show: &Show) -> PathBuf {
    base.join(&show.title_sanitized).join(&show.year)
}

/// Audio filename: `TitleSanitized_BroadcastDay.mp3`.
pub fn file_name(show: &Show) -> String {
    format!("{}_{}.mp3", show.title_sanitized, show.broadcast_day)
}
