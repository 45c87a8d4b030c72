use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use plotters::style::{register_font, FontStyle};

use crate::types::SweepResult;

/// Font family name the title font is registered under.
pub const TITLE_FONT_FAMILY: &str = "sans-serif";

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Make a font available for mosaic titles, returning false if there is none.
///
/// The configured font is tried first, then a few common system fonts. Fonts can only be
/// registered once per process, later calls report the outcome of the first one.
pub fn ensure_title_font(configured: Option<&Path>) -> bool {
    static REGISTERED: OnceLock<Option<PathBuf>> = OnceLock::new();

    REGISTERED
        .get_or_init(|| register_first_available(configured))
        .is_some()
}

fn register_first_available(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        match register(path) {
            Ok(()) => return Some(path.to_path_buf()),
            Err(e) => log::warn!("Configured title font not usable: {e:?}"),
        }
    }

    for candidate in SYSTEM_FONT_CANDIDATES.iter().map(Path::new) {
        if !candidate.exists() {
            continue;
        }
        match register(candidate) {
            Ok(()) => {
                log::debug!("Using title font {}", candidate.display());
                return Some(candidate.to_path_buf());
            }
            Err(e) => log::debug!("Skipping font: {e:?}"),
        }
    }

    log::warn!(
        "No font available for mosaic titles, set `font` in the experiment file to add them"
    );
    None
}

fn register(path: &Path) -> SweepResult<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read font {}", path.display()))?;
    // The font registry keeps fonts for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());

    register_font(TITLE_FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| anyhow::anyhow!("Invalid font {}", path.display()))
}
