//! Font discovery for the report renderer.
//!
//! `genpdf` embeds TrueType fonts and measures text with their metrics, so a font family has to be
//! found on disk.  The report is designed around Helvetica metrics; Liberation Sans (and Arial on
//! Windows) share them, which keeps the hand-placed timeline labels where they are expected.
//! DejaVu Sans is accepted as a last resort on systems that ship nothing else; its glyphs run
//! slightly wider.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the preferred font family; files are expected as `LiberationSans-Regular.ttf` etc.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "LiberationSans";

/// Overrides the bundled font directory.
pub const FONTS_DIR_ENV: &str = "CLIENT_REPORT_FONTS_DIR";

/// Overrides the system font directory used as a fallback.
pub const SYSTEM_FONTS_DIR_ENV: &str = "CLIENT_REPORT_SYSTEM_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "LiberationSans-Regular.ttf",
    "LiberationSans-Bold.ttf",
    "LiberationSans-Italic.ttf",
    "LiberationSans-BoldItalic.ttf",
];

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/TTF",
];

/// Explicit file names of a family that does not follow the `<name>-<Style>.ttf` scheme.
struct FamilyFiles {
    name: &'static str,
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

const ARIAL_FILES: FamilyFiles = FamilyFiles {
    name: "Arial",
    regular: "arial.ttf",
    bold: "arialbd.ttf",
    italic: "ariali.ttf",
    bold_italic: "arialbi.ttf",
};

const DEJAVU_FILES: FamilyFiles = FamilyFiles {
    name: "DejaVu Sans",
    regular: "DejaVuSans.ttf",
    bold: "DejaVuSans-Bold.ttf",
    italic: "DejaVuSans-Oblique.ttf",
    bold_italic: "DejaVuSans-BoldOblique.ttf",
};

const DEJAVU_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/dejavu-sans-fonts",
    "/usr/share/fonts/TTF",
];

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn push_unique(candidates: &mut Vec<PathBuf>, candidate: PathBuf) {
    if !candidates.iter().any(|existing| existing == &candidate) {
        candidates.push(candidate);
    }
}

fn bundled_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            push_unique(&mut candidates, bin_dir.join("assets/fonts"));
        }
    }

    push_unique(&mut candidates, bundled_fonts_source_dir());
    candidates
}

/// Directory holding the fonts shipped next to the crate sources.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn missing_font_files(path: &Path) -> Vec<&'static str> {
    FONT_FILES
        .iter()
        .copied()
        .filter(|name| !path.join(name).is_file())
        .collect()
}

fn not_found(message: String) -> Error {
    Error::new(
        message,
        io::Error::new(io::ErrorKind::NotFound, "report fonts not found"),
    )
}

/// Returns the first directory among `candidates` that holds the whole family.
fn find_family_directory(candidates: &[PathBuf]) -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in candidates {
        if !candidate.is_dir() {
            attempts.push(format!("{} (directory missing)", candidate.display()));
            continue;
        }
        let missing = missing_font_files(candidate);
        if missing.is_empty() {
            debug!("using fonts from {}", candidate.display());
            return Ok(candidate.clone());
        }
        attempts.push(format!(
            "{} (missing files [{}])",
            candidate.display(),
            missing.join(", ")
        ));
    }

    let summary = if attempts.is_empty() {
        "no search paths were available".to_owned()
    } else {
        attempts.join(", ")
    };
    Err(not_found(format!(
        "Unable to locate the {} font family. Checked: {}. Set {} to a directory containing {}.",
        DEFAULT_FONT_FAMILY_NAME,
        summary,
        FONTS_DIR_ENV,
        FONT_FILES.join(", ")
    )))
}

fn load_family_from(directory: &Path) -> Result<FontFamily<FontData>, Error> {
    fonts::from_files(directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn system_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = env_path(SYSTEM_FONTS_DIR_ENV) {
        candidates.push(path);
    }
    for dir in SYSTEM_FONT_DIRS {
        push_unique(&mut candidates, PathBuf::from(dir));
    }
    candidates
}

fn windows_font_directory() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                let candidate = root.join("Fonts");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn load_font_file(
    directory: &Path,
    family: &str,
    file: &str,
    style: &str,
) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!(
                "Failed to load {} {} font at {}: {}",
                family,
                style,
                path.display(),
                err
            ),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

fn load_named_family(
    directory: &Path,
    files: &FamilyFiles,
) -> Result<FontFamily<FontData>, Error> {
    Ok(FontFamily {
        regular: load_font_file(directory, files.name, files.regular, "regular")?,
        bold: load_font_file(directory, files.name, files.bold, "bold")?,
        italic: load_font_file(directory, files.name, files.italic, "italic")?,
        bold_italic: load_font_file(directory, files.name, files.bold_italic, "bold italic")?,
    })
}

fn dejavu_directory() -> Option<PathBuf> {
    DEJAVU_DIRS
        .iter()
        .map(PathBuf::from)
        .find(|dir| dir.join(DEJAVU_FILES.regular).is_file())
}

fn dejavu_family() -> Result<FontFamily<FontData>, Error> {
    let directory = dejavu_directory().ok_or_else(|| {
        not_found(format!(
            "{} not found in [{}]",
            DEJAVU_FILES.name,
            DEJAVU_DIRS.join(", ")
        ))
    })?;
    load_named_family(&directory, &DEJAVU_FILES)
}

fn arial_family() -> Result<FontFamily<FontData>, Error> {
    let directory = windows_font_directory()
        .ok_or_else(|| not_found("Windows font directory not found".to_owned()))?;
    load_named_family(&directory, &ARIAL_FILES)
}

/// Tries DejaVu Sans, then Arial.
fn fallback_family() -> Result<FontFamily<FontData>, Error> {
    match dejavu_family() {
        Ok(family) => {
            debug!("using {} fallback fonts", DEJAVU_FILES.name);
            Ok(family)
        }
        Err(dejavu_err) if fonts_missing(&dejavu_err) => {
            arial_family().map_err(|arial_err| {
                not_found(format!("{dejavu_err}; Arial fallback unavailable: {arial_err}"))
            })
        }
        Err(dejavu_err) => Err(dejavu_err),
    }
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

fn system_font_family() -> Result<FontFamily<FontData>, Error> {
    match find_family_directory(&system_directory_candidates()) {
        Ok(directory) => load_family_from(&directory),
        Err(err) if fonts_missing(&err) => fallback_family()
            .map_err(|fallback_err| not_found(format!("{err}; {fallback_err}"))),
        Err(err) => Err(err),
    }
}

/// Loads the report font family, preferring bundled fonts over system-installed ones.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    let bundled = find_family_directory(&bundled_directory_candidates())
        .and_then(|directory| load_family_from(&directory));

    match bundled {
        Ok(family) => Ok(family),
        Err(err) if fonts_missing(&err) => match system_font_family() {
            Ok(family) => {
                warn!("Bundled fonts unavailable ({}); using system fonts.", err);
                Ok(family)
            }
            Err(system_err) => Err(not_found(format!(
                "Bundled fonts unavailable ({err}) and no system fallback was found: {system_err}"
            ))),
        },
        Err(err) => Err(err),
    }
}

/// Indicates whether a usable font family can be found without loading it.
pub fn default_fonts_available() -> bool {
    find_family_directory(&bundled_directory_candidates()).is_ok()
        || find_family_directory(&system_directory_candidates()).is_ok()
        || dejavu_directory().is_some()
        || windows_font_directory()
            .map(|dir| dir.join(ARIAL_FILES.regular).is_file())
            .unwrap_or(false)
}
