use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Resolve the server home directory.
///
/// - `None` (or empty) → `<platform home>/<default_subdir>`
/// - `~` / `~/x` → expanded against the platform home
/// - relative paths → joined onto the current working directory
///
/// When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> io::Result<PathBuf> {
    let resolved = match configured.filter(|s| !s.trim().is_empty()) {
        None => platform_home()?.join(default_subdir),
        Some(raw) => expand(&raw)?,
    };

    let absolute = if resolved.is_absolute() {
        resolved
    } else {
        env::current_dir()?.join(resolved)
    };

    if create {
        std::fs::create_dir_all(&absolute)?;
    }
    Ok(absolute)
}

fn expand(raw: &str) -> io::Result<PathBuf> {
    if raw == "~" {
        return platform_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_home()?.join(rest));
    }
    Ok(Path::new(raw).to_path_buf())
}

fn platform_home() -> io::Result<PathBuf> {
    let var = if cfg!(windows) { "APPDATA" } else { "HOME" };
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{var} is not set")))
}
