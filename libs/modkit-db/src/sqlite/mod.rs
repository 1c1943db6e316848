//! SQLite DSN helpers.

use std::path::{Path, PathBuf};

use url::Url;

/// True for `sqlite::memory:` style DSNs and `mode=memory` URLs.
pub fn is_memory_dsn(dsn: &str) -> bool {
    let lower = dsn.to_ascii_lowercase();
    if lower == "sqlite::memory:" || lower == "sqlite://:memory:" || lower == "sqlite://memory:" {
        return true;
    }
    Url::parse(dsn)
        .map(|url| {
            url.query_pairs()
                .any(|(k, v)| k.eq_ignore_ascii_case("mode") && v.eq_ignore_ascii_case("memory"))
        })
        .unwrap_or(false)
}

/// Rewrite a `sqlite://` DSN so its file path is absolute.
///
/// Relative paths are joined with `base_dir`; backslashes become forward
/// slashes. Memory DSNs are normalized to `sqlite::memory:`. With
/// `create_dirs` the parent directory of the database file is created.
pub fn resolve_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> std::io::Result<String> {
    if is_memory_dsn(dsn) {
        return Ok("sqlite::memory:".to_string());
    }

    let rest = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .ok_or_else(|| invalid(format!("DSN must start with sqlite:// (got: {dsn})")))?;

    let (path_str, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path_str.is_empty() {
        return Err(invalid("Empty SQLite path in DSN".to_string()));
    }

    let mut p = PathBuf::from(path_str);
    if p.is_relative() {
        p = base_dir.join(p);
    }
    if create_dirs {
        if let Some(dir) = p.parent() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

fn invalid(msg: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, msg)
}
