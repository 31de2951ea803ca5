use super::{parse_tab_url, LocalFilePath, ResolveError};
use crate::config::Settings;

const VIEWS_DIR: &str = "_views";
const TEMPLATE_EXT: &str = "tpl";
const INDEX_STEM: &str = "index";
const ERROR_STEM: &str = "error";

/// Map the page open in `tab_url` to its template under `<project>/_views`.
///
/// `/shop/cart.html` becomes `<project>\_views\shop\cart.tpl`. The query and
/// fragment are dropped, each path segment is percent-decoded on its own, and a
/// directory URL (`/shop/`) maps to `index.tpl` inside it.
pub fn resolve_local_file_path(
    tab_url: &str,
    settings: &Settings,
) -> Result<LocalFilePath, ResolveError> {
    let base = project_base(settings)?;
    let url = parse_tab_url(tab_url)?;

    let raw_path = url.path();
    let raw_path = raw_path.strip_prefix('/').unwrap_or(raw_path);
    let mut segments: Vec<String> = raw_path.split('/').map(decode_segment).collect();
    let file = segments.pop().unwrap_or_default();
    segments.retain(|segment| !segment.is_empty());
    segments.push(template_file_name(&file));

    let sep = settings.path_style.separator();
    let relative = segments.join(&sep.to_string());
    Ok(LocalFilePath::new(format!("{base}{sep}{VIEWS_DIR}{sep}{relative}")))
}

/// Percent-decode one path segment. Segments that would decode into a
/// separator or a dot segment stay encoded so the result cannot leave `_views`.
fn decode_segment(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) if !decoded.contains(['/', '\\']) && decoded != "." && decoded != ".." => {
            decoded.into_owned()
        }
        Ok(_) => {
            tracing::debug!("Keeping encoded segment {}", raw);
            raw.to_string()
        }
        Err(e) => {
            tracing::debug!("Keeping undecodable segment {}: {}", raw, e);
            raw.to_string()
        }
    }
}

/// Marker path under the views tree for pages that could not be mapped.
/// `None` when no project base path is configured.
pub fn error_fallback_path(settings: &Settings) -> Option<LocalFilePath> {
    let base = project_base(settings).ok()?;
    let sep = settings.path_style.separator();
    Some(LocalFilePath::new(format!(
        "{base}{sep}{VIEWS_DIR}{sep}{ERROR_STEM}.{TEMPLATE_EXT}"
    )))
}

/// Trimmed project root without trailing separators. A bare root (`/`) trims to
/// the empty string so joining yields `/_views`.
fn project_base(settings: &Settings) -> Result<&str, ResolveError> {
    let base = settings.project_base_path.trim();
    if base.is_empty() {
        return Err(ResolveError::ProjectPathNotConfigured);
    }
    Ok(base.trim_end_matches(['/', '\\']))
}

/// Swap the extension of the file name for `.tpl`, appending it when there is
/// none. An empty name or stem becomes `index`.
fn template_file_name(file: &str) -> String {
    let stem = match file.rfind('.') {
        Some(idx) => &file[..idx],
        None => file,
    };
    let stem = if stem.is_empty() { INDEX_STEM } else { stem };
    format!("{stem}.{TEMPLATE_EXT}")
}
