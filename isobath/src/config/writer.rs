//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let url = config.archive.url.as_deref().unwrap_or("");
    let source_path = config
        .source
        .path
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[archive]
; Local archive file, created on first use from the source below
path = {}
; Remote archive (http:// or https://). When set, it is used instead of path
url = {}
; How a local archive is read:
;   random     - seek directly to each record (default)
;   sequential - stream the file front to back
access = {}
; HTTP timeout for remote archives, in seconds
timeout = {}

[cache]
; Upper bound on vertices held in memory by cached isolines
max_vertices = {}

[source]
; JSON array of isolines used to build a missing archive
path = {}
; Simplification tolerance in coordinate units (0 keeps every vertex)
tolerance = {}

[logging]
directory = {}
file = {}
"#,
        path_to_string(&config.archive.path),
        url,
        config.archive.access,
        config.archive.timeout,
        config.cache.max_vertices,
        source_path,
        config.source.tolerance,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
