pub const ROOT_PATH: &str = "/";

/// Input token meaning "the parent of the working directory".
pub const PARENT_TOKEN: &str = "..";

/// Input token meaning "home", which is the root in this tree.
pub const HOME_TOKEN: &str = "~";

/// Turns user input into a canonical absolute path.
///
/// Empty, missing and `~` input fall back to the root when `default_to_root`
/// is set, otherwise to `current`. A bare `..` strips one segment from
/// `current`. `..` inside a longer path is kept as a literal name.
pub fn to_absolute(current: &str, input: Option<&str>, default_to_root: bool) -> String {
    match input {
        None | Some("") | Some(HOME_TOKEN) => {
            if default_to_root {
                ROOT_PATH.to_string()
            } else {
                normalize(current)
            }
        }
        Some(path) if path.starts_with('/') => normalize(path),
        Some(PARENT_TOKEN) => parent_path(current),
        Some(path) => normalize(&format!("{current}/{path}")),
    }
}

/// Collapses duplicate separators and drops any trailing slash.
pub fn normalize(path: &str) -> String {
    let segments = segments(path);
    if segments.is_empty() {
        ROOT_PATH.to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Non-empty segments of a path.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Path with its last segment removed. The root is its own parent.
pub fn parent_path(path: &str) -> String {
    let mut segments = segments(path);
    segments.pop();
    normalize(&segments.join("/"))
}

/// Last segment of a path, `None` for the root.
pub fn file_name(path: &str) -> Option<&str> {
    path.rsplit('/').find(|segment| !segment.is_empty())
}

/// Ascending prefixes of an absolute path: `/a/b` yields `/a`, `/a/b`.
pub fn prefixes(path: &str) -> Vec<String> {
    let segments = segments(path);
    (1..=segments.len())
        .map(|len| format!("/{}", segments[..len].join("/")))
        .collect()
}
