use std::path::Path;

pub const SEPARATOR: &str = "/";

pub fn relative_key(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join(SEPARATOR)
}

pub fn object_key(prefix: &str, relative: &str) -> String {
    if prefix.is_empty() {
        relative.to_owned()
    } else {
        format!("{prefix}{SEPARATOR}{relative}")
    }
}
