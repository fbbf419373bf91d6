use std::path::Path;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in &UNITS[..UNITS.len() - 1] {
        if value < 1024.0 {
            return format!("{value:.1} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1} {}", UNITS[UNITS.len() - 1])
}

pub fn format_path(path: &Path) -> String {
    let s: &str = &path.to_string_lossy();
    snailquote::escape(s).to_string()
}

#[cfg(test)]
mod tests {
    use super::format_bytes;

    #[test]
    fn bytes() {
        assert_eq!(format_bytes(0), "0.0 B");
        assert_eq!(format_bytes(500), "500.0 B");
        assert_eq!(format_bytes(1023), "1023.0 B");
    }

    #[test]
    fn kilobytes() {
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
    }

    #[test]
    fn megabytes() {
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn gigabytes() {
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn petabytes() {
        assert_eq!(format_bytes(2 * 1024_u64.pow(5)), "2.0 PB");
        assert_eq!(format_bytes(3000 * 1024_u64.pow(5)), "3000.0 PB");
    }
}
