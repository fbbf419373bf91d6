pub fn is_excluded(name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| matches(name, pattern))
}

// Exact match, or a glob where `*` spans any run of characters.
fn matches(name: &str, pattern: &str) -> bool {
    match pattern.split_once('*') {
        None => name == pattern,
        Some((head, tail)) => {
            let Some(rest) = name.strip_prefix(head) else {
                return false;
            };
            if tail.is_empty() {
                return true;
            }
            rest.char_indices()
                .map(|(index, _)| index)
                .chain([rest.len()])
                .any(|index| matches(&rest[index..], tail))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{is_excluded, matches};

    fn patterns(input: &[&str]) -> Vec<String> {
        input.iter().map(|&pattern| pattern.to_owned()).collect()
    }

    #[test]
    fn exact_name() {
        assert!(matches(".DS_Store", ".DS_Store"));
        assert!(!matches("DS_Store", ".DS_Store"));
        assert!(!matches(".DS_Store2", ".DS_Store"));
    }

    #[test]
    fn star_suffix() {
        assert!(matches("cache.lrdata", "*.lrdata"));
        assert!(matches(".lrdata", "*.lrdata"));
        assert!(!matches("cache.lrdata2", "*.lrdata"));
    }

    #[test]
    fn star_prefix() {
        assert!(matches("backup.tmp", "backup.*"));
        assert!(matches("backup.", "backup.*"));
        assert!(!matches("other.tmp", "backup.*"));
    }

    #[test]
    fn star_in_middle() {
        assert!(matches("IMG_0123.CR2", "IMG_*.CR2"));
        assert!(!matches("IMG_0123.JPG", "IMG_*.CR2"));
    }

    #[test]
    fn multiple_stars() {
        assert!(matches("a-b-c", "a*b*c"));
        assert!(matches("abc", "a*b*c"));
        assert!(!matches("ac", "a*b*c"));
    }

    #[test]
    fn case_sensitive() {
        assert!(!matches("photo.JPG", "*.jpg"));
    }

    #[test]
    fn any_pattern_excludes() {
        let patterns = patterns(&[".DS_Store", "*.lrdata"]);
        assert!(is_excluded(".DS_Store", &patterns));
        assert!(is_excluded("previews.lrdata", &patterns));
        assert!(!is_excluded("photo.jpg", &patterns));
        assert!(!is_excluded("photo.jpg", &[]));
    }
}
