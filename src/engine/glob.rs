//! Minimal glob matching for the `--glob` source filter.
//!
//! Supports `*` and `?` within a path segment and `**` across segments,
//! matched against source paths relative to the source root. Patterns
//! without a separator only match root-level files, so a recursive filter
//! is written `**/*.css`.

/// Match `pattern` against a `/`-separated relative path.
pub fn matches(pattern: &str, path: &str) -> bool {
    let pat: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let segs: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match_segments(&pat, &segs)
}

fn match_segments(pat: &[&str], segs: &[&str]) -> bool {
    match pat.first() {
        None => segs.is_empty(),
        Some(&"**") => {
            // `**` matches zero or more whole segments.
            match_segments(&pat[1..], segs)
                || (!segs.is_empty() && match_segments(pat, &segs[1..]))
        }
        Some(p) => match segs.first() {
            Some(s) => match_segment(p, s) && match_segments(&pat[1..], &segs[1..]),
            None => false,
        },
    }
}

fn match_segment(pat: &str, seg: &str) -> bool {
    let p: Vec<char> = pat.chars().collect();
    let s: Vec<char> = seg.chars().collect();
    match_chars(&p, &s)
}

fn match_chars(pat: &[char], s: &[char]) -> bool {
    match pat.first() {
        None => s.is_empty(),
        Some('*') => match_chars(&pat[1..], s) || (!s.is_empty() && match_chars(pat, &s[1..])),
        Some('?') => !s.is_empty() && match_chars(&pat[1..], &s[1..]),
        Some(c) => s.first() == Some(c) && match_chars(&pat[1..], &s[1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::matches;

    #[test]
    fn literal_paths() {
        assert!(matches("index.html", "index.html"));
        assert!(!matches("index.html", "about.html"));
    }

    #[test]
    fn star_stays_within_a_segment() {
        assert!(matches("*.css", "site.css"));
        assert!(!matches("*.css", "styles/site.css"));
    }

    #[test]
    fn double_star_crosses_segments() {
        assert!(matches("**/*.css", "site.css"));
        assert!(matches("**/*.css", "styles/deep/site.css"));
        assert!(!matches("**/*.css", "styles/site.js"));
    }

    #[test]
    fn double_star_in_the_middle() {
        assert!(matches("posts/**/index.html", "posts/2024/03/index.html"));
        assert!(matches("posts/**/index.html", "posts/index.html"));
        assert!(!matches("posts/**/index.html", "pages/index.html"));
    }

    #[test]
    fn question_mark_matches_one_char() {
        assert!(matches("page?.html", "page1.html"));
        assert!(!matches("page?.html", "page12.html"));
    }
}
