//! Destination paths for uploads.

use chrono::Utc;

/// Name used when the original file name has nothing usable in it.
const FALLBACK_NAME: &str = "file";

/// Source of the millisecond timestamp that prefixes every upload path.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.0
    }
}

/// Replaces every run of whitespace with a single `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized = name.split_whitespace().collect::<Vec<_>>().join("_");
    let sanitized = match (name.starts_with(char::is_whitespace), sanitized.is_empty()) {
        (_, true) => return FALLBACK_NAME.to_owned(),
        (true, false) => format!("_{sanitized}"),
        (false, false) => sanitized,
    };
    if name.ends_with(char::is_whitespace) {
        format!("{sanitized}_")
    } else {
        sanitized
    }
}

/// `{millis}_{sanitized name}`, e.g. `1000_My_Report.pdf`.
pub fn object_path(millis: i64, original_name: &str) -> String {
    format!("{millis}_{}", sanitize_file_name(original_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_example() {
        assert_eq!(object_path(1000, "My Report.pdf"), "1000_My_Report.pdf");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(sanitize_file_name("a  b\tc\nd.txt"), "a_b_c_d.txt");
    }

    #[test]
    fn edge_whitespace_is_kept_as_underscore() {
        assert_eq!(sanitize_file_name(" a.txt "), "_a.txt_");
    }

    #[test]
    fn name_without_whitespace_is_unchanged() {
        assert_eq!(sanitize_file_name("report-v2.pdf"), "report-v2.pdf");
    }

    #[test]
    fn empty_name_falls_back() {
        assert_eq!(sanitize_file_name(""), "file");
        assert_eq!(sanitize_file_name(" \t "), "file");
        assert_eq!(object_path(5, "   "), "5_file");
    }

    #[test]
    fn paths_never_contain_whitespace() {
        for name in ["a b", "\u{a0}x\u{2003}y", "tab\there", "nl\nx", "  "] {
            let path = object_path(1, name);
            assert!(
                !path.chars().any(char::is_whitespace),
                "{path:?} contains whitespace"
            );
        }
    }

    #[test]
    fn same_name_at_different_times_differs() {
        assert_ne!(object_path(1000, "a.txt"), object_path(1001, "a.txt"));
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now_millis();
        assert!(first > 0);
        assert!(clock.now_millis() >= first);
    }
}
