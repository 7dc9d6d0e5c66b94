//! Turns the textual output of the diagnostic tools into records.
//!
//! Each tool's output grammar lives in its own module. Parsing is best-effort: lines
//! that do not look like anything known are skipped, never reported as errors.

use log::error;
use regex::Captures;

pub mod iface;
pub mod ping;
pub mod route;
pub mod sockets;

/// Checks that at least `min` groups of `caps` (counting the whole match) took part in it.
/// Logs if not, so that the caller can just skip the line.
fn has_min_groups(caps: &Captures, min: usize, what: &str) -> bool {
    let present = caps.iter().filter(Option::is_some).count();
    if present < min {
        error!("{} match too short: {} of {} groups", what, present, min);
        return false;
    }
    true
}

fn group_str(caps: &Captures, idx: usize) -> String {
    caps.get(idx).map_or_else(String::new, |m| m.as_str().to_string())
}

/// Numbers that do not fit saturate, anything unparseable reads as zero.
fn group_u32(caps: &Captures, idx: usize) -> u32 {
    group_u64(caps, idx).min(u32::MAX as u64) as u32
}

fn group_u16(caps: &Captures, idx: usize) -> u16 {
    group_u64(caps, idx).min(u16::MAX as u64) as u16
}

fn group_u64(caps: &Captures, idx: usize) -> u64 {
    let digits = caps.get(idx).map_or("", |m| m.as_str());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    // only overflow is left
    digits.parse().unwrap_or(u64::MAX)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use assertor::*;
    use regex::Regex;

    use super::*;

    #[test]
    fn numbers_saturate() {
        // given
        let re = Regex::new(r"(\d+) (\d+) (\d*)").unwrap();

        // when
        let caps = re.captures("70000 99999999999999999999999 ").unwrap();

        // then
        assert_that!(group_u16(&caps, 1)).is_equal_to(u16::MAX);
        assert_that!(group_u32(&caps, 1)).is_equal_to(70_000);
        assert_that!(group_u32(&caps, 2)).is_equal_to(u32::MAX);
        assert_that!(group_u32(&caps, 3)).is_equal_to(0);
        assert_that!(group_u32(&caps, 4)).is_equal_to(0);
    }

    #[test]
    fn missing_optional_groups_count_as_absent() {
        // given
        let re = Regex::new(r"a(b)?(c)").unwrap();

        // when
        let caps = re.captures("ac").unwrap();

        // then
        assert_that!(has_min_groups(&caps, 2, "test")).is_true();
        assert_that!(has_min_groups(&caps, 3, "test")).is_false();
        assert_that!(group_str(&caps, 1)).is_equal_to(String::new());
    }

    #[test]
    fn whitespace_only_is_blank() {
        assert_that!(is_blank("")).is_true();
        assert_that!(is_blank(" \t\r")).is_true();
        assert_that!(is_blank("  lo")).is_false();
    }
}
