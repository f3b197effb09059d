//! Runner-output parsing — raw Dusk/PHPUnit text in, structured summary out.
//!
//! The grammar is deliberately explicit and line-oriented rather than a pile
//! of ad hoc matches against the whole buffer:
//!
//!   summary line   `Tests: <total>, Assertions: <n>[, Failures: <failed>]`
//!   duration line  `Time: <rest of line>`
//!   failure block  starts at a line reading `FAILURES!`, ends at the first
//!                  blank line; inside it, a line starting with `<n>)` opens
//!                  one failure segment
//!
//! `parse` is a total function: absent patterns produce zero/empty defaults,
//! never an error. The summary `failed` count and the itemized failure
//! records are extracted independently and are allowed to disagree when the
//! runner output drifts — callers see both signals unreconciled.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static SUMMARY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Tests:\s*(\d+),\s*Assertions:\s*(\d+)(?:,\s*Failures:\s*(\d+))?")
        .expect("summary line pattern")
});

static DURATION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Time:\s*(.+)").expect("duration line pattern"));

/// A line opening one failure segment: an ordinal immediately followed by a
/// closing parenthesis, e.g. `1) Tests\Browser\LoginTest::testLogin`.
static ORDINAL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\)\s*(.*)$").expect("ordinal line pattern"));

/// One itemized failure from the runner output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    /// First line of the failure segment (usually `Class::method`).
    pub test: String,
    /// Remaining lines of the segment, joined and trimmed.
    pub message: String,
}

/// Structured view of one test run. Produced fresh per run, discarded after
/// formatting into a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestResultSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    /// Reserved — never populated by the current grammar.
    pub skipped: u32,
    /// Verbatim remainder of the `Time:` line; empty when absent.
    pub duration: String,
    pub failures: Vec<FailureRecord>,
}

/// Parse captured runner output into a summary. Pure, never fails.
pub fn parse(output: &str) -> TestResultSummary {
    let mut summary = TestResultSummary::default();

    for line in output.lines() {
        if summary.total == 0 {
            if let Some(caps) = SUMMARY_LINE.captures(line) {
                let total: u32 = caps[1].parse().unwrap_or(0);
                let failed: u32 = caps
                    .get(3)
                    .and_then(|m| m.as_str().parse().ok())
                    .unwrap_or(0);
                summary.total = total;
                summary.failed = failed;
                summary.passed = total.saturating_sub(failed);
            }
        }
        if summary.duration.is_empty() {
            if let Some(caps) = DURATION_LINE.captures(line) {
                summary.duration = caps[1].trim().to_string();
            }
        }
    }

    summary.failures = parse_failure_block(output);
    summary
}

/// Extract itemized failures from the `FAILURES!` block, if any.
fn parse_failure_block(output: &str) -> Vec<FailureRecord> {
    let mut failures = Vec::new();
    let mut in_block = false;
    // Lines of the segment currently being accumulated; first entry is the
    // test name line.
    let mut segment: Vec<String> = Vec::new();

    for line in output.lines() {
        if !in_block {
            if line.trim() == "FAILURES!" {
                in_block = true;
            }
            continue;
        }

        // Blank line terminates the block.
        if line.trim().is_empty() {
            break;
        }

        if let Some(caps) = ORDINAL_LINE.captures(line) {
            flush_segment(&mut segment, &mut failures);
            segment.push(caps[1].trim().to_string());
        } else if !segment.is_empty() {
            segment.push(line.to_string());
        }
        // Lines between the marker and the first ordinal are discarded.
    }

    flush_segment(&mut segment, &mut failures);
    failures
}

fn flush_segment(segment: &mut Vec<String>, failures: &mut Vec<FailureRecord>) {
    if segment.is_empty() {
        return;
    }
    let test = segment[0].trim().to_string();
    let message = segment[1..].join("\n").trim().to_string();
    segment.clear();
    // A bare ordinal with no name after it is dropped, matching the rule
    // that empty trimmed segments contribute nothing.
    if test.is_empty() && message.is_empty() {
        return;
    }
    failures.push(FailureRecord { test, message });
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_and_duration_lines() {
        let out = "Tests: 10, Assertions: 42, Failures: 2\nTime: 00:01.234";
        let s = parse(out);
        assert_eq!(s.total, 10);
        assert_eq!(s.passed, 8);
        assert_eq!(s.failed, 2);
        assert_eq!(s.duration, "00:01.234");
        assert_eq!(s.skipped, 0);
    }

    #[test]
    fn no_summary_line_yields_zero_defaults() {
        let s = parse("PHPUnit 11.0 by Sebastian Bergmann.\n\nOK, but no counts here");
        assert_eq!(s.total, 0);
        assert_eq!(s.failed, 0);
        assert_eq!(s.passed, 0);
        assert!(s.failures.is_empty());
        assert_eq!(s.duration, "");
    }

    #[test]
    fn summary_without_failures_clause() {
        let s = parse("Tests: 5, Assertions: 12\nTime: 00:00.512");
        assert_eq!(s.total, 5);
        assert_eq!(s.failed, 0);
        assert_eq!(s.passed, 5);
    }

    #[test]
    fn failure_block_with_two_segments() {
        let out = "\
PHPUnit 11.0

FF

FAILURES!
1) Tests\\Browser\\LoginTest::testLogin
Failed asserting that the page contains 'Dashboard'.
/app/tests/Browser/LoginTest.php:24
2) Tests\\Browser\\CartTest::testCheckout
Timed out waiting for selector [#pay].

Tests: 2, Assertions: 4, Failures: 2
Time: 00:03.118";
        let s = parse(out);
        assert_eq!(s.failures.len(), 2);
        assert_eq!(s.failures[0].test, "Tests\\Browser\\LoginTest::testLogin");
        assert!(s.failures[0]
            .message
            .contains("Failed asserting that the page contains 'Dashboard'."));
        assert!(s.failures[0].message.contains("LoginTest.php:24"));
        assert_eq!(s.failures[1].test, "Tests\\Browser\\CartTest::testCheckout");
        assert_eq!(s.failures[1].message, "Timed out waiting for selector [#pay].");
        assert_eq!(s.failed, 2);
        assert_eq!(s.passed, 0);
    }

    #[test]
    fn failed_count_without_blocks_disagrees() {
        // Output format drift: a failure count in the summary but no
        // FAILURES! marker. Both signals are exposed as-is.
        let s = parse("Tests: 4, Assertions: 9, Failures: 1\nTime: 00:00.900");
        assert_eq!(s.failed, 1);
        assert!(s.failures.is_empty());
    }

    #[test]
    fn blank_line_terminates_the_block() {
        let out = "\
FAILURES!
1) Tests\\Browser\\OneTest::testA
boom

2) this line is outside the block
";
        let s = parse(out);
        assert_eq!(s.failures.len(), 1);
        assert_eq!(s.failures[0].test, "Tests\\Browser\\OneTest::testA");
    }

    #[test]
    fn bare_ordinal_segment_is_dropped() {
        let s = parse("FAILURES!\n1)\n");
        assert!(s.failures.is_empty());
    }

    #[test]
    fn marker_without_ordinals_yields_no_failures() {
        let s = parse("FAILURES!\nsome stray text\n\nTests: 1, Assertions: 1, Failures: 1");
        assert!(s.failures.is_empty());
        assert_eq!(s.failed, 1);
    }

    #[test]
    fn duration_captures_rest_of_line_verbatim() {
        let s = parse("Time: 1.21 seconds, Memory: 18.00 MB");
        assert_eq!(s.duration, "1.21 seconds, Memory: 18.00 MB");
    }
}
