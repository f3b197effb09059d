// SPDX-License-Identifier: MIT
//! Property-based tests for the runner-output parser.
//!
//! 1. `parse` never panics and yields zero defaults on arbitrary text.
//! 2. Counts derived from a well-formed summary line stay consistent.
//! 3. Failure blocks yield one record per named ordinal segment.
//!
//! Run with: cargo test --test parser_props

use dusk_mcp::runner::parse::parse;
use proptest::prelude::*;

proptest! {
    /// Arbitrary text without the summary keywords parses to all-zero
    /// defaults — the parser is total.
    #[test]
    fn arbitrary_text_yields_defaults(lines in prop::collection::vec("[a-zA-Z .:/\\-]{0,60}", 0..30)) {
        let text = lines.join("\n");
        prop_assume!(!text.contains("Tests:"));
        prop_assume!(!text.contains("Time:"));
        prop_assume!(!text.contains("FAILURES!"));

        let s = parse(&text);
        prop_assert_eq!(s.total, 0);
        prop_assert_eq!(s.passed, 0);
        prop_assert_eq!(s.failed, 0);
        prop_assert_eq!(s.duration, "");
        prop_assert!(s.failures.is_empty());
    }

    /// For any well-formed summary line with failed <= total:
    /// passed = total - failed, and both counts echo the input.
    #[test]
    fn summary_counts_are_consistent(
        total in 0_u32..10_000,
        failed_seed in 0_u32..10_000,
        assertions in 0_u32..100_000,
    ) {
        let failed = failed_seed % (total + 1);
        let text = format!("Tests: {total}, Assertions: {assertions}, Failures: {failed}\n");

        let s = parse(&text);
        prop_assert_eq!(s.total, total);
        prop_assert_eq!(s.failed, failed);
        prop_assert_eq!(s.passed, total - failed);
        prop_assert_eq!(s.skipped, 0);
    }

    /// Omitting the Failures clause always means failed = 0, passed = total.
    #[test]
    fn missing_failures_clause_means_all_passed(total in 1_u32..10_000) {
        let s = parse(&format!("Tests: {total}, Assertions: {total}\n"));
        prop_assert_eq!(s.failed, 0);
        prop_assert_eq!(s.passed, total);
    }

    /// A failure block with n named ordinal segments yields exactly n records,
    /// in order, regardless of what the summary line claims.
    #[test]
    fn one_record_per_ordinal_segment(
        names in prop::collection::vec("[A-Z][a-zA-Z]{2,12}Test::test[A-Z][a-zA-Z]{1,10}", 1..8),
        claimed_failed in 0_u32..100,
    ) {
        let mut text = String::from("FAILURES!\n");
        for (i, name) in names.iter().enumerate() {
            text.push_str(&format!("{}) Tests\\Browser\\{name}\nassertion failed\n", i + 1));
        }
        text.push_str(&format!("\nTests: {}, Assertions: 1, Failures: {claimed_failed}\n", names.len()));

        let s = parse(&text);
        prop_assert_eq!(s.failures.len(), names.len());
        for (record, name) in s.failures.iter().zip(&names) {
            prop_assert_eq!(&record.test, &format!("Tests\\Browser\\{name}"));
            prop_assert_eq!(&record.message, "assertion failed");
        }
        // The summary count is taken verbatim, never reconciled against the
        // itemized records.
        prop_assert_eq!(s.failed, claimed_failed);
    }
}
