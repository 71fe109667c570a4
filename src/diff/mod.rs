//! Diff engine: Myers bisection, speed-ups and normalization passes (components C1-C6).

use std::time::Instant;

use crate::DiffMatchPatch;

mod affix;
mod bisect;
mod cleanup;
mod delta;
mod half_match;
mod line_mode;
mod pretty;

pub use affix::{common_overlap, common_prefix, common_suffix};
pub use cleanup::{cleanup_efficiency, cleanup_merge, cleanup_semantic, cleanup_semantic_lossless};
pub use delta::{diff_from_delta, diff_to_delta};
pub use pretty::{diff_levenshtein, diff_pretty_html, diff_pretty_text, diff_text1, diff_text2, diff_x_index};

// region:    --- Types

/// An atomic edit operation. Carries no payload beyond its tag (the text lives on [`Diff`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
	Delete,
	Insert,
	Equal,
}

/// A single `(op, text)` record in an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
	pub op: Op,
	pub text: String,
}

impl Diff {
	pub fn new(op: Op, text: impl Into<String>) -> Self {
		Self { op, text: text.into() }
	}

	pub fn delete(text: impl Into<String>) -> Self {
		Self::new(Op::Delete, text)
	}

	pub fn insert(text: impl Into<String>) -> Self {
		Self::new(Op::Insert, text)
	}

	pub fn equal(text: impl Into<String>) -> Self {
		Self::new(Op::Equal, text)
	}

	/// Length of `text` in code units (`char`s), not bytes.
	pub fn text_len(&self) -> usize {
		self.text.chars().count()
	}
}

impl std::fmt::Display for Diff {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let tag = match self.op {
			Op::Delete => '-',
			Op::Insert => '+',
			Op::Equal => '=',
		};
		write!(f, "{tag}{}", self.text)
	}
}

// endregion: --- Types

// region:    --- Driver (C5)

impl DiffMatchPatch {
	/// Computes the difference between two texts, applying only [`cleanup_merge`] at the end.
	///
	/// `checklines` enables the line-mode speed-up for long inputs (see §4.5).
	pub fn diff_main(&self, text1: &str, text2: &str, checklines: bool) -> Vec<Diff> {
		let deadline = self.deadline();
		self.diff_main_with_deadline(text1, text2, checklines, deadline)
	}

	/// Same as [`Self::diff_main`] but with an explicit deadline, overriding `diff_timeout`.
	pub fn diff_main_with_deadline(
		&self,
		text1: &str,
		text2: &str,
		checklines: bool,
		deadline: Option<Instant>,
	) -> Vec<Diff> {
		let a: Vec<char> = text1.chars().collect();
		let b: Vec<char> = text2.chars().collect();
		tracing::trace!(len1 = a.len(), len2 = b.len(), checklines, "diff_main");
		diff_main_internal(&a, &b, checklines, deadline, self)
	}

	pub(crate) fn deadline(&self) -> Option<Instant> {
		if self.diff_timeout <= 0.0 {
			None
		} else {
			Some(Instant::now() + std::time::Duration::from_secs_f64(self.diff_timeout))
		}
	}
}

pub(crate) fn diff_main_internal(
	text1: &[char],
	text2: &[char],
	checklines: bool,
	deadline: Option<Instant>,
	cfg: &DiffMatchPatch,
) -> Vec<Diff> {
	if text1 == text2 {
		return if text1.is_empty() {
			Vec::new()
		} else {
			vec![Diff::equal(chars_to_string(text1))]
		};
	}

	let prefix_len = common_prefix(text1, text2);
	let (prefix, rest1) = text1.split_at(prefix_len);
	let (_prefix2, rest2) = text2.split_at(prefix_len);

	let suffix_len = common_suffix(rest1, rest2);
	let (mid1, suffix) = rest1.split_at(rest1.len() - suffix_len);
	let (mid2, _suffix2) = rest2.split_at(rest2.len() - suffix_len);

	let mut diffs = diff_compute(mid1, mid2, checklines, deadline, cfg);

	if !prefix.is_empty() {
		diffs.insert(0, Diff::equal(chars_to_string(prefix)));
	}
	if !suffix.is_empty() {
		diffs.push(Diff::equal(chars_to_string(suffix)));
	}

	cleanup_merge(diffs)
}

/// Dispatches to the fastest applicable strategy: containment, half-match, line mode, or bisect.
fn diff_compute(
	text1: &[char],
	text2: &[char],
	checklines: bool,
	deadline: Option<Instant>,
	cfg: &DiffMatchPatch,
) -> Vec<Diff> {
	if text1.is_empty() {
		return vec![Diff::insert(chars_to_string(text2))];
	}
	if text2.is_empty() {
		return vec![Diff::delete(chars_to_string(text1))];
	}

	let (long, short, long_is_text1) = if text1.len() > text2.len() {
		(text1, text2, true)
	} else {
		(text2, text1, false)
	};

	if let Some(i) = find_subslice(long, short) {
		let op = if long_is_text1 { Op::Delete } else { Op::Insert };
		return vec![
			Diff::new(op, chars_to_string(&long[..i])),
			Diff::equal(chars_to_string(short)),
			Diff::new(op, chars_to_string(&long[i + short.len()..])),
		];
	}

	if short.len() == 1 {
		return vec![Diff::delete(chars_to_string(text1)), Diff::insert(chars_to_string(text2))];
	}

	if let Some(hm) = half_match::find(text1, text2, cfg) {
		let diffs_a = diff_main_internal(&hm.text1_a, &hm.text2_a, checklines, deadline, cfg);
		let diffs_b = diff_main_internal(&hm.text1_b, &hm.text2_b, checklines, deadline, cfg);
		let mut diffs = diffs_a;
		diffs.push(Diff::equal(hm.mid_common));
		diffs.extend(diffs_b);
		return diffs;
	}

	if checklines && text1.len() > 100 && text2.len() > 100 {
		return line_mode::diff_line_mode(text1, text2, deadline, cfg);
	}

	tracing::trace!(len1 = text1.len(), len2 = text2.len(), "diff_bisect");
	bisect::diff_bisect(text1, text2, deadline, cfg)
}

// endregion: --- Driver (C5)

// region:    --- Support

pub(crate) fn chars_to_string(chars: &[char]) -> String {
	chars.iter().collect()
}

/// Returns the index (in code units) at which `needle` first occurs as a contiguous
/// subsequence of `haystack`, or `None`.
pub(crate) fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
	if needle.is_empty() {
		return Some(0);
	}
	if needle.len() > haystack.len() {
		return None;
	}
	haystack.windows(needle.len()).position(|w| w == needle)
}

/// Like [`find_subslice`] but starts searching from code-unit offset `from`.
pub(crate) fn find_subslice_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
	if from >= haystack.len() {
		return if needle.is_empty() && from == haystack.len() { Some(from) } else { None };
	}
	find_subslice(&haystack[from..], needle).map(|i| i + from)
}

// endregion: --- Support

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_diff_main_equal() {
		let dmp = DiffMatchPatch::new();
		let diffs = dmp.diff_main("abc", "abc", false);
		assert_eq!(diffs, vec![Diff::equal("abc")]);
	}

	#[test]
	fn test_diff_main_both_empty() {
		let dmp = DiffMatchPatch::new();
		let diffs = dmp.diff_main("", "", false);
		assert!(diffs.is_empty());
	}

	/// Scenario 2 from the testable-properties section: a simple insertion in the middle.
	#[test]
	fn test_diff_main_simple_insertion() {
		let dmp = DiffMatchPatch::new();
		let diffs = dmp.diff_main("abc", "ab123c", true);
		assert_eq!(
			diffs,
			vec![Diff::equal("ab"), Diff::insert("123"), Diff::equal("c")]
		);
	}

	#[test]
	fn test_diff_main_text1_text2_roundtrip() {
		let dmp = DiffMatchPatch::new();
		for (t1, t2) in [
			("abc", "ab123c"),
			("The quick brown fox jumps over the lazy dog.", "That quick brown fox jumped over a lazy dog."),
			("", "hello"),
			("hello", ""),
			("same", "same"),
		] {
			let diffs = dmp.diff_main(t1, t2, true);
			assert_eq!(diff_text1(&diffs), t1);
			assert_eq!(diff_text2(&diffs), t2);
		}
	}
}
