//! Patch applier (C10): locates each hunk in a (possibly drifted) copy of the source text,
//! tolerating small mismatches, and splices in its edits.

use crate::diff::{cleanup_semantic_lossless, diff_levenshtein, diff_text1, diff_text2, diff_x_index, Op};
use crate::DiffMatchPatch;

use super::{patch_deep_copy, Patch};

impl DiffMatchPatch {
	/// Applies `patches` against `text`, returning the patched text and one success flag per
	/// hunk. Never fails: hunks that can't be located or that drift past
	/// `patch_delete_threshold` are simply marked `false` and skipped.
	pub fn patch_apply(&self, patches: &[Patch], text: &str) -> (String, Vec<bool>) {
		if patches.is_empty() {
			return (text.to_string(), Vec::new());
		}

		let mut patches = patch_deep_copy(patches);
		let padding = self.patch_add_padding(&mut patches);
		self.patch_split_max(&mut patches);

		let mut chars: Vec<char> = padding.chars().chain(text.chars()).chain(padding.chars()).collect();

		let bits = self.bitap_bits() as usize;
		let mut delta: isize = 0;
		let mut results = Vec::with_capacity(patches.len());

		for patch in &patches {
			let expected_loc = (patch.start2 as isize + delta).max(0) as usize;
			let text1: Vec<char> = diff_text1(&patch.diffs).chars().collect();

			let mut start_loc: Option<usize>;
			let mut end_loc: Option<usize> = None;

			if text1.len() > bits {
				let head: String = text1[..bits].iter().collect();
				start_loc = self.match_main_chars(&chars, &head, expected_loc);
				if let Some(s) = start_loc {
					let tail: String = text1[text1.len() - bits..].iter().collect();
					let tail_loc = expected_loc + text1.len() - bits;
					end_loc = self.match_main_chars(&chars, &tail, tail_loc);
					if end_loc.is_none() || s >= end_loc.unwrap() {
						start_loc = None;
					}
				}
			} else {
				let whole: String = text1.iter().collect();
				start_loc = self.match_main_chars(&chars, &whole, expected_loc);
			}

			let Some(start_loc) = start_loc else {
				results.push(false);
				delta -= patch.length2 as isize - patch.length1 as isize;
				continue;
			};

			results.push(true);
			delta = start_loc as isize - expected_loc as isize;

			let region_end = match end_loc {
				None => (start_loc + text1.len()).min(chars.len()),
				Some(e) => (e + bits).min(chars.len()),
			};
			let text2 = &chars[start_loc.min(chars.len())..region_end];

			if text2 == text1.as_slice() {
				let target: Vec<char> = diff_text2(&patch.diffs).chars().collect();
				splice(&mut chars, start_loc, text1.len(), &target);
				continue;
			}

			let text2_str: String = text2.iter().collect();
			let text1_str: String = text1.iter().collect();
			let diffs = self.diff_main(&text1_str, &text2_str, false);

			if text1.len() > bits && diff_levenshtein(&diffs) as f64 / text1.len() as f64 > self.patch_delete_threshold {
				*results.last_mut().unwrap() = false;
				continue;
			}

			let diffs = cleanup_semantic_lossless(diffs);
			let mut index1 = 0usize;
			let mut index2 = 0usize;
			for m in &patch.diffs {
				if m.op != Op::Equal {
					index2 = diff_x_index(&diffs, index1);
				}
				match m.op {
					Op::Insert => {
						let insertion: Vec<char> = m.text.chars().collect();
						splice(&mut chars, start_loc + index2, 0, &insertion);
					}
					Op::Delete => {
						let del_end = diff_x_index(&diffs, index1 + m.text_len());
						splice(&mut chars, start_loc + index2, del_end - index2, &[]);
					}
					Op::Equal => {}
				}
				if m.op != Op::Delete {
					index1 += m.text_len();
				}
			}
		}

		let padding_len = padding.chars().count();
		let start = padding_len.min(chars.len());
		let end = chars.len().saturating_sub(padding_len).max(start);
		let result: String = chars[start..end].iter().collect();
		(result, results)
	}

	fn match_main_chars(&self, text: &[char], pattern: &str, loc: usize) -> Option<usize> {
		let text_str: String = text.iter().collect();
		self.match_main(&text_str, pattern, loc).unwrap_or(None)
	}
}

fn splice(chars: &mut Vec<char>, at: usize, remove: usize, insert: &[char]) {
	let at = at.min(chars.len());
	let end = (at + remove).min(chars.len());
	chars.splice(at..end, insert.iter().copied());
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_patch_apply_exact_match() {
		let dmp = DiffMatchPatch::new();
		let text1 = "The quick brown fox jumps over the lazy dog.";
		let text2 = "The quick brown fox jumped over a lazy dog.";
		let patches = dmp.patch_make_from_texts(text1, text2);
		let (result, oks) = dmp.patch_apply(&patches, text1);
		assert_eq!(result, text2);
		assert!(oks.iter().all(|&ok| ok));
	}

	#[test]
	fn test_patch_apply_tolerates_drift() {
		let dmp = DiffMatchPatch::new();
		let text1 = "The quick brown fox jumps over the lazy dog.";
		let text2 = "The quick brown fox jumped over a lazy dog.";
		let patches = dmp.patch_make_from_texts(text1, text2);
		let drifted = format!("Some preamble text.\n\n{text1}\n\nSome trailing text.");
		let (result, oks) = dmp.patch_apply(&patches, &drifted);
		assert!(oks.iter().all(|&ok| ok));
		assert!(result.contains("jumped over a lazy dog"));
	}

	#[test]
	fn test_patch_apply_fails_on_unrelated_text() {
		let dmp = DiffMatchPatch::new();
		let text1 = "The quick brown fox jumps over the lazy dog.";
		let text2 = "The quick brown fox jumped over a lazy dog.";
		let patches = dmp.patch_make_from_texts(text1, text2);
		let (_, oks) = dmp.patch_apply(&patches, "Something completely different and unrelated to the original sentence at all.");
		assert!(oks.iter().any(|&ok| !ok));
	}

	#[test]
	fn test_patch_apply_no_patches_returns_text_unchanged() {
		let dmp = DiffMatchPatch::new();
		let (result, oks) = dmp.patch_apply(&[], "unchanged");
		assert_eq!(result, "unchanged");
		assert!(oks.is_empty());
	}

	/// A hunk whose `length1` exceeds `match_max_bits` forces `patch_apply` through
	/// `patch_split_max`'s re-insertion path instead of leaving the oversize hunk intact.
	#[test]
	fn test_patch_apply_splits_oversize_hunk() {
		let dmp = DiffMatchPatch::new();
		let text1 = format!("{}{}{}", "A".repeat(60), "B".repeat(50), "C".repeat(60));
		let text2 = format!("{}{}", "A".repeat(60), "C".repeat(60));
		let patches = dmp.patch_make_from_texts(&text1, &text2);
		assert!(patches[0].length1 > dmp.bitap_bits() as usize, "fixture should exceed match_max_bits");

		let (result, oks) = dmp.patch_apply(&patches, &text1);
		assert_eq!(result, text2);
		assert!(oks.iter().all(|&ok| ok));
	}
}
