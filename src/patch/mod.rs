//! Patch builder (C9): turns an edit script into a sequence of context-padded hunks that
//! can later be applied against a (possibly drifted) copy of the source text.

mod apply;
mod text;

use crate::diff::{cleanup_efficiency, cleanup_semantic, Diff, Op};
use crate::DiffMatchPatch;

/// A single hunk: its location in source/target plus an embedded edit script carrying
/// leading/trailing equal context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Patch {
	pub start1: usize,
	pub start2: usize,
	pub length1: usize,
	pub length2: usize,
	pub diffs: Vec<Diff>,
}

impl Patch {
	/// A short, human-readable `@@ -start1,length1 +start2,length2 @@`-style summary, used
	/// by the `Display` impl and in trace logging.
	pub fn hunk_summary(&self) -> String {
		format!(
			"@@ -{},{} +{},{} @@",
			self.start1 + 1,
			self.length1,
			self.start2 + 1,
			self.length2
		)
	}
}

impl std::fmt::Display for Patch {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", text::patch_to_text(std::slice::from_ref(self)))
	}
}

impl DiffMatchPatch {
	/// `patch_make` shape 1: diff `text1`/`text2` (with semantic + efficiency cleanup) and
	/// build hunks from the result.
	pub fn patch_make_from_texts(&self, text1: &str, text2: &str) -> Vec<Patch> {
		let mut diffs = self.diff_main(text1, text2, true);
		if diffs.len() > 2 {
			diffs = cleanup_semantic(diffs);
			diffs = cleanup_efficiency(diffs, self.diff_edit_cost);
		}
		self.patch_make_internal(text1, &diffs)
	}

	/// `patch_make` shape 2: build hunks directly from an already-computed edit script,
	/// reconstructing `text1` (the prepatch text) from it.
	pub fn patch_make_from_diffs(&self, diffs: &[Diff]) -> Vec<Patch> {
		let text1 = crate::diff::diff_text1(diffs);
		self.patch_make_internal(&text1, diffs)
	}

	/// `patch_make` shape 3: `text1` is given explicitly (saves recomputing it from `diffs`).
	pub fn patch_make_from_text_and_diffs(&self, text1: &str, diffs: &[Diff]) -> Vec<Patch> {
		self.patch_make_internal(text1, diffs)
	}

	/// `patch_make` shape 4 (deprecated three-argument form): `text2` is accepted but
	/// ignored, matching the reference implementation's polymorphic dispatch.
	pub fn patch_make_from_text_and_text_and_diffs(&self, text1: &str, _text2: &str, diffs: &[Diff]) -> Vec<Patch> {
		self.patch_make_internal(text1, diffs)
	}

	fn patch_make_internal(&self, text1: &str, diffs: &[Diff]) -> Vec<Patch> {
		if diffs.is_empty() {
			return Vec::new();
		}

		let mut patches = Vec::new();
		let mut patch = Patch::default();
		let mut char_count1 = 0usize;
		let mut char_count2 = 0usize;

		let mut prepatch: Vec<char> = text1.chars().collect();
		let mut postpatch = prepatch.clone();

		for (i, d) in diffs.iter().enumerate() {
			if patch.diffs.is_empty() && d.op != Op::Equal {
				patch.start1 = char_count1;
				patch.start2 = char_count2;
			}

			match d.op {
				Op::Insert => {
					patch.length2 += d.text_len();
					patch.diffs.push(d.clone());
					let at = char_count2;
					postpatch.splice(at..at, d.text.chars());
				}
				Op::Delete => {
					patch.length1 += d.text_len();
					patch.diffs.push(d.clone());
					let at = char_count2;
					postpatch.splice(at..at + d.text_len(), std::iter::empty());
				}
				Op::Equal => {
					let len = d.text_len();
					if len <= 2 * self.patch_margin && !patch.diffs.is_empty() && i != diffs.len() - 1 {
						patch.diffs.push(d.clone());
						patch.length1 += len;
						patch.length2 += len;
					} else if len >= 2 * self.patch_margin && !patch.diffs.is_empty() {
						self.add_context(&mut patch, &prepatch);
						patches.push(std::mem::take(&mut patch));
						prepatch = postpatch.clone();
						char_count1 = char_count2;
					}
				}
			}

			if d.op != Op::Insert {
				char_count1 += d.text_len();
			}
			if d.op != Op::Delete {
				char_count2 += d.text_len();
			}
		}

		if !patch.diffs.is_empty() {
			self.add_context(&mut patch, &prepatch);
			patches.push(patch);
		}

		patches
	}

	/// Grows a symmetric context window around a hunk until the covered source region is
	/// uniquely locatable, then extends by one more margin of context.
	fn add_context(&self, patch: &mut Patch, text: &[char]) {
		if text.is_empty() {
			return;
		}

		let mut pattern: Vec<char> = text[patch.start2..(patch.start2 + patch.length1).min(text.len())].to_vec();
		let mut padding = 0usize;

		let max_pattern = self.bitap_bits().saturating_sub(2 * self.patch_margin as u32) as usize;
		while !is_unique_occurrence(text, &pattern) && pattern.len() < max_pattern {
			padding += self.patch_margin;
			let start = patch.start2.saturating_sub(padding);
			let end = (patch.start2 + patch.length1 + padding).min(text.len());
			pattern = text[start..end].to_vec();
		}

		padding += self.patch_margin;

		let prefix_start = patch.start2.saturating_sub(padding);
		let prefix: Vec<char> = text[prefix_start..patch.start2].to_vec();
		if !prefix.is_empty() {
			patch.diffs.insert(0, Diff::equal(prefix.iter().collect::<String>()));
		}

		let suffix_start = patch.start2 + patch.length1;
		let suffix_end = (suffix_start + padding).min(text.len());
		let suffix: Vec<char> = text.get(suffix_start..suffix_end).unwrap_or(&[]).to_vec();
		if !suffix.is_empty() {
			patch.diffs.push(Diff::equal(suffix.iter().collect::<String>()));
		}

		patch.start1 = patch.start1.saturating_sub(prefix.len());
		patch.start2 = patch.start2.saturating_sub(prefix.len());
		patch.length1 += prefix.len() + suffix.len();
		patch.length2 += prefix.len() + suffix.len();
	}
}

/// True if `needle` occurs at most once in `haystack`.
fn is_unique_occurrence(haystack: &[char], needle: &[char]) -> bool {
	if needle.is_empty() || needle.len() > haystack.len() {
		return true;
	}
	haystack.windows(needle.len()).filter(|w| *w == needle).count() <= 1
}

/// The last `n` `char`s of `s` (fewer if `s` is shorter).
fn tail_chars(s: &str, n: usize) -> String {
	let total = s.chars().count();
	let skip = total.saturating_sub(n);
	s.chars().skip(skip).collect()
}

/// Deep-copies a patch list; hunks carry no shared/interior mutable state in this port, so
/// this is a plain `Clone`, kept as a named operation to mirror the reference API surface.
pub fn patch_deep_copy(patches: &[Patch]) -> Vec<Patch> {
	patches.to_vec()
}

pub use text::{patch_from_text, patch_to_text};

impl DiffMatchPatch {
	/// Appends one code unit of "null padding" (code units `1..=patch_margin`) around every
	/// hunk so that hunks at the very start/end of the text still have context to match
	/// against, and returns the padding string so the caller can strip it from `text`.
	pub fn patch_add_padding(&self, patches: &mut Vec<Patch>) -> String {
		let padding_len = self.patch_margin;
		let padding: String = (1..=padding_len as u32).filter_map(char::from_u32).collect();

		for patch in patches.iter_mut() {
			patch.start1 += padding_len;
			patch.start2 += padding_len;
		}

		if let Some(first) = patches.first_mut() {
			let needs_padding = first.diffs.first().map(|d| d.op != Op::Equal).unwrap_or(true);
			if needs_padding || first.diffs.first().map(|d| d.text_len() < padding_len).unwrap_or(true) {
				prepend_padding(first, &padding, padding_len);
			}
		}

		if let Some(last) = patches.last_mut() {
			let needs_padding = last.diffs.last().map(|d| d.op != Op::Equal).unwrap_or(true);
			if needs_padding || last.diffs.last().map(|d| d.text_len() < padding_len).unwrap_or(true) {
				append_padding(last, &padding, padding_len);
			}
		}

		padding
	}

	/// Splits any hunk whose `length1` exceeds `match_max_bits` into a chain of smaller
	/// hunks, each carrying rolling pre-/post-context so `patch_apply` can still locate them.
	pub fn patch_split_max(&self, patches: &mut Vec<Patch>) {
		let patch_size = self.bitap_bits() as usize;
		let mut x = 0usize;
		while x < patches.len() {
			if patches[x].length1 <= patch_size {
				x += 1;
				continue;
			}
			let big = patches.remove(x);
			let mut start1 = big.start1;
			let mut start2 = big.start2;
			let mut precontext = String::new();
			let mut remaining: std::collections::VecDeque<Diff> = big.diffs.into_iter().collect();
			let mut insert_at = x;

			while !remaining.is_empty() {
				let mut patch = Patch {
					start1: start1 - precontext.chars().count(),
					start2: start2 - precontext.chars().count(),
					..Default::default()
				};
				let mut empty = true;
				if !precontext.is_empty() {
					let len = precontext.chars().count();
					patch.length1 = len;
					patch.length2 = len;
					patch.diffs.push(Diff::equal(precontext.clone()));
				}

				while !remaining.is_empty() && patch.length1 < patch_size.saturating_sub(self.patch_margin) {
					let op = remaining[0].op;
					let text_len = remaining[0].text_len();

					if op == Op::Insert {
						let d = remaining.pop_front().unwrap();
						patch.length2 += d.text_len();
						start2 += d.text_len();
						patch.diffs.push(d);
						empty = false;
					} else if op == Op::Delete && patch.diffs.len() == 1 && patch.diffs[0].op == Op::Equal && text_len > 2 * patch_size {
						let d = remaining.pop_front().unwrap();
						patch.length1 += d.text_len();
						start1 += d.text_len();
						empty = false;
						patch.diffs.push(d);
					} else {
						let take = text_len.min(patch_size.saturating_sub(patch.length1).saturating_sub(self.patch_margin));
						let taken: String = remaining[0].text.chars().take(take).collect();
						let taken_len = taken.chars().count();
						patch.length1 += taken_len;
						start1 += taken_len;
						if op == Op::Equal {
							patch.length2 += taken_len;
							start2 += taken_len;
						} else {
							empty = false;
						}
						patch.diffs.push(Diff::new(op, taken.clone()));
						if taken_len == text_len {
							remaining.pop_front();
						} else {
							let rest: String = remaining[0].text.chars().skip(taken_len).collect();
							remaining[0].text = rest;
						}
					}
				}

				precontext = crate::diff::diff_text2(&patch.diffs);
				precontext = tail_chars(&precontext, self.patch_margin);

				let postcontext: String = crate::diff::diff_text1(&remaining.iter().cloned().collect::<Vec<_>>())
					.chars()
					.take(self.patch_margin)
					.collect();
				if !postcontext.is_empty() {
					patch.length1 += postcontext.chars().count();
					patch.length2 += postcontext.chars().count();
					match patch.diffs.last_mut() {
						Some(last) if last.op == Op::Equal => last.text.push_str(&postcontext),
						_ => patch.diffs.push(Diff::equal(postcontext)),
					}
				}

				if !empty {
					patches.insert(insert_at, patch);
					insert_at += 1;
				}
			}
			x = insert_at;
		}
	}
}

fn prepend_padding(patch: &mut Patch, padding: &str, padding_len: usize) {
	match patch.diffs.first_mut() {
		Some(d) if d.op == Op::Equal => {
			let have = d.text_len();
			let need = padding_len.saturating_sub(have);
			if need > 0 {
				let extra: String = padding.chars().rev().take(need).collect::<Vec<_>>().into_iter().rev().collect();
				d.text = format!("{extra}{}", d.text);
				patch.start1 -= extra.chars().count();
				patch.start2 -= extra.chars().count();
				patch.length1 += extra.chars().count();
				patch.length2 += extra.chars().count();
			}
		}
		_ => {
			patch.diffs.insert(0, Diff::equal(padding.to_string()));
			patch.start1 -= padding_len;
			patch.start2 -= padding_len;
			patch.length1 += padding_len;
			patch.length2 += padding_len;
		}
	}
}

fn append_padding(patch: &mut Patch, padding: &str, padding_len: usize) {
	match patch.diffs.last_mut() {
		Some(d) if d.op == Op::Equal => {
			let have = d.text_len();
			let need = padding_len.saturating_sub(have);
			if need > 0 {
				let extra: String = padding.chars().take(need).collect();
				d.text.push_str(&extra);
				patch.length1 += extra.chars().count();
				patch.length2 += extra.chars().count();
			}
		}
		_ => {
			patch.diffs.push(Diff::equal(padding.to_string()));
			patch.length1 += padding_len;
			patch.length2 += padding_len;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_patch_make_from_texts_produces_hunk_with_context() {
		let dmp = DiffMatchPatch::new();
		let text1 = "The quick brown fox jumps over the lazy dog.";
		let text2 = "That quick brown fox jumped over a lazy dog.";
		let patches = dmp.patch_make_from_texts(text1, text2);
		assert!(!patches.is_empty());
		let rebuilt = crate::diff::diff_text1(&patches[0].diffs);
		assert!(text1.contains(&rebuilt));
	}

	#[test]
	fn test_patch_make_no_diffs_is_empty() {
		let dmp = DiffMatchPatch::new();
		let patches = dmp.patch_make_from_texts("same", "same");
		assert!(patches.is_empty());
	}

	#[test]
	fn test_patch_deep_copy_is_independent() {
		let dmp = DiffMatchPatch::new();
		let patches = dmp.patch_make_from_texts("hello world", "hello there world");
		let copy = patch_deep_copy(&patches);
		assert_eq!(patches, copy);
	}

	/// A single oversize hunk used to panic (`insert_at` landed one past the vacated slot);
	/// it must instead split in place, with the first sub-hunk taking that slot.
	#[test]
	fn test_patch_split_max_splits_single_oversize_patch_in_place() {
		let dmp = DiffMatchPatch::new();
		let text1 = format!("{}{}{}", "A".repeat(60), "B".repeat(50), "C".repeat(60));
		let text2 = format!("{}{}", "A".repeat(60), "C".repeat(60));
		let mut patches = dmp.patch_make_from_texts(&text1, &text2);
		assert_eq!(patches.len(), 1);
		assert!(patches[0].length1 > dmp.bitap_bits() as usize);

		dmp.patch_split_max(&mut patches);

		assert!(patches.len() > 1, "oversize hunk should have been split into several sub-hunks");
		assert!(patches.iter().all(|p| p.length1 <= dmp.bitap_bits() as usize));
		for w in patches.windows(2) {
			assert!(w[0].start1 <= w[1].start1, "sub-hunks should stay in source order");
		}
	}
}
