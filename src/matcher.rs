//! Bitap fuzzy matcher (C8): locates `pattern` inside `text` near `loc`, tolerating a
//! bounded number of errors and trading off edit distance against positional proximity.

use std::collections::HashMap;

use crate::diff::find_subslice_from;
use crate::error::{Error, Result};
use crate::DiffMatchPatch;

impl DiffMatchPatch {
	/// Locates `pattern` in `text` near code-unit offset `loc`. Returns the best
	/// matching offset, or `None` if nothing scores within `match_threshold`.
	///
	/// Exact containment and exact-location checks are tried first; `match_bitap` only
	/// runs when neither finds anything.
	pub fn match_main(&self, text: &str, pattern: &str, loc: usize) -> Result<Option<usize>> {
		let text_chars: Vec<char> = text.chars().collect();
		let pattern_chars: Vec<char> = pattern.chars().collect();
		let loc = loc.min(text_chars.len());

		if text_chars == pattern_chars {
			return Ok(Some(0));
		}
		if text_chars.is_empty() {
			return Ok(None);
		}
		let window_end = (loc + pattern_chars.len()).min(text_chars.len());
		if text_chars[loc..window_end] == pattern_chars[..] {
			return Ok(Some(loc));
		}

		self.match_bitap(&text_chars, &pattern_chars, loc)
	}

	fn match_bitap(&self, text: &[char], pattern: &[char], loc: usize) -> Result<Option<usize>> {
		let bits = self.bitap_bits();
		if pattern.len() as u32 > bits {
			return Err(Error::pattern_too_long(pattern.len(), bits as usize));
		}

		let alphabet = match_alphabet(pattern);
		let score = |e: usize, x: isize| self.bitap_score(e, x, loc, pattern.len());

		let mut score_threshold = self.match_threshold;
		if let Some(best_loc) = find_subslice_from(text, pattern, loc) {
			score_threshold = score_threshold.min(score(0, best_loc as isize));
			if let Some(best_loc) = last_index_of(text, pattern, loc + pattern.len()) {
				score_threshold = score_threshold.min(score(0, best_loc as isize));
			}
		}

		let match_mask: u32 = 1 << (pattern.len() - 1);
		let mut best_loc: Option<usize> = None;
		let mut bin_max = (pattern.len() + text.len()) as isize;
		let mut last_rd: Vec<u32> = Vec::new();

		for d in 0..pattern.len() {
			let mut bin_min = 0isize;
			let mut bin_mid = bin_max;
			while bin_min < bin_mid {
				if score(d, loc as isize + bin_mid) <= score_threshold {
					bin_min = bin_mid;
				} else {
					bin_max = bin_mid;
				}
				bin_mid = (bin_max - bin_min) / 2 + bin_min;
			}
			bin_max = bin_mid;

			let mut start = (loc as isize - bin_mid + 1).max(1) as usize;
			let finish = ((loc as isize + bin_mid).min(text.len() as isize) as usize) + pattern.len();

			let mut rd = vec![0u32; finish + 2];
			rd[finish + 1] = (1u32 << d).wrapping_sub(1);

			let mut j = finish;
			loop {
				if j < start {
					break;
				}
				let char_match = if text.len() <= j - 1 { 0 } else { *alphabet.get(&text[j - 1]).unwrap_or(&0) };

				rd[j] = if d == 0 {
					((rd[j + 1] << 1) | 1) & char_match
				} else {
					(((rd[j + 1] << 1) | 1) & char_match) | (((last_rd[j + 1] | last_rd[j]) << 1) | 1) | last_rd[j + 1]
				};

				if rd[j] & match_mask != 0 {
					let cur_score = score(d, (j - 1) as isize);
					if cur_score <= score_threshold {
						score_threshold = cur_score;
						best_loc = Some(j - 1);
						if best_loc.unwrap() > loc {
							start = (2 * loc as isize - best_loc.unwrap() as isize).max(1) as usize;
						} else {
							break;
						}
					}
				}

				if j == 0 {
					break;
				}
				j -= 1;
			}

			if score(d + 1, loc as isize) > score_threshold {
				break;
			}
			last_rd = rd;
		}

		Ok(best_loc)
	}

	fn bitap_score(&self, e: usize, x: isize, loc: usize, pattern_len: usize) -> f64 {
		let accuracy = e as f64 / pattern_len as f64;
		let proximity = (loc as isize - x).unsigned_abs() as f64;
		if self.match_distance == 0 {
			if proximity > 0.0 {
				1.0
			} else {
				accuracy
			}
		} else {
			accuracy + proximity / self.match_distance as f64
		}
	}
}

fn match_alphabet(pattern: &[char]) -> HashMap<char, u32> {
	let mut s = HashMap::new();
	for (i, &c) in pattern.iter().enumerate() {
		let bit = 1u32 << (pattern.len() - i - 1);
		*s.entry(c).or_insert(0) |= bit;
	}
	s
}

fn last_index_of(haystack: &[char], needle: &[char], before: usize) -> Option<usize> {
	if needle.is_empty() {
		return Some(before.min(haystack.len()));
	}
	let limit = (before + needle.len()).min(haystack.len());
	if needle.len() > limit {
		return None;
	}
	(0..=limit - needle.len()).rev().find(|&i| haystack[i..i + needle.len()] == needle[..])
}
