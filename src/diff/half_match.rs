//! Half-match speed-up (C2): finds a long common middle substring that lets the bisector
//! recurse on two much smaller problems instead of bisecting the full texts.

use crate::DiffMatchPatch;

use super::{common_prefix, common_suffix, find_subslice_from};

pub(crate) struct HalfMatch {
	pub text1_a: Vec<char>,
	pub text1_b: Vec<char>,
	pub text2_a: Vec<char>,
	pub text2_b: Vec<char>,
	pub mid_common: String,
}

/// Finds a half-match, if one covers at least half of the longer text. Skipped entirely
/// when `diff_timeout <= 0`, since on an unbounded budget the exact bisector is preferred.
pub(crate) fn find(text1: &[char], text2: &[char], cfg: &DiffMatchPatch) -> Option<HalfMatch> {
	if cfg.diff_timeout <= 0.0 {
		return None;
	}

	let (long, short, long_is_text1) = if text1.len() > text2.len() { (text1, text2, true) } else { (text2, text1, false) };

	if long.len() < 4 || short.len() * 2 < long.len() {
		return None;
	}

	let hm1 = half_match_at(long, short, (long.len() + 3) / 4);
	let hm2 = half_match_at(long, short, (long.len() + 1) / 2);

	let best = match (hm1, hm2) {
		(None, None) => return None,
		(Some(a), None) => a,
		(None, Some(b)) => b,
		(Some(a), Some(b)) => {
			if a.mid_common.len() > b.mid_common.len() {
				a
			} else {
				b
			}
		}
	};

	let (text1_a, text1_b, text2_a, text2_b) = if long_is_text1 {
		(best.long_a, best.long_b, best.short_a, best.short_b)
	} else {
		(best.short_a, best.short_b, best.long_a, best.long_b)
	};

	Some(HalfMatch {
		text1_a,
		text1_b,
		text2_a,
		text2_b,
		mid_common: best.mid_common.iter().collect(),
	})
}

struct Candidate {
	long_a: Vec<char>,
	long_b: Vec<char>,
	short_a: Vec<char>,
	short_b: Vec<char>,
	mid_common: Vec<char>,
}

/// Looks for a seed of `long.len() / 4` code units starting at `i`, repeated at every
/// position it occurs in `short`, and keeps the occurrence with the longest combined
/// prefix+suffix match around it.
fn half_match_at(long: &[char], short: &[char], i: usize) -> Option<Candidate> {
	let seed_len = long.len() / 4;
	let seed = &long[i..i + seed_len];

	let mut best: Option<Candidate> = None;
	let mut j = 0;
	while let Some(found) = find_subslice_from(short, seed, j) {
		let prefix_len = common_prefix(&long[i..], &short[found..]);
		let suffix_len = common_suffix(&long[..i], &short[..found]);

		let common_len = best.as_ref().map(|c| c.mid_common.len()).unwrap_or(0);
		if suffix_len + prefix_len > common_len {
			let mid_common: Vec<char> = short[found - suffix_len..found]
				.iter()
				.chain(short[found..found + prefix_len].iter())
				.copied()
				.collect();
			best = Some(Candidate {
				long_a: long[..i - suffix_len].to_vec(),
				long_b: long[i + prefix_len..].to_vec(),
				short_a: short[..found - suffix_len].to_vec(),
				short_b: short[found + prefix_len..].to_vec(),
				mid_common,
			});
		}

		j = found + 1;
	}

	best.filter(|c| c.mid_common.len() * 2 >= long.len())
}
