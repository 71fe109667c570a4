//! Diff normalization passes (C6): merge, semantic cleanup (with the "lossless" boundary
//! shift) and efficiency cleanup. Every pass takes and returns `Vec<Diff>` by value rather
//! than mutating in place, since Rust's borrow checker makes the reference algorithm's
//! splice-while-iterating style awkward to express safely over a `&mut Vec`.

use std::collections::VecDeque;

use super::affix::{common_overlap, common_prefix, common_suffix};
use super::{Diff, Op};

/// Merges adjacent same-op diffs, factors out common affixes shared between a delete and
/// an insert run into a surrounding equal, and drops empty-text entries.
pub fn cleanup_merge(diffs: Vec<Diff>) -> Vec<Diff> {
	let mut diffs = diffs;
	diffs.push(Diff::equal(""));

	let mut pointer = 0usize;
	let mut count_delete = 0usize;
	let mut count_insert = 0usize;
	let mut text_delete = String::new();
	let mut text_insert = String::new();

	while pointer < diffs.len() {
		match diffs[pointer].op {
			Op::Insert => {
				count_insert += 1;
				text_insert.push_str(&diffs[pointer].text);
				pointer += 1;
			}
			Op::Delete => {
				count_delete += 1;
				text_delete.push_str(&diffs[pointer].text);
				pointer += 1;
			}
			Op::Equal => {
				if count_delete + count_insert > 1 {
					if count_delete != 0 && count_insert != 0 {
						let ins_chars: Vec<char> = text_insert.chars().collect();
						let del_chars: Vec<char> = text_delete.chars().collect();

						let prefix_len = common_prefix(&ins_chars, &del_chars);
						let (mut ins_chars, mut del_chars) = if prefix_len != 0 {
							let prefix: String = ins_chars[..prefix_len].iter().collect();
							let n = count_delete + count_insert;
							if pointer >= n + 1 && diffs[pointer - n - 1].op == Op::Equal {
								diffs[pointer - n - 1].text.push_str(&prefix);
							} else {
								diffs.insert(0, Diff::equal(prefix));
								pointer += 1;
							}
							(ins_chars[prefix_len..].to_vec(), del_chars[prefix_len..].to_vec())
						} else {
							(ins_chars, del_chars)
						};

						let suffix_len = common_suffix(&ins_chars, &del_chars);
						if suffix_len != 0 {
							let suffix: String = ins_chars[ins_chars.len() - suffix_len..].iter().collect();
							diffs[pointer].text = format!("{suffix}{}", diffs[pointer].text);
							ins_chars.truncate(ins_chars.len() - suffix_len);
							del_chars.truncate(del_chars.len() - suffix_len);
						}

						text_insert = ins_chars.iter().collect();
						text_delete = del_chars.iter().collect();
					}

					let n = count_delete + count_insert;
					let start = pointer - n;
					let mut new_ops = Vec::with_capacity(2);
					if !text_delete.is_empty() {
						new_ops.push(Diff::delete(text_delete.clone()));
					}
					if !text_insert.is_empty() {
						new_ops.push(Diff::insert(text_insert.clone()));
					}
					let new_len = new_ops.len();
					diffs.splice(start..pointer, new_ops);
					pointer = start + new_len + 1;
				} else if pointer != 0 && diffs[pointer - 1].op == Op::Equal {
					let text = diffs[pointer].text.clone();
					diffs[pointer - 1].text.push_str(&text);
					diffs.remove(pointer);
				} else {
					pointer += 1;
				}
				count_insert = 0;
				count_delete = 0;
				text_delete.clear();
				text_insert.clear();
			}
		}
	}

	if diffs.last().map(|d| d.text.is_empty()).unwrap_or(false) {
		diffs.pop();
	}

	let mut changes = false;
	let mut pointer = 1usize;
	while pointer + 1 < diffs.len() {
		if diffs[pointer - 1].op == Op::Equal && diffs[pointer + 1].op == Op::Equal {
			let cur: Vec<char> = diffs[pointer].text.chars().collect();
			let prev: Vec<char> = diffs[pointer - 1].text.chars().collect();
			let next: Vec<char> = diffs[pointer + 1].text.chars().collect();

			if cur.len() >= prev.len() && cur[cur.len() - prev.len()..] == prev[..] {
				let merged_next = format!("{}{}", diffs[pointer - 1].text, diffs[pointer + 1].text);
				let new_cur: String = prev.iter().chain(cur[..cur.len() - prev.len()].iter()).collect();
				diffs[pointer].text = new_cur;
				diffs[pointer + 1].text = merged_next;
				diffs.remove(pointer - 1);
				changes = true;
			} else if cur.len() >= next.len() && cur[..next.len()] == next[..] {
				diffs[pointer - 1].text.push_str(&diffs[pointer + 1].text);
				let new_cur: String = cur[next.len()..].iter().chain(next.iter()).collect();
				diffs[pointer].text = new_cur;
				diffs.remove(pointer + 1);
				changes = true;
			}
		}
		pointer += 1;
	}

	if changes {
		cleanup_merge(diffs)
	} else {
		diffs
	}
}

/// Promotes semantically-meaningless diffs (e.g. a single changed character surrounded by
/// much larger edits) into proper delete+insert pairs, shifts edit boundaries onto
/// natural word/line breaks, and merges overlapping delete/insert runs into delete+equal+insert.
pub fn cleanup_semantic(diffs: Vec<Diff>) -> Vec<Diff> {
	let mut diffs = diffs;
	let mut changes = false;
	let mut equalities: Vec<usize> = Vec::new();
	let mut last_equality: Option<String> = None;
	let mut pointer: isize = 0;
	let mut length_insertions1 = 0usize;
	let mut length_deletions1 = 0usize;
	let mut length_insertions2 = 0usize;
	let mut length_deletions2 = 0usize;

	while (pointer as usize) < diffs.len() {
		let p = pointer as usize;
		if diffs[p].op == Op::Equal {
			equalities.push(p);
			length_insertions1 = length_insertions2;
			length_deletions1 = length_deletions2;
			length_insertions2 = 0;
			length_deletions2 = 0;
			last_equality = Some(diffs[p].text.clone());
		} else {
			let len = diffs[p].text_len();
			if diffs[p].op == Op::Insert {
				length_insertions2 += len;
			} else {
				length_deletions2 += len;
			}
			if let Some(le) = last_equality.clone() {
				let le_len = le.chars().count();
				if le_len <= length_insertions1.max(length_deletions1) && le_len <= length_insertions2.max(length_deletions2) {
					let eq_idx = *equalities.last().unwrap();
					diffs.insert(eq_idx, Diff::delete(le));
					diffs[eq_idx + 1].op = Op::Insert;
					let new_len = equalities.len().saturating_sub(2);
					equalities.truncate(new_len);
					pointer = equalities.last().map(|&i| i as isize).unwrap_or(-1);
					length_insertions1 = 0;
					length_deletions1 = 0;
					length_insertions2 = 0;
					length_deletions2 = 0;
					last_equality = None;
					changes = true;
				}
			}
		}
		pointer += 1;
	}

	let mut diffs = if changes { cleanup_merge(diffs) } else { diffs };
	diffs = cleanup_semantic_lossless(diffs);

	let mut pointer = 1usize;
	while pointer < diffs.len() {
		if diffs[pointer - 1].op == Op::Delete && diffs[pointer].op == Op::Insert {
			let deletion: Vec<char> = diffs[pointer - 1].text.chars().collect();
			let insertion: Vec<char> = diffs[pointer].text.chars().collect();
			let overlap_length1 = common_overlap(&deletion, &insertion);
			let overlap_length2 = common_overlap(&insertion, &deletion);

			if overlap_length1 >= overlap_length2 {
				if overlap_length1 * 2 >= deletion.len() || overlap_length1 * 2 >= insertion.len() {
					let equal_text: String = insertion[..overlap_length1].iter().collect();
					diffs.insert(pointer, Diff::equal(equal_text));
					diffs[pointer - 1].text = deletion[..deletion.len() - overlap_length1].iter().collect();
					diffs[pointer + 1].text = insertion[overlap_length1..].iter().collect();
					pointer += 1;
				}
			} else if overlap_length2 * 2 >= deletion.len() || overlap_length2 * 2 >= insertion.len() {
				let equal_text: String = deletion[..overlap_length2].iter().collect();
				diffs.insert(pointer, Diff::equal(equal_text));
				diffs[pointer - 1].op = Op::Insert;
				diffs[pointer - 1].text = insertion[..insertion.len() - overlap_length2].iter().collect();
				diffs[pointer + 1].op = Op::Delete;
				diffs[pointer + 1].text = deletion[overlap_length2..].iter().collect();
				pointer += 1;
			}
			pointer += 1;
		}
		pointer += 1;
	}

	diffs
}

fn semantic_score(one: &str, two: &str) -> u8 {
	if one.is_empty() || two.is_empty() {
		return 6;
	}
	let char1 = one.chars().next_back().unwrap();
	let char2 = two.chars().next().unwrap();
	let non_alnum1 = !char1.is_ascii_alphanumeric();
	let non_alnum2 = !char2.is_ascii_alphanumeric();
	let ws1 = non_alnum1 && char1.is_whitespace();
	let ws2 = non_alnum2 && char2.is_whitespace();
	let lb1 = ws1 && (char1 == '\n' || char1 == '\r');
	let lb2 = ws2 && (char2 == '\n' || char2 == '\r');
	let blank1 = lb1 && ends_with_blank_line(one);
	let blank2 = lb2 && starts_with_blank_line(two);

	if blank1 || blank2 {
		5
	} else if lb1 || lb2 {
		4
	} else if non_alnum1 && !ws1 && ws2 {
		3
	} else if ws1 || ws2 {
		2
	} else if non_alnum1 || non_alnum2 {
		1
	} else {
		0
	}
}

fn ends_with_blank_line(s: &str) -> bool {
	s.ends_with("\n\n") || s.ends_with("\n\r\n")
}

fn starts_with_blank_line(s: &str) -> bool {
	s.starts_with("\n\n") || s.starts_with("\r\n\n") || s.starts_with("\n\r\n") || s.starts_with("\r\n\r\n")
}

/// Slides an edit's boundary across a run of characters shared with its neighbouring
/// equalities, preferring the alignment with the highest [`semantic_score`] (word/line
/// breaks score higher than the middle of a token).
pub fn cleanup_semantic_lossless(mut diffs: Vec<Diff>) -> Vec<Diff> {
	let mut pointer: isize = 1;
	while pointer + 1 < diffs.len() as isize {
		let p = pointer as usize;
		if diffs[p - 1].op == Op::Equal && diffs[p + 1].op == Op::Equal {
			let mut equality1: Vec<char> = diffs[p - 1].text.chars().collect();
			let mut edit: VecDeque<char> = diffs[p].text.chars().collect();
			let mut equality2: VecDeque<char> = diffs[p + 1].text.chars().collect();

			let edit_vec: Vec<char> = edit.iter().copied().collect();
			let common_offset = common_suffix(&equality1, &edit_vec);
			if common_offset > 0 {
				let common: Vec<char> = edit_vec[edit_vec.len() - common_offset..].to_vec();
				equality1.truncate(equality1.len() - common_offset);
				for _ in 0..common_offset {
					edit.pop_back();
				}
				for &c in common.iter().rev() {
					edit.push_front(c);
				}
				for &c in common.iter().rev() {
					equality2.push_front(c);
				}
			}

			let mut best_equality1 = equality1.clone();
			let mut best_edit = edit.clone();
			let mut best_equality2 = equality2.clone();
			let mut best_score = {
				let e: String = equality1.iter().collect();
				let d: String = edit.iter().collect();
				let e2: String = equality2.iter().collect();
				semantic_score(&e, &d) + semantic_score(&d, &e2)
			};

			while !edit.is_empty() && edit.front() == equality2.front() {
				let c = edit.pop_front().unwrap();
				equality1.push(c);
				let c2 = equality2.pop_front().unwrap();
				edit.push_back(c2);

				let e: String = equality1.iter().collect();
				let d: String = edit.iter().collect();
				let e2: String = equality2.iter().collect();
				let score = semantic_score(&e, &d) + semantic_score(&d, &e2);
				if score >= best_score {
					best_score = score;
					best_equality1 = equality1.clone();
					best_edit = edit.clone();
					best_equality2 = equality2.clone();
				}
			}

			let best_equality1_s: String = best_equality1.iter().collect();
			if diffs[p - 1].text != best_equality1_s {
				if !best_equality1.is_empty() {
					diffs[p - 1].text = best_equality1_s;
				} else {
					diffs.remove(p - 1);
					pointer -= 1;
				}
				let p2 = pointer as usize;
				diffs[p2].text = best_edit.iter().collect();
				if !best_equality2.is_empty() {
					diffs[p2 + 1].text = best_equality2.iter().collect();
				} else {
					diffs.remove(p2 + 1);
					pointer -= 1;
				}
			}
		}
		pointer += 1;
	}
	diffs
}

/// Reduces the diff count by re-absorbing small equalities that sit between edits too
/// close together to be worth the cost of an extra patch hunk (see `diff_edit_cost`).
pub fn cleanup_efficiency(diffs: Vec<Diff>, edit_cost: u32) -> Vec<Diff> {
	let mut diffs = diffs;
	let mut changes = false;
	let mut equalities: Vec<usize> = Vec::new();
	let mut last_equality: Option<String> = None;
	let mut pointer: isize = 0;
	let mut pre_ins = false;
	let mut pre_del = false;
	let mut post_ins = false;
	let mut post_del = false;

	while (pointer as usize) < diffs.len() {
		let p = pointer as usize;
		if diffs[p].op == Op::Equal {
			let len = diffs[p].text_len() as u32;
			if len < edit_cost && (post_ins || post_del) {
				equalities.push(p);
				pre_ins = post_ins;
				pre_del = post_del;
				last_equality = Some(diffs[p].text.clone());
			} else {
				equalities.clear();
				last_equality = None;
			}
			post_ins = false;
			post_del = false;
		} else {
			if diffs[p].op == Op::Delete {
				post_del = true;
			} else {
				post_ins = true;
			}

			if let Some(le) = last_equality.clone() {
				let le_len = le.chars().count() as u32;
				let triggers = (pre_ins && pre_del && post_ins && post_del)
					|| (le_len * 2 < edit_cost && (pre_ins as u8 + pre_del as u8 + post_ins as u8 + post_del as u8) == 3);
				if triggers {
					let eq_idx = *equalities.last().unwrap();
					diffs.insert(eq_idx, Diff::delete(le));
					diffs[eq_idx + 1].op = Op::Insert;
					equalities.pop();
					last_equality = None;
					if pre_ins && pre_del {
						post_ins = true;
						post_del = true;
						equalities.clear();
					} else {
						equalities.pop();
						pointer = equalities.last().map(|&i| i as isize).unwrap_or(-1);
						post_ins = false;
						post_del = false;
					}
					changes = true;
				}
			}
		}
		pointer += 1;
	}

	if changes {
		cleanup_merge(diffs)
	} else {
		diffs
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn d(op: Op, t: &str) -> Diff {
		Diff::new(op, t)
	}

	#[test]
	fn test_cleanup_merge_no_change() {
		let diffs = vec![d(Op::Equal, "a"), d(Op::Delete, "b"), d(Op::Insert, "c")];
		assert_eq!(cleanup_merge(diffs.clone()), diffs);
	}

	#[test]
	fn test_cleanup_merge_drops_empty() {
		let diffs = vec![d(Op::Equal, "a"), d(Op::Equal, ""), d(Op::Equal, "b")];
		assert_eq!(cleanup_merge(diffs), vec![d(Op::Equal, "ab")]);
	}

	#[test]
	fn test_cleanup_merge_combines_same_op() {
		let diffs = vec![d(Op::Delete, "a"), d(Op::Delete, "b"), d(Op::Insert, "c")];
		assert_eq!(cleanup_merge(diffs), vec![d(Op::Delete, "ab"), d(Op::Insert, "c")]);
	}

	#[test]
	fn test_cleanup_merge_factors_prefix_and_suffix() {
		let diffs = vec![
			d(Op::Equal, "x"),
			d(Op::Delete, "a"),
			d(Op::Insert, "abc"),
			d(Op::Delete, "dc"),
			d(Op::Equal, "y"),
		];
		assert_eq!(
			cleanup_merge(diffs),
			vec![d(Op::Equal, "xa"), d(Op::Delete, "d"), d(Op::Insert, "b"), d(Op::Equal, "cy")]
		);
	}

	#[test]
	fn test_cleanup_semantic_eliminates_trivial_equality() {
		let diffs = vec![d(Op::Delete, "a"), d(Op::Equal, "b"), d(Op::Delete, "c")];
		assert_eq!(cleanup_semantic(diffs), vec![d(Op::Delete, "abc"), d(Op::Insert, "b")]);
	}

	#[test]
	fn test_cleanup_semantic_no_elimination() {
		let diffs = vec![d(Op::Delete, "ab"), d(Op::Insert, "cd")];
		assert_eq!(cleanup_semantic(diffs.clone()), diffs);
	}

	#[test]
	fn test_cleanup_efficiency_merges_close_edits() {
		let cfg_edit_cost = 4;
		let diffs = vec![
			d(Op::Delete, "ab"),
			d(Op::Insert, "12"),
			d(Op::Equal, "wxyz"),
			d(Op::Delete, "cd"),
			d(Op::Insert, "34"),
		];
		// A 4-char equality is not worth merging across at the default edit cost of 4.
		assert_eq!(cleanup_efficiency(diffs.clone(), cfg_edit_cost), diffs);
	}
}
