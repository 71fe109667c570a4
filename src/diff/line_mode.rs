//! Line-mode speed-up (C3): each source line is hashed to a single synthetic code unit so
//! the bisector can diff whole lines instead of characters, then the result is expanded
//! back and any adjacent delete/insert run is re-diffed at full character resolution.

use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::time::Instant;

use twox_hash::XxHash64;

use crate::DiffMatchPatch;

use super::{chars_to_string, cleanup_semantic, diff_main_internal, Diff, Op};

/// Indices up to this many are reserved for lines first seen while encoding `text1`.
const FIRST_TEXT_MAX_LINES: usize = 40_000;
/// Upper bound for the combined line table. Widened far past the reference's 16-bit
/// ceiling (see §9 of the design notes) since the code unit is a full `char`, not a
/// UTF-16 unit sharing space with surrogate pairs.
const LINE_TABLE_MAX: usize = 0x10_FFFF - 0x800;

struct LineTable {
	lines: Vec<String>,
	index: HashMap<String, u32, BuildHasherDefault<XxHash64>>,
}

impl LineTable {
	fn new() -> Self {
		Self { lines: vec![String::new()], index: HashMap::default() }
	}

	/// Encodes `text` into a vector of synthetic per-line chars, growing the shared table
	/// as new lines are seen, up to `max_lines` total entries.
	fn munge(&mut self, text: &str, max_lines: usize) -> Vec<char> {
		let mut out = Vec::new();
		let mut rest = text;
		while !rest.is_empty() {
			let (line, remainder) = match rest.find('\n') {
				Some(idx) => rest.split_at(idx + 1),
				None => (rest, ""),
			};
			if let Some(&id) = self.index.get(line) {
				out.push(id_to_char(id));
				rest = remainder;
			} else if self.lines.len() >= max_lines {
				out.push(self.intern(rest));
				break;
			} else {
				out.push(self.intern(line));
				rest = remainder;
			}
		}
		out
	}

	fn intern(&mut self, line: &str) -> char {
		let id = self.lines.len() as u32;
		self.lines.push(line.to_string());
		self.index.insert(line.to_string(), id);
		id_to_char(id)
	}

	fn decode(&self, chars: &[char]) -> String {
		chars.iter().map(|&c| self.lines[char_to_id(c) as usize].as_str()).collect()
	}
}

/// `char::from_u32` rejects the UTF-16 surrogate range; shift indices past it so every
/// line id still round-trips through a valid `char`.
fn id_to_char(id: u32) -> char {
	let code = if id < 0xD800 { id } else { id + 0x0800 };
	char::from_u32(code).expect("line id within valid char range")
}

fn char_to_id(c: char) -> u32 {
	let code = c as u32;
	if code < 0xD800 {
		code
	} else {
		code - 0x0800
	}
}

pub(crate) fn diff_line_mode(text1: &[char], text2: &[char], deadline: Option<Instant>, cfg: &DiffMatchPatch) -> Vec<Diff> {
	let t1s = chars_to_string(text1);
	let t2s = chars_to_string(text2);

	let mut table = LineTable::new();
	let chars1 = table.munge(&t1s, FIRST_TEXT_MAX_LINES);
	let chars2 = table.munge(&t2s, LINE_TABLE_MAX);

	let mut diffs = diff_main_internal(&chars1, &chars2, false, deadline, cfg);
	for d in &mut diffs {
		d.text = table.decode(&d.text.chars().collect::<Vec<_>>());
	}
	let diffs = cleanup_semantic(diffs);

	// Re-diff every contiguous delete+insert run at full character resolution; a long
	// equal line flushes the pending run (mirrors the reference's splice-in-place loop).
	let mut out = Vec::with_capacity(diffs.len());
	let mut count_delete = 0usize;
	let mut count_insert = 0usize;
	let mut text_delete = String::new();
	let mut text_insert = String::new();

	let flush = |text_delete: &mut String, text_insert: &mut String, out: &mut Vec<Diff>| {
		if !text_delete.is_empty() || !text_insert.is_empty() {
			let a: Vec<char> = text_delete.chars().collect();
			let b: Vec<char> = text_insert.chars().collect();
			out.extend(diff_main_internal(&a, &b, false, deadline, cfg));
		}
		text_delete.clear();
		text_insert.clear();
	};

	for d in diffs {
		match d.op {
			Op::Insert => {
				count_insert += 1;
				text_insert.push_str(&d.text);
			}
			Op::Delete => {
				count_delete += 1;
				text_delete.push_str(&d.text);
			}
			Op::Equal => {
				if count_delete >= 1 && count_insert >= 1 {
					flush(&mut text_delete, &mut text_insert, &mut out);
				} else {
					// Pure delete-only or insert-only run: nothing to re-diff, but the
					// records still belong in the output untouched.
					if !text_delete.is_empty() {
						out.push(Diff::delete(std::mem::take(&mut text_delete)));
					}
					if !text_insert.is_empty() {
						out.push(Diff::insert(std::mem::take(&mut text_insert)));
					}
				}
				count_delete = 0;
				count_insert = 0;
				text_delete.clear();
				text_insert.clear();
				if !d.text.is_empty() {
					out.push(d);
				}
			}
		}
	}
	if count_delete >= 1 && count_insert >= 1 {
		flush(&mut text_delete, &mut text_insert, &mut out);
	} else {
		if !text_delete.is_empty() {
			out.push(Diff::delete(text_delete));
		}
		if !text_insert.is_empty() {
			out.push(Diff::insert(text_insert));
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::diff::{diff_text1, diff_text2};

	#[test]
	fn test_line_table_round_trips_ids() {
		for id in [0u32, 1, 100, 0xD7FF, 0xD800, 0xD900, 0x10FFFE - 0x800] {
			assert_eq!(char_to_id(id_to_char(id)), id);
		}
	}

	#[test]
	fn test_diff_line_mode_matches_text() {
		let cfg = DiffMatchPatch::new();
		let t1 = "line one\nline two\nline three\n".repeat(40);
		let t2 = "line one\nline TWO\nline three\n".repeat(40);
		let t1c: Vec<char> = t1.chars().collect();
		let t2c: Vec<char> = t2.chars().collect();
		let diffs = diff_line_mode(&t1c, &t2c, None, &cfg);
		assert_eq!(diff_text1(&diffs), t1);
		assert_eq!(diff_text2(&diffs), t2);
	}

	/// A lone deleted line (no corresponding insertion in that run) must still round-trip;
	/// it used to be dropped because it never reached the delete+insert flush.
	#[test]
	fn test_diff_line_mode_keeps_lone_deletion() {
		let cfg = DiffMatchPatch::new();
		let t1 = "line one\nline two\nline three\n".repeat(40);
		let t2 = "line one\nline three\n".repeat(40);
		let t1c: Vec<char> = t1.chars().collect();
		let t2c: Vec<char> = t2.chars().collect();
		let diffs = diff_line_mode(&t1c, &t2c, None, &cfg);
		assert_eq!(diff_text1(&diffs), t1);
		assert_eq!(diff_text2(&diffs), t2);
	}
}
