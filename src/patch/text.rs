//! Patch text codec (C11): the GNU-unified-diff-like textual form patches travel in.

use crate::diff::{Diff, Op};
use crate::error::{Error, Result};

use super::Patch;

const UNRESERVED: &[char] = &[
	' ', ';', ',', '/', '?', ':', '@', '&', '=', '+', '$', '-', '_', '.', '!', '~', '*', '\'', '(', ')', '#',
];

fn is_unreserved(c: char) -> bool {
	c.is_ascii_alphanumeric() || UNRESERVED.contains(&c)
}

fn percent_encode(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		if is_unreserved(c) {
			out.push(c);
		} else {
			let mut buf = [0u8; 4];
			for b in c.encode_utf8(&mut buf).as_bytes() {
				out.push('%');
				out.push_str(&format!("{b:02X}"));
			}
		}
	}
	out
}

fn percent_decode(token: &str) -> Result<String> {
	let bytes = token.as_bytes();
	let mut out = Vec::with_capacity(bytes.len());
	let mut i = 0;
	while i < bytes.len() {
		if bytes[i] == b'%' {
			let hex = token.get(i + 1..i + 3).ok_or_else(|| Error::illegal_escape(token))?;
			let byte = u8::from_str_radix(hex, 16).map_err(|_| Error::illegal_escape(token))?;
			out.push(byte);
			i += 3;
		} else {
			out.push(bytes[i]);
			i += 1;
		}
	}
	String::from_utf8(out).map_err(|_| Error::illegal_escape(token))
}

/// Serializes a patch list as GNU-style unified hunks: `@@ -start1,length1
/// +start2,length2 @@`, one body line per diff record, prefixed with ` `/`-`/`+`.
pub fn patch_to_text(patches: &[Patch]) -> String {
	let mut out = String::new();
	for patch in patches {
		out.push_str(&header(patch));
		out.push('\n');
		for d in &patch.diffs {
			let prefix = match d.op {
				Op::Insert => '+',
				Op::Delete => '-',
				Op::Equal => ' ',
			};
			out.push(prefix);
			out.push_str(&percent_encode(&d.text));
			out.push('\n');
		}
	}
	out
}

fn header(patch: &Patch) -> String {
	format!("@@ -{} +{} @@", coord(patch.start1, patch.length1), coord(patch.start2, patch.length2))
}

/// Formats a `start,length` coordinate pair. Length 1 omits the `,length` suffix; length 0
/// decrements the reported (1-based) start, matching the reference's unified-diff quirk.
fn coord(start0: usize, length: usize) -> String {
	match length {
		0 => format!("{},0", start0),
		1 => format!("{}", start0 + 1),
		n => format!("{},{}", start0 + 1, n),
	}
}

/// Parses text produced by [`patch_to_text`] back into a patch list.
pub fn patch_from_text(text: &str) -> Result<Vec<Patch>> {
	let mut patches = Vec::new();
	if text.is_empty() {
		return Ok(patches);
	}

	let mut lines = text.split('\n').peekable();

	while let Some(&line) = lines.peek() {
		if line.is_empty() {
			lines.next();
			continue;
		}
		let (start1, length1, start2, length2) = parse_header(line)?;
		lines.next();

		let mut patch = Patch { start1, start2, length1, length2, diffs: Vec::new() };

		while let Some(&line) = lines.peek() {
			if line.is_empty() {
				break;
			}
			let mut chars = line.chars();
			let tag = chars.next().unwrap();
			let payload = &line[tag.len_utf8()..];
			match tag {
				'@' => break,
				'+' => {
					patch.diffs.push(Diff::insert(percent_decode(payload)?));
					lines.next();
				}
				'-' => {
					patch.diffs.push(Diff::delete(percent_decode(payload)?));
					lines.next();
				}
				' ' => {
					patch.diffs.push(Diff::equal(percent_decode(payload)?));
					lines.next();
				}
				_ => return Err(Error::invalid_mode(line)),
			}
		}

		patches.push(patch);
	}

	Ok(patches)
}

/// Parses `@@ -start1(,length1)? +start2(,length2)? @@`. A missing length defaults to 1
/// with `start` left as-is; an explicit `0` length leaves `start` as-is too (it already
/// denotes "insertion point", not a covered length); any other explicit length decrements
/// `start` by one to convert from the header's 1-based convention.
fn parse_header(line: &str) -> Result<(usize, usize, usize, usize)> {
	let body = line.strip_prefix("@@ -").and_then(|s| s.strip_suffix(" @@")).ok_or_else(|| Error::invalid_patch(line))?;
	let (left, right) = body.split_once(" +").ok_or_else(|| Error::invalid_patch(line))?;
	let (start1, length1) = parse_coord(left, line)?;
	let (start2, length2) = parse_coord(right, line)?;
	Ok((start1, length1, start2, length2))
}

fn parse_coord(field: &str, line: &str) -> Result<(usize, usize)> {
	match field.split_once(',') {
		None => {
			let n: usize = field.parse().map_err(|_| Error::invalid_patch(line))?;
			Ok((n.saturating_sub(1), 1))
		}
		Some((start, "0")) => {
			let n: usize = start.parse().map_err(|_| Error::invalid_patch(line))?;
			Ok((n, 0))
		}
		Some((start, length)) => {
			let n: usize = start.parse().map_err(|_| Error::invalid_patch(line))?;
			let len: usize = length.parse().map_err(|_| Error::invalid_patch(line))?;
			Ok((n.saturating_sub(1), len))
		}
	}
}
