//! Delta codec (C7): a compact, percent-escaped, tab-separated serialization of an edit
//! script, used to ship a diff without repeating the (usually much larger) source text.

use crate::error::{Error, Result};

use super::{Diff, Op};

/// Characters `encodeURI` leaves unescaped, per the reference implementation, plus the
/// space (the reference escapes it to `%20` and then unconditionally unescapes it back
/// before returning, purely for delta readability; skipping the round trip here has the
/// same effect).
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

/// Serializes an edit script to delta format: one `\t`-joined token per diff, `=n` for an
/// equality of `n` code units, `-n` for a deletion of `n` code units, `+text` (percent
/// escaped) for an insertion.
pub fn diff_to_delta(diffs: &[Diff]) -> String {
	diffs
		.iter()
		.map(|d| match d.op {
			Op::Insert => format!("+{}", percent_encode(&d.text)),
			Op::Delete => format!("-{}", d.text_len()),
			Op::Equal => format!("={}", d.text_len()),
		})
		.collect::<Vec<_>>()
		.join("\t")
}

/// Reconstructs an edit script from `text1` and a delta produced by [`diff_to_delta`].
/// Fails if the delta's total equal+delete length doesn't exactly consume `text1`.
pub fn diff_from_delta(text1: &str, delta: &str) -> Result<Vec<Diff>> {
	let source: Vec<char> = text1.chars().collect();
	let mut pointer = 0usize;
	let mut diffs = Vec::new();

	for token in delta.split('\t') {
		if token.is_empty() {
			continue;
		}
		let (tag, param) = token.split_at(1);
		match tag {
			"+" => {
				diffs.push(Diff::insert(percent_decode(param)?));
			}
			"-" | "=" => {
				let n: usize = param.parse().map_err(|_| Error::invalid_number(token))?;
				let end = pointer.checked_add(n).filter(|&e| e <= source.len()).ok_or_else(|| Error::invalid_number(token))?;
				let text: String = source[pointer..end].iter().collect();
				pointer = end;
				if tag == "=" {
					diffs.push(Diff::equal(text));
				} else {
					diffs.push(Diff::delete(text));
				}
			}
			_ => return Err(Error::invalid_op(tag)),
		}
	}

	if pointer != source.len() {
		return Err(Error::length_mismatch(source.len(), pointer));
	}

	Ok(diffs)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_round_trip_jumps_jumped() {
		let diffs = vec![
			Diff::equal("jump"),
			Diff::delete("s"),
			Diff::insert("ed"),
			Diff::equal(" over "),
			Diff::delete("the lazy"),
			Diff::insert("a"),
		];
		let text1 = "jumps over the lazy";
		let delta = diff_to_delta(&diffs);
		assert_eq!(delta, "=4\t-1\t+ed\t=6\t-8\t+a");
		let decoded = diff_from_delta(text1, &delta).unwrap();
		assert_eq!(decoded, diffs);
	}

	#[test]
	fn test_percent_encoding_round_trips() {
		let diffs = vec![Diff::insert("a = b + c % 100% done! 日本語")];
		let delta = diff_to_delta(&diffs);
		let decoded = diff_from_delta("", &delta).unwrap();
		assert_eq!(decoded, diffs);
	}

	#[test]
	fn test_length_mismatch_is_an_error() {
		assert!(diff_from_delta("short", "=10").is_err());
	}

	#[test]
	fn test_illegal_escape_is_an_error() {
		assert!(diff_from_delta("", "+%zz").is_err());
	}

	#[test]
	fn test_invalid_op_is_an_error() {
		assert!(diff_from_delta("", "?5").is_err());
	}
}
