//! Derived views over an edit script: reconstructed source/target text, Levenshtein
//! distance, the post-edit index mapping, and HTML/plain-text pretty printers.

use super::{Diff, Op};

/// Reassembles the pre-edit text (equal + delete runs) from an edit script.
pub fn diff_text1(diffs: &[Diff]) -> String {
	diffs
		.iter()
		.filter(|d| d.op != Op::Insert)
		.map(|d| d.text.as_str())
		.collect()
}

/// Reassembles the post-edit text (equal + insert runs) from an edit script.
pub fn diff_text2(diffs: &[Diff]) -> String {
	diffs
		.iter()
		.filter(|d| d.op != Op::Delete)
		.map(|d| d.text.as_str())
		.collect()
}

/// The number of single-character edits required to turn `text1` into `text2`, derived
/// from the edit script rather than recomputed from scratch.
pub fn diff_levenshtein(diffs: &[Diff]) -> usize {
	let mut levenshtein = 0;
	let mut insertions = 0;
	let mut deletions = 0;
	for d in diffs {
		match d.op {
			Op::Insert => insertions += d.text_len(),
			Op::Delete => deletions += d.text_len(),
			Op::Equal => {
				levenshtein += insertions.max(deletions);
				insertions = 0;
				deletions = 0;
			}
		}
	}
	levenshtein + insertions.max(deletions)
}

/// Maps a code-unit offset in `text1` (the pre-edit text) to the corresponding offset in
/// `text2` (the post-edit text), accounting for everything deleted or inserted before it.
pub fn diff_x_index(diffs: &[Diff], loc: usize) -> usize {
	let mut chars1 = 0usize;
	let mut chars2 = 0usize;
	let mut last_chars1 = 0usize;
	let mut last_chars2 = 0usize;
	let mut last_op_delete = false;
	let mut exhausted = true;

	for d in diffs {
		if d.op != Op::Insert {
			chars1 += d.text_len();
		}
		if d.op != Op::Delete {
			chars2 += d.text_len();
		}
		if chars1 > loc {
			last_op_delete = d.op == Op::Delete;
			exhausted = false;
			break;
		}
		last_chars1 = chars1;
		last_chars2 = chars2;
	}

	if !exhausted && last_op_delete {
		last_chars2
	} else {
		last_chars2 + (loc - last_chars1)
	}
}

/// Renders an edit script as HTML, with insertions/deletions wrapped in styled
/// `<ins>`/`<del>` tags and newlines rendered as `¶<br>`.
pub fn diff_pretty_html(diffs: &[Diff]) -> String {
	let mut html = String::new();
	for d in diffs {
		let escaped = escape_html(&d.text);
		match d.op {
			Op::Insert => html.push_str(&format!(r#"<ins style="background:#e6ffe6;">{escaped}</ins>"#)),
			Op::Delete => html.push_str(&format!(r#"<del style="background:#ffe6e6;">{escaped}</del>"#)),
			Op::Equal => html.push_str(&format!("<span>{escaped}</span>")),
		}
	}
	html
}

fn escape_html(text: &str) -> String {
	text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('\n', "\u{b6}<br>")
}

/// Renders an edit script as plain text with `[-deleted-]` and `{+inserted+}` markers,
/// for terminals and logs where HTML isn't appropriate.
pub fn diff_pretty_text(diffs: &[Diff]) -> String {
	let mut out = String::new();
	for d in diffs {
		match d.op {
			Op::Insert => out.push_str(&format!("{{+{}+}}", d.text)),
			Op::Delete => out.push_str(&format!("[-{}-]", d.text)),
			Op::Equal => out.push_str(&d.text),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Vec<Diff> {
		vec![Diff::equal("jump"), Diff::delete("s"), Diff::insert("ed"), Diff::equal(" over")]
	}

	#[test]
	fn test_text1_text2() {
		let diffs = sample();
		assert_eq!(diff_text1(&diffs), "jumps over");
		assert_eq!(diff_text2(&diffs), "jumped over");
	}

	#[test]
	fn test_levenshtein() {
		assert_eq!(diff_levenshtein(&sample()), 2);
		assert_eq!(diff_levenshtein(&[Diff::equal("abc")]), 0);
	}

	#[test]
	fn test_x_index() {
		let diffs = vec![Diff::delete("a"), Diff::insert("1234"), Diff::equal("xyz")];
		assert_eq!(diff_x_index(&diffs, 2), 5);
	}

	#[test]
	fn test_x_index_deletion() {
		let diffs = vec![Diff::equal("a"), Diff::delete("1234"), Diff::equal("xyz")];
		assert_eq!(diff_x_index(&diffs, 3), 1);
	}

	#[test]
	fn test_pretty_html_escapes_and_marks_newlines() {
		let diffs = vec![Diff::equal("a\n"), Diff::delete("<b>"), Diff::insert("&c")];
		let html = diff_pretty_html(&diffs);
		assert_eq!(
			html,
			"<span>a\u{b6}<br></span><del style=\"background:#ffe6e6;\">&lt;b&gt;</del><ins style=\"background:#e6ffe6;\">&amp;c</ins>"
		);
	}

	#[test]
	fn test_pretty_text_markers() {
		assert_eq!(diff_pretty_text(&sample()), "jump[-s-]{+ed+} over");
	}
}
