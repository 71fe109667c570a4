//! Integration tests for the diff engine's public surface.

use dmpx::{diff_text1, diff_text2, DiffMatchPatch};

type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

#[test]
fn test_diff_main_roundtrips_arbitrary_texts() -> Result<()> {
	// -- Setup & Fixtures
	let dmp = DiffMatchPatch::new();
	let pairs = [
		("", ""),
		("abc", ""),
		("", "abc"),
		("The quick brown fox", "The slow brown fox"),
		("line one\nline two\nline three\n", "line one\nline TWO\nline three\n"),
	];

	// -- Exec & Check
	for (t1, t2) in pairs {
		let diffs = dmp.diff_main(t1, t2, true);
		assert_eq!(diff_text1(&diffs), t1, "text1 mismatch for {t1:?}/{t2:?}");
		assert_eq!(diff_text2(&diffs), t2, "text2 mismatch for {t1:?}/{t2:?}");
	}

	Ok(())
}

#[test]
fn test_diff_delta_round_trip() -> Result<()> {
	// -- Setup & Fixtures
	let dmp = DiffMatchPatch::new();
	let t1 = "jumps over the lazy";
	let t2 = "jumped over a lazy";

	// -- Exec
	let diffs = dmp.diff_main(t1, t2, false);
	let delta = dmpx::diff_to_delta(&diffs);
	let decoded = dmpx::diff_from_delta(t1, &delta)?;

	// -- Check
	assert_eq!(diff_text2(&decoded), t2, "delta round trip should recover text2");

	Ok(())
}

#[test]
fn test_diff_main_honors_short_deadline() -> Result<()> {
	// -- Setup & Fixtures
	let mut dmp = DiffMatchPatch::new();
	dmp.diff_timeout = 0.0; // never expires, but also disables half-match; cheap sanity check
	let big1 = "abcdefghij".repeat(500);
	let big2 = "abcdefghik".repeat(500);

	// -- Exec
	let diffs = dmp.diff_main(&big1, &big2, true);

	// -- Check
	assert_eq!(diff_text1(&diffs), big1);
	assert_eq!(diff_text2(&diffs), big2);

	Ok(())
}
