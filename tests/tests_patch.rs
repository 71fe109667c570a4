//! Integration tests for the patch builder, applier and text codec working together.

use dmpx::{patch_from_text, patch_to_text, DiffMatchPatch};

type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

#[test]
fn test_patch_round_trip_through_text_codec() -> Result<()> {
	// -- Setup & Fixtures
	let dmp = DiffMatchPatch::new();
	let text1 = "The quick brown fox jumps over the lazy dog.";
	let text2 = "That quick brown fox jumped over a lazy dog.";

	// -- Exec
	let patches = dmp.patch_make_from_texts(text1, text2);
	let serialized = patch_to_text(&patches);
	let parsed = patch_from_text(&serialized)?;

	// -- Check
	assert_eq!(patches, parsed, "patch_from_text(patch_to_text(p)) should recover p exactly");

	Ok(())
}

#[test]
fn test_patch_apply_end_to_end() -> Result<()> {
	// -- Setup & Fixtures
	let dmp = DiffMatchPatch::new();
	let text1 = "The quick brown fox jumps over the lazy dog.";
	let text2 = "That quick brown fox jumped over a lazy dog.";

	// -- Exec
	let patches = dmp.patch_make_from_texts(text1, text2);
	let (patched, oks) = dmp.patch_apply(&patches, text1);

	// -- Check
	assert_eq!(patched, text2, "applying a patch to its own source should recover the target");
	assert!(oks.iter().all(|&ok| ok), "every hunk should apply cleanly against its own source text");

	Ok(())
}

#[test]
fn test_patch_apply_is_resilient_to_surrounding_drift() -> Result<()> {
	// -- Setup & Fixtures
	let dmp = DiffMatchPatch::new();
	let text1 = "The quick brown fox jumps over the lazy dog.";
	let text2 = "That quick brown fox jumped over a lazy dog.";
	let patches = dmp.patch_make_from_texts(text1, text2);
	let drifted = format!("A preamble paragraph goes here.\n\n{text1}\n\nAnd a trailing paragraph too.");

	// -- Exec
	let (patched, oks) = dmp.patch_apply(&patches, &drifted);

	// -- Check
	assert!(oks.iter().all(|&ok| ok), "hunks should still locate themselves despite surrounding drift");
	assert!(patched.contains(text2), "patched output should contain the updated sentence");
	assert!(patched.starts_with("A preamble paragraph"), "unrelated prefix should survive untouched");

	Ok(())
}
