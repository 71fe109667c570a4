//! Integration tests for the bitap fuzzy matcher's public surface.

use dmpx::DiffMatchPatch;

type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

#[test]
fn test_match_main_finds_exact_substring() -> Result<()> {
	// -- Setup & Fixtures
	let dmp = DiffMatchPatch::new();

	// -- Exec
	let loc = dmp.match_main("fly me to the moon", "to the", 0)?;

	// -- Check
	assert_eq!(loc, Some(7), "should find the exact substring location");

	Ok(())
}

#[test]
fn test_match_main_tolerates_typos_near_expected_location() -> Result<()> {
	// -- Setup & Fixtures
	let dmp = DiffMatchPatch::new();
	let text = "I am the very model of a modern major general.";

	// -- Exec
	let loc = dmp.match_main(text, " that berry ", 5)?;

	// -- Check
	assert_eq!(loc, Some(4));

	Ok(())
}

#[test]
fn test_match_main_rejects_pattern_past_bitap_width() -> Result<()> {
	// -- Setup & Fixtures
	let dmp = DiffMatchPatch::new();
	let pattern = "x".repeat(64);

	// -- Exec
	let result = dmp.match_main("some text", &pattern, 0);

	// -- Check
	assert!(result.is_err(), "pattern longer than match_max_bits must error");

	Ok(())
}
