//! Facade and tunable configuration (C12).
//!
//! [`DiffMatchPatch`] carries every knob described in the data model and is the single
//! entry point applications hold onto; the algorithms themselves live as free functions
//! or inherent methods split across [`crate::diff`], [`crate::matcher`] and [`crate::patch`].

/// Tunables for the diff, match and patch algorithms, plus the entry point for every
/// public operation.
///
/// Cloning is cheap (all fields are `Copy`); there is no interior state, so a single
/// instance can be shared across threads behind a `&` or reused per-call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffMatchPatch {
	/// Seconds a diff is allowed to run before falling back to a result that may be
	/// less than optimal. `0.0` (or negative) disables the deadline entirely.
	pub diff_timeout: f64,
	/// Cost of an edit operation in terms of equivalent characters, used by
	/// [`crate::diff::cleanup_efficiency`] to decide whether nearby edits are worth merging.
	pub diff_edit_cost: u32,
	/// At what point is no match declared (`0.0` = perfection required, `1.0` = anything matches).
	pub match_threshold: f64,
	/// How far to search for a match (`0` = exact location required).
	pub match_distance: u32,
	/// Number of code units a bitap machine word can hold. The implementation uses a
	/// `u32` bitmask internally, so this is clamped to `32` regardless of configuration.
	pub match_max_bits: u32,
	/// When deleted text in a patch is this close to the edit distance of matched text
	/// (0.0 = perfect match, 1.0 = very loose match), the patch is still applied.
	pub patch_delete_threshold: f64,
	/// Chunk size for the context length a patch keeps around each hunk.
	pub patch_margin: usize,
}

impl Default for DiffMatchPatch {
	fn default() -> Self {
		Self {
			diff_timeout: 1.0,
			diff_edit_cost: 4,
			match_threshold: 0.5,
			match_distance: 1000,
			match_max_bits: 32,
			patch_delete_threshold: 0.5,
			patch_margin: 4,
		}
	}
}

impl DiffMatchPatch {
	pub fn new() -> Self {
		Self::default()
	}

	/// The bitap machine word width actually used, independent of `match_max_bits`.
	pub(crate) fn bitap_bits(&self) -> u32 {
		self.match_max_bits.min(32)
	}
}
