//! Diff, match and patch: Myers bisection diffing, bitap fuzzy matching, and
//! drift-tolerant patch application, operating on Unicode scalar values.

// region:    --- Modules

mod diff;
mod error;
mod facade;
mod matcher;
mod patch;

pub use diff::{
	cleanup_efficiency, cleanup_merge, cleanup_semantic, cleanup_semantic_lossless, common_overlap, common_prefix,
	common_suffix, diff_from_delta, diff_levenshtein, diff_pretty_html, diff_pretty_text, diff_text1, diff_text2,
	diff_to_delta, diff_x_index, Diff, Op,
};
pub use error::{Error, Result};
pub use facade::DiffMatchPatch;
pub use patch::{patch_deep_copy, patch_from_text, patch_to_text, Patch};

// endregion: --- Modules
