use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Display, From)]
#[display("{self:?}")]
pub enum Error {
	#[display("{_0}")]
	#[from(String, &String, &str)]
	Custom(String),

	// -- diff_main / core inputs
	#[display("Null input for {op}: a required text, pattern, or location was absent")]
	NullInput { op: String },

	// -- Delta codec (C7)
	#[display("Illegal percent-escape in delta token '{token}'")]
	IllegalEscape { token: String },
	#[display("Invalid (non-numeric or negative) count '{token}' in delta token")]
	InvalidNumber { token: String },
	#[display("Unknown delta op code '{code}'")]
	InvalidOp { code: String },
	#[display("Delta length mismatch: consumed {actual} code units, expected {expected}")]
	LengthMismatch { expected: usize, actual: usize },

	// -- Patch text codec (C11)
	#[display("Invalid patch header: {line}")]
	InvalidPatch { line: String },
	#[display("Invalid patch body line prefix: {line}")]
	InvalidMode { line: String },

	// -- Bitap matcher (C8)
	#[display("Pattern too long ({len} code units) for match_max_bits ({max})")]
	PatternTooLong { len: usize, max: usize },

	// -- Patch builder (C9) polymorphic entry point
	#[display("patch_make called with an unsupported argument combination: {cause}")]
	UnknownCall { cause: String },

	// -- Patch builder (C9) internal invariant
	#[display("{op} invoked on a patch with no start offset set")]
	NotInitialized { op: String },
}

// region:    --- Custom

impl Error {
	pub fn null_input(op: impl Into<String>) -> Self {
		Self::NullInput { op: op.into() }
	}

	pub fn illegal_escape(token: impl Into<String>) -> Self {
		Self::IllegalEscape { token: token.into() }
	}

	pub fn invalid_number(token: impl Into<String>) -> Self {
		Self::InvalidNumber { token: token.into() }
	}

	pub fn invalid_op(code: impl Into<String>) -> Self {
		Self::InvalidOp { code: code.into() }
	}

	pub fn length_mismatch(expected: usize, actual: usize) -> Self {
		Self::LengthMismatch { expected, actual }
	}

	pub fn invalid_patch(line: impl Into<String>) -> Self {
		Self::InvalidPatch { line: line.into() }
	}

	pub fn invalid_mode(line: impl Into<String>) -> Self {
		Self::InvalidMode { line: line.into() }
	}

	pub fn pattern_too_long(len: usize, max: usize) -> Self {
		Self::PatternTooLong { len, max }
	}

	pub fn unknown_call(cause: impl Into<String>) -> Self {
		Self::UnknownCall { cause: cause.into() }
	}

	pub fn not_initialized(op: impl Into<String>) -> Self {
		Self::NotInitialized { op: op.into() }
	}
}

// endregion: --- Custom

// region:    --- Error Boilerplate

impl std::error::Error for Error {}

// endregion: --- Error Boilerplate
