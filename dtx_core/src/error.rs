use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DtxError {
	#[error(transparent)]
	#[diagnostic(code(dtx::io_error))]
	Io(#[from] std::io::Error),

	#[error("malformed token source at `{path}`: {reason}")]
	#[diagnostic(
		code(dtx::malformed_source),
		help("check that the design tool export still contains the expected namespaces")
	)]
	MalformedSource { path: String, reason: String },

	#[error("failed to parse token source `{path}`: {reason}")]
	#[diagnostic(code(dtx::source_parse))]
	SourceParse { path: String, reason: String },

	#[error("unknown transform: `{0}`")]
	#[diagnostic(
		code(dtx::unknown_transform),
		help("built-in transforms: name/kebab, font-family/css, shadow/css, size/px-to-rem")
	)]
	UnknownTransform(String),

	#[error("unknown format: `{0}`")]
	#[diagnostic(
		code(dtx::unknown_format),
		help("built-in formats: css/variables, css/components, json/class-merge")
	)]
	UnknownFormat(String),

	#[error("failed to write destination `{path}`: {reason}")]
	#[diagnostic(code(dtx::destination_write))]
	DestinationWrite { path: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(dtx::config_parse),
		help("check that dtx.toml is valid TOML with [themes] and/or [platforms] sections")
	)]
	ConfigParse(String),

	#[error("invalid source filter `{pattern}`: {reason}")]
	#[diagnostic(code(dtx::invalid_filter))]
	InvalidFilter { pattern: String, reason: String },

	#[error("failed to render format `{format}`: {reason}")]
	#[diagnostic(code(dtx::format_render))]
	FormatRender { format: String, reason: String },
}

impl DtxError {
	pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::MalformedSource {
			path: path.into(),
			reason: reason.into(),
		}
	}
}

pub type DtxResult<T> = Result<T, DtxError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
