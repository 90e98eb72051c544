use std::path::Path;
use std::path::PathBuf;

use globset::GlobBuilder;
use globset::GlobMatcher;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::DtxConfig;
use crate::DtxError;
use crate::DtxResult;
use crate::FileConfig;
use crate::Group;
use crate::PlatformConfig;
use crate::Registry;
use crate::assemble::Source;
use crate::assemble::assemble_sources;
use crate::references::ReferenceWarning;
use crate::references::unrecognized_references;
use crate::registry::FlatToken;

/// A generated file that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
	/// Platform that produced the file, or `sources` for intermediate token
	/// files.
	pub platform: String,
	/// Destination relative to the project root.
	pub path: PathBuf,
	/// Complete file content.
	pub content: String,
}

/// Everything one run of the pipeline produced.
#[derive(Debug, Clone)]
pub struct BuildResult {
	/// The assembled and prepared sources, in configuration order.
	pub sources: Vec<Source>,
	/// Generated files in platform order.
	pub outputs: Vec<Output>,
	/// References that no rewrite rule recognized.
	pub warnings: Vec<ReferenceWarning>,
}

impl BuildResult {
	pub fn has_warnings(&self) -> bool {
		!self.warnings.is_empty()
	}
}

/// Result of comparing generated outputs with the files on disk.
#[derive(Debug, Default)]
pub struct CheckResult {
	/// Outputs whose file is missing or differs.
	pub stale: Vec<StaleEntry>,
}

impl CheckResult {
	/// Returns true if every output is up to date.
	pub fn is_ok(&self) -> bool {
		self.stale.is_empty()
	}
}

/// A destination that is missing or out of date.
#[derive(Debug)]
pub struct StaleEntry {
	/// Destination relative to the project root.
	pub path: PathBuf,
	/// The current file content, `None` when the file does not exist.
	pub current: Option<String>,
	/// The content a build would write.
	pub expected: String,
}

/// Platform name used for intermediate token files.
pub const SOURCES_PLATFORM: &str = "sources";

/// The token pipeline: assembles sources from the export and renders every
/// configured platform through the registry.
#[derive(Debug, Clone)]
pub struct Pipeline {
	config: DtxConfig,
	registry: Registry,
}

impl Pipeline {
	/// Create a pipeline, rejecting unknown transform names, unknown format
	/// names and invalid filters before anything is generated.
	pub fn new(config: DtxConfig, registry: Registry) -> DtxResult<Self> {
		let pipeline = Self { config, registry };
		pipeline.validate()?;
		Ok(pipeline)
	}

	pub fn config(&self) -> &DtxConfig {
		&self.config
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Check every name and filter the configuration refers to.
	pub fn validate(&self) -> DtxResult<()> {
		for (name, platform) in &self.config.platforms {
			for transform in &platform.transforms {
				self.registry.transform(transform)?;
			}

			for file in &platform.files {
				self.registry.format(&file.format)?;
				if let Some(pattern) = &file.filter {
					source_filter(pattern)?;
				}
			}

			debug!(
				platform = name.as_str(),
				transforms = platform.transforms.len(),
				files = platform.files.len(),
				"validated platform"
			);
		}

		Ok(())
	}

	/// Read the export below `root` and produce every output.
	pub fn build(&self, root: &Path) -> DtxResult<BuildResult> {
		let tree = self.config.load_source(root)?;
		self.build_tree(&tree)
	}

	/// Produce every output from an already parsed export.
	pub fn build_tree(&self, tree: &Group) -> DtxResult<BuildResult> {
		let sources = assemble_sources(tree, &self.config)?;

		let mut warnings = Vec::new();
		for source in &sources {
			for warning in unrecognized_references(&source.id, &source.tokens) {
				warn!(
					source = warning.source.as_str(),
					token = %warning.path.join("."),
					reference = warning.reference.as_str(),
					"reference does not match a known namespace and was left unchanged"
				);
				warnings.push(warning);
			}
		}

		let mut outputs = Vec::new();

		if self.config.write_sources {
			for source in &sources {
				outputs.push(source_output(source)?);
			}
		}

		for (name, platform) in &self.config.platforms {
			for file in &platform.files {
				outputs.push(self.render_file(name, platform, file, &sources)?);
			}
		}

		Ok(BuildResult {
			sources,
			outputs,
			warnings,
		})
	}

	fn render_file(
		&self,
		name: &str,
		platform: &PlatformConfig,
		file: &FileConfig,
		sources: &[Source],
	) -> DtxResult<Output> {
		let filter = file.filter.as_deref().map(source_filter).transpose()?;
		let transforms = platform
			.transforms
			.iter()
			.map(|transform| self.registry.transform(transform))
			.collect::<DtxResult<Vec<_>>>()?;
		let format = self.registry.format(&file.format)?;

		let mut tokens = Vec::new();

		for source in sources {
			if filter
				.as_ref()
				.is_some_and(|filter| !filter.is_match(&source.id))
			{
				continue;
			}

			for (path, token) in source.tokens.flatten() {
				let mut flat = FlatToken::new(&source.id, path, token);
				for transform in &transforms {
					transform(&mut flat);
				}
				tokens.push(flat);
			}
		}

		debug!(
			platform = name,
			destination = %file.destination.display(),
			format = file.format.as_str(),
			tokens = tokens.len(),
			"rendering destination"
		);

		Ok(Output {
			platform: name.to_string(),
			path: file.destination.clone(),
			content: format(&tokens, &platform.options)?,
		})
	}
}

/// Compile a source filter. Literal identities match exactly; `*` stays
/// within a path segment and `**` crosses segments.
pub fn source_filter(pattern: &str) -> DtxResult<GlobMatcher> {
	let glob = GlobBuilder::new(pattern)
		.literal_separator(true)
		.build()
		.map_err(|e| {
			DtxError::InvalidFilter {
				pattern: pattern.to_string(),
				reason: e.to_string(),
			}
		})?;

	Ok(glob.compile_matcher())
}

fn source_output(source: &Source) -> DtxResult<Output> {
	let json = serde_json::to_string_pretty(&source.tokens.to_json()).map_err(|e| {
		DtxError::FormatRender {
			format: SOURCES_PLATFORM.to_string(),
			reason: e.to_string(),
		}
	})?;

	Ok(Output {
		platform: SOURCES_PLATFORM.to_string(),
		path: PathBuf::from(&source.id),
		content: json + "\n",
	})
}

/// Write every output below `root`, creating parent directories. The first
/// failure aborts; files written before it stay on disk.
pub fn write_outputs(root: &Path, outputs: &[Output]) -> DtxResult<()> {
	for output in outputs {
		let path = root.join(&output.path);
		let write_error = |e: std::io::Error| {
			DtxError::DestinationWrite {
				path: output.path.display().to_string(),
				reason: e.to_string(),
			}
		};

		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent).map_err(write_error)?;
		}

		std::fs::write(&path, &output.content).map_err(write_error)?;
		info!(
			platform = output.platform.as_str(),
			destination = %output.path.display(),
			"wrote output"
		);
	}

	Ok(())
}

/// Compare every output with the file at its destination below `root`.
pub fn check_outputs(root: &Path, outputs: &[Output]) -> DtxResult<CheckResult> {
	let mut result = CheckResult::default();

	for output in outputs {
		let path = root.join(&output.path);
		let current = if path.is_file() {
			Some(std::fs::read_to_string(&path)?)
		} else {
			None
		};

		if current.as_deref() == Some(output.content.as_str()) {
			continue;
		}

		result.stale.push(StaleEntry {
			path: output.path.clone(),
			current,
			expected: output.content.clone(),
		});
	}

	Ok(result)
}
