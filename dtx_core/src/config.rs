use std::path::Path;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::DtxError;
use crate::DtxResult;
use crate::Group;
use crate::assemble::THEME_GROUP;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["dtx.toml", ".dtx.toml", ".config/dtx.toml"];

/// Default path of the design tool export, relative to the project root.
pub const DEFAULT_SOURCE: &str = "figma.tokens.json";

/// Default identity of the component source.
pub const DEFAULT_COMPONENTS_FILE: &str = "packages/ui/tokens/components.tokens.json";

/// Theme entry for a `[themes]` key.
///
/// The short form names the theme group of the export and derives the
/// source identity from the key:
///
/// ```toml
/// [themes]
/// default = "Theme"
/// ```
///
/// The typed form sets the identity explicitly:
///
/// ```toml
/// [themes.brand-2]
/// group = "Brand #2"
/// file = "packages/themes/brand-2/tokens/theme.tokens.json"
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum ThemeConfig {
	Group(String),
	Typed(TypedThemeConfig),
}

impl ThemeConfig {
	/// Name of the theme group in the export.
	pub fn group(&self) -> &str {
		match self {
			Self::Group(group) => group,
			Self::Typed(typed) => &typed.group,
		}
	}

	/// Identity the assembled theme source is published under.
	pub fn file(&self, key: &str) -> String {
		match self {
			Self::Typed(TypedThemeConfig {
				file: Some(file), ..
			}) => file.clone(),
			_ => format!("packages/themes/{key}/tokens/theme.tokens.json"),
		}
	}
}

/// Typed theme configuration for `[themes]` entries.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct TypedThemeConfig {
	pub group: String,
	#[serde(default)]
	pub file: Option<String>,
}

/// Configuration of the component source.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct ComponentsConfig {
	/// Identity the assembled component source is published under.
	#[serde(default = "default_components_file")]
	pub file: String,
}

impl Default for ComponentsConfig {
	fn default() -> Self {
		Self {
			file: default_components_file(),
		}
	}
}

/// Options handed to a format backend.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct FormatOptions {
	/// Selector wrapping custom property declarations. Defaults to `:root`.
	#[serde(default)]
	pub selector: Option<String>,
	/// Emit references as `var(--name)` instead of the raw `{path}` text.
	#[serde(default)]
	pub output_references: bool,
	/// Prefix CSS output with a "generated file" banner.
	#[serde(default = "default_true")]
	pub file_header: bool,
}

impl Default for FormatOptions {
	fn default() -> Self {
		Self {
			selector: None,
			output_references: false,
			file_header: true,
		}
	}
}

/// One generated file of a platform.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct FileConfig {
	/// Output path relative to the project root.
	pub destination: PathBuf,
	/// Registered format name, e.g. `css/variables`.
	pub format: String,
	/// Glob over source identities. When absent every source is used.
	#[serde(default)]
	pub filter: Option<String>,
}

/// A named transform chain and the files rendered from it.
#[derive(Debug, Clone, Default, Deserialize, Eq, PartialEq)]
pub struct PlatformConfig {
	/// Registered transform names applied in order.
	#[serde(default)]
	pub transforms: Vec<String>,
	#[serde(default)]
	pub options: FormatOptions,
	#[serde(default)]
	pub files: Vec<FileConfig>,
}

/// Configuration loaded from a `dtx.toml` file.
///
/// ```toml
/// source = "figma.tokens.json"
/// write_sources = true
///
/// [themes]
/// default = "Theme"
///
/// [components]
/// file = "packages/ui/tokens/components.tokens.json"
///
/// [platforms.theme]
/// transforms = ["name/kebab", "font-family/css", "shadow/css"]
/// options = { selector = "@theme", output_references = true }
/// files = [
///   { destination = "theme.generated.css", format = "css/variables", filter = "packages/themes/**" },
/// ]
/// ```
///
/// Every section is optional. Without `[platforms]` the theme stylesheets,
/// component stylesheet and class-merge config are generated at their
/// conventional locations.
#[derive(Debug, Clone, Deserialize)]
pub struct DtxConfig {
	/// Path of the design tool export, relative to the project root.
	#[serde(default = "default_source")]
	pub source: PathBuf,
	/// Also write every assembled source as JSON to its identity path.
	#[serde(default)]
	pub write_sources: bool,
	/// Theme key to theme group of the export.
	#[serde(default = "default_themes")]
	pub themes: IndexMap<String, ThemeConfig>,
	#[serde(default)]
	pub components: ComponentsConfig,
	/// Platform name to transform chain and files. Processed in order.
	#[serde(default)]
	pub platforms: IndexMap<String, PlatformConfig>,
}

impl Default for DtxConfig {
	fn default() -> Self {
		let mut config = Self {
			source: default_source(),
			write_sources: false,
			themes: default_themes(),
			components: ComponentsConfig::default(),
			platforms: IndexMap::new(),
		};
		config.platforms = config.default_platforms();
		config
	}
}

impl DtxConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> DtxResult<Option<DtxConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		Self::from_toml_str(&content).map(Some)
	}

	/// Load the discovered config, or the defaults when there is none.
	pub fn load_or_default(root: &Path) -> DtxResult<DtxConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Parse a config document, filling in the default platforms when none
	/// are configured.
	pub fn from_toml_str(content: &str) -> DtxResult<DtxConfig> {
		let mut config: DtxConfig =
			toml::from_str(content).map_err(|e| DtxError::ConfigParse(e.to_string()))?;

		if config.platforms.is_empty() {
			config.platforms = config.default_platforms();
		}

		Ok(config)
	}

	/// Identities of the configured theme sources, in order.
	pub fn theme_files(&self) -> Vec<String> {
		self.themes
			.iter()
			.map(|(key, theme)| theme.file(key))
			.collect()
	}

	/// The conventional platform set: one stylesheet per theme, the
	/// component stylesheet, and the class-merge config built from the first
	/// theme. Source identities are escaped so they match literally.
	pub fn default_platforms(&self) -> IndexMap<String, PlatformConfig> {
		let mut platforms = IndexMap::new();

		for (key, theme) in &self.themes {
			platforms.insert(
				format!("theme/{key}"),
				PlatformConfig {
					transforms: vec![
						"name/kebab".to_string(),
						"font-family/css".to_string(),
						"shadow/css".to_string(),
					],
					options: FormatOptions {
						selector: Some("@theme".to_string()),
						output_references: true,
						file_header: true,
					},
					files: vec![FileConfig {
						destination: PathBuf::from(format!(
							"packages/themes/{key}/theme.generated.css"
						)),
						format: "css/variables".to_string(),
						filter: Some(globset::escape(&theme.file(key))),
					}],
				},
			);
		}

		platforms.insert(
			"components".to_string(),
			PlatformConfig {
				transforms: vec!["name/kebab".to_string(), "font-family/css".to_string()],
				options: FormatOptions::default(),
				files: vec![FileConfig {
					destination: PathBuf::from("packages/ui/components.generated.css"),
					format: "css/components".to_string(),
					filter: Some(globset::escape(&self.components.file)),
				}],
			},
		);

		if let Some(primary) = self.theme_files().into_iter().next() {
			platforms.insert(
				"class-merge".to_string(),
				PlatformConfig {
					transforms: vec!["name/kebab".to_string()],
					options: FormatOptions::default(),
					files: vec![FileConfig {
						destination: PathBuf::from("packages/ui/src/tailwind-merge-config.json"),
						format: "json/class-merge".to_string(),
						filter: Some(globset::escape(&primary)),
					}],
				},
			);
		}

		platforms
	}

	/// Read the design tool export and classify it into a token tree.
	pub fn load_source(&self, root: &Path) -> DtxResult<Group> {
		let path_display = self.source.display().to_string();
		let content =
			std::fs::read_to_string(root.join(&self.source)).map_err(|e| {
				DtxError::SourceParse {
					path: path_display.clone(),
					reason: e.to_string(),
				}
			})?;

		parse_source(&content, &path_display)
	}
}

/// Parse export JSON into a token tree.
pub fn parse_source(content: &str, path_display: &str) -> DtxResult<Group> {
	let document: serde_json::Value =
		serde_json::from_str(content).map_err(|e| DtxError::SourceParse {
			path: path_display.to_string(),
			reason: e.to_string(),
		})?;

	Group::from_json(&document)
}

fn default_source() -> PathBuf {
	PathBuf::from(DEFAULT_SOURCE)
}

fn default_components_file() -> String {
	DEFAULT_COMPONENTS_FILE.to_string()
}

fn default_themes() -> IndexMap<String, ThemeConfig> {
	IndexMap::from([(
		"default".to_string(),
		ThemeConfig::Group(THEME_GROUP.to_string()),
	)])
}

fn default_true() -> bool {
	true
}
