#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use dtx_core::AnyEmptyResult;

pub fn dtx_cmd() -> Command {
	let mut cmd = Command::cargo_bin("dtx").unwrap_or_else(|e| panic!("missing dtx binary: {e}"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// A minimal export containing every namespace the assemblers read.
pub const EXPORT: &str = r##"{
	"Theme": {
		"Background": {
			"Surface": {
				"$type": "color",
				"$value": "{Color Primitives.White}",
				"$extensions": {
					"mode": { "Light": "{Color Primitives.White}", "Dark": "{Color Primitives.Black}" }
				}
			}
		},
		"Text": { "Primary": { "$type": "color", "$value": "{Color Primitives.Black}" } },
		"Icon": { "Default": { "$type": "color", "$value": "{Color Primitives.Black}" } },
		"Border": { "Focus": { "$type": "color", "$value": "{Color Primitives.Black}" } },
		"Heading": {
			"Font Size": { "$type": "dimension", "$value": "24px" },
			"Line Height": { "$type": "dimension", "$value": "32px" }
		}
	},
	"Color Primitives": {
		"White": { "$type": "color", "$value": "#ffffff" },
		"Black": { "$type": "color", "$value": "#000000" }
	},
	"Typography Primitives": {
		"Family": { "Family Sans": { "$type": "string", "$value": "Inter Variable" } },
		"Weight": { "Weight Bold": { "$type": "number", "$value": 700 } },
		"Scale": { "Scale 16": { "$type": "dimension", "$value": "16px" } }
	},
	"Typography-styles": {
		"Heading": {
			"$type": "typography",
			"$value": {
				"fontSize": "{Theme.Heading.Font Size}",
				"lineHeight": "{Theme.Heading.Line Height}",
				"textCase": "UPPER"
			}
		}
	},
	"Effect-styles": {
		"Drop Shadow": {
			"Small": {
				"$type": "shadow",
				"$value": { "offsetX": "0", "offsetY": "1px", "blur": "2px", "color": "#000" }
			}
		},
		"Inner Shadow": {
			"Small": {
				"$type": "shadow",
				"$value": { "inset": true, "offsetY": "1px", "color": "#000" }
			}
		}
	},
	"Size": {
		"Space": { "1": { "$type": "dimension", "$value": "4px" } },
		"Depth": { "1": { "$type": "dimension", "$value": "{Size.Space.1}" } },
		"Icon": { "Small": { "$type": "dimension", "$value": "16px" } },
		"Radius": { "Small": { "$type": "dimension", "$value": "4px" } },
		"Blur": { "Small": { "$type": "dimension", "$value": "4px" } },
		"Stroke": {
			"Border": { "$type": "dimension", "$value": "1px" },
			"Focus Ring": { "$type": "dimension", "$value": "2px" }
		}
	}
}
"##;

/// Write the export to the default source location under `root`.
pub fn write_export(root: &Path) -> AnyEmptyResult {
	std::fs::write(root.join("figma.tokens.json"), EXPORT)?;
	Ok(())
}

/// Create a temporary project containing only the export.
pub fn project() -> tempfile::TempDir {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create tempdir: {e}"));
	write_export(tmp.path()).unwrap_or_else(|e| panic!("failed to write export: {e}"));
	tmp
}

/// Paths written by a build with the default configuration.
pub const DEFAULT_OUTPUTS: [&str; 3] = [
	"packages/themes/default/theme.generated.css",
	"packages/ui/components.generated.css",
	"packages/ui/src/tailwind-merge-config.json",
];
