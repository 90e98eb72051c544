use serde_json::Value;
use serde_json::json;

use crate::Group;

/// A trimmed down design tool export with every namespace the assemblers
/// read.
pub(crate) fn export_json() -> Value {
	json!({
		"Theme": {
			"Background": {
				"Surface": {
					"$type": "color",
					"$value": "{Color Primitives.White}",
					"$extensions": {
						"mode": {
							"Light": "{Color Primitives.White}",
							"Dark": "{Color Primitives.Gray.900}"
						}
					}
				},
				"Utilities": {
					"Overlay": { "$type": "color", "$value": "#00000080" }
				}
			},
			"Text": {
				"Primary": { "$type": "color", "$value": "{Color Primitives.Gray.900}" }
			},
			"Icon": {
				"Default": { "$type": "color", "$value": "{Color Primitives.Gray.900}" }
			},
			"Border": {
				"Focus": {
					"$type": "color",
					"$value": "{Color Primitives.Blue.500}",
					"$description": "Focus ring"
				}
			},
			"Heading": {
				"Font Family": {
					"$type": "string",
					"$value": "{Typography Primitives.Family.Family Sans}"
				},
				"Font Size": {
					"$type": "dimension",
					"$value": "{Typography Primitives.Scale.Scale 24}"
				},
				"Font Size Large": { "$type": "dimension", "$value": "32px" },
				"Font Weight": {
					"$type": "number",
					"$value": "{Typography Primitives.Weight.Weight Bold}"
				},
				"Letter Spacing": { "$type": "dimension", "$value": "-0.5px" },
				"Line Height": { "$type": "dimension", "$value": "40px" }
			}
		},
		"Color Primitives": {
			"White": { "$type": "color", "$value": "#ffffff" },
			"Black": { "$type": "color", "$value": "#000000" },
			"Gray": {
				"900": { "$type": "color", "$value": "#111827" }
			},
			"Blue": {
				"500": { "$type": "color", "$value": "#3b82f6" }
			}
		},
		"Typography Primitives": {
			"Family": {
				"Family Sans": { "$type": "string", "$value": "Inter Variable" },
				"Family Mono": { "$type": "string", "$value": "JetBrains Mono" }
			},
			"Weight": {
				"Weight Regular": { "$type": "number", "$value": 400 },
				"Weight Bold": { "$type": "number", "$value": 700 },
				"Weight Bold Italic": { "$type": "number", "$value": 700 }
			},
			"Scale": {
				"Scale 16": { "$type": "dimension", "$value": "16px" },
				"Scale 24": { "$type": "dimension", "$value": "24px" }
			}
		},
		"Typography-styles": {
			"Heading": {
				"Large": {
					"$type": "typography",
					"$value": {
						"fontFamily": "{Theme.Heading.Font Family}",
						"fontSize": "{Theme.Heading.Font Size Large}",
						"lineHeight": "{Theme.Heading.Line Height}",
						"fontWeight": "{Theme.Heading.Font Weight}",
						"letterSpacing": "0.5px",
						"textCase": "UPPER",
						"fontStyle": "normal",
						"textDecoration": "NONE"
					}
				}
			},
			"Body": {
				"$type": "typography",
				"$value": {
					"fontFamily": "Inter Display",
					"fontSize": "16px",
					"textCase": "ORIGINAL"
				}
			},
			".Utilities": {
				"Truncate": {
					"$type": "typography",
					"$value": { "textDecoration": "UNDERLINE" }
				}
			}
		},
		"Effect-styles": {
			"Drop Shadow": {
				"Small": {
					"$type": "shadow",
					"$value": [
						{ "offsetX": "0", "offsetY": "2px", "blur": "4px", "spread": 0, "color": "#000" },
						{ "inset": true, "offsetX": "0", "offsetY": "0", "blur": "0", "color": "#fff" }
					]
				}
			},
			"Inner Shadow": {
				"Small": {
					"$type": "shadow",
					"$value": {
						"inset": true,
						"offsetX": "0",
						"offsetY": "1px",
						"blur": "2px",
						"color": "{Color Primitives.Black}"
					}
				}
			}
		},
		"Size": {
			"Space": {
				"1": { "$type": "dimension", "$value": "4px" },
				"2": {
					"$type": "dimension",
					"$value": "8px",
					"$extensions": {
						"mode": { "Base": "8px", "Compact": "4px", "Comfortable": "12px" }
					}
				}
			},
			"Depth": {
				"1": { "$type": "dimension", "$value": "{Size.Space.1}" }
			},
			"Icon": {
				"Small": { "$type": "dimension", "$value": "16px" }
			},
			"Radius": {
				"Small": { "$type": "dimension", "$value": "4px" },
				"Full": { "$type": "dimension", "$value": "9999px" }
			},
			"Blur": {
				"Small": { "$type": "dimension", "$value": "4px" }
			},
			"Stroke": {
				"Border": { "$type": "dimension", "$value": "1px" },
				"Focus Ring": { "$type": "dimension", "$value": "2px" }
			}
		}
	})
}

pub(crate) fn export_tree() -> Group {
	Group::from_json(&export_json()).unwrap_or_else(|e| panic!("invalid fixture: {e}"))
}

/// Remove the entry at `path` from an export document.
pub(crate) fn without(mut document: Value, path: &[&str]) -> Value {
	let (last, parents) = path.split_last().unwrap_or_else(|| panic!("empty path"));
	let mut current = &mut document;

	for segment in parents {
		current = current
			.get_mut(*segment)
			.unwrap_or_else(|| panic!("missing fixture segment `{segment}`"));
	}

	if let Some(object) = current.as_object_mut() {
		object.remove(*last);
	}

	document
}
