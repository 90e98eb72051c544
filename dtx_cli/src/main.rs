use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use dtx_cli::Commands;
use dtx_cli::DtxCli;
use dtx_cli::OutputFormat;
use dtx_core::CONFIG_FILE_CANDIDATES;
use dtx_core::CheckResult;
use dtx_core::DtxConfig;
use dtx_core::Output;
use dtx_core::Pipeline;
use dtx_core::ReferenceWarning;
use dtx_core::Registry;
use dtx_core::check_outputs;
use dtx_core::write_outputs;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
	let args = DtxCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_logging(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Build { dry_run, watch }) => run_build(&args, dry_run, watch),
		Some(Commands::Check {
			diff,
			format,
			watch,
		}) => run_check(&args, diff, format, watch),
		Some(Commands::List) => run_list(&args),
		None => {
			eprintln!("No subcommand specified. Run `dtx --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		report_error(e);
		process::exit(2);
	}
}

/// Library events go to stderr. `RUST_LOG` takes precedence over the
/// defaults picked from `--verbose`.
fn init_logging(verbose: bool, use_color: bool) {
	let default_directive = if verbose {
		"dtx_core=debug"
	} else {
		"dtx_core=error"
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init()
		.ok();
}

fn resolve_root(args: &DtxCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_init(args: &DtxCli) -> CliResult<()> {
	let root = resolve_root(args);

	if let Some(existing) = DtxConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	let sample_config = "# dtx configuration\n\n# Path of the design tool export, relative to \
	                     the project root.\nsource = \"figma.tokens.json\"\n\n# Also write every \
	                     assembled token source as JSON.\n# write_sources = false\n\n# Theme key \
	                     to theme group of the export. Each theme is generated into\n# \
	                     packages/themes/<key>/theme.generated.css.\n[themes]\ndefault = \
	                     \"Theme\"\n\n# [components]\n# file = \
	                     \"packages/ui/tokens/components.tokens.json\"\n\n# Without [platforms] \
	                     the theme stylesheets, component stylesheet and\n# class-merge config \
	                     are generated at their conventional locations.\n# \
	                     [platforms.theme]\n# transforms = [\"name/kebab\", \"font-family/css\", \
	                     \"shadow/css\"]\n# options = { selector = \"@theme\", output_references \
	                     = true }\n# files = [{ destination = \"theme.css\", format = \
	                     \"css/variables\", filter = \"packages/themes/**\" }]\n";

	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Export your tokens from the design tool to figma.tokens.json");
	println!("  2. Run `dtx build` to generate the stylesheets");
	println!("  3. Run `dtx check` in CI to keep them up to date");

	Ok(())
}

fn load_pipeline(args: &DtxCli, root: &Path) -> CliResult<Pipeline> {
	let config = DtxConfig::load_or_default(root)?;

	if args.verbose {
		match DtxConfig::resolve_path(root) {
			Some(path) => println!("Using config: {}", make_relative(&path, root)),
			None => println!("Using default configuration"),
		}
	}

	Ok(Pipeline::new(config, Registry::builtin())?)
}

/// Render every output in memory and report unrecognized references.
fn render(args: &DtxCli, root: &Path) -> CliResult<Vec<Output>> {
	let pipeline = load_pipeline(args, root)?;
	let result = pipeline.build(root)?;

	print_reference_warnings(&result.warnings);

	if args.verbose {
		println!(
			"Assembled {} source(s), rendered {} output(s)",
			result.sources.len(),
			result.outputs.len()
		);
	}

	Ok(result.outputs)
}

fn run_build(args: &DtxCli, dry_run: bool, watch: bool) -> CliResult<()> {
	// Run the initial build.
	run_build_once(args, dry_run)?;

	if !watch || dry_run {
		return Ok(());
	}

	watch_sources(args, "building", || run_build_once(args, false))
}

fn run_build_once(args: &DtxCli, dry_run: bool) -> CliResult<()> {
	let root = resolve_root(args);
	let outputs = render(args, &root)?;
	let check = check_outputs(&root, &outputs)?;

	if check.is_ok() {
		println!("All outputs are already up to date.");
		return Ok(());
	}

	let changed: Vec<Output> = outputs
		.into_iter()
		.filter(|output| check.stale.iter().any(|entry| entry.path == output.path))
		.collect();

	if dry_run {
		println!("Dry run: would write {} file(s):", changed.len());
		for output in &changed {
			println!("  {}", output.path.display());
		}
		return Ok(());
	}

	write_outputs(&root, &changed)?;
	println!("Wrote {} file(s).", changed.len());

	if args.verbose {
		for output in &changed {
			println!("  {}", output.path.display());
		}
	}

	Ok(())
}

fn run_check(args: &DtxCli, show_diff: bool, format: OutputFormat, watch: bool) -> CliResult<()> {
	// Run the initial check.
	let is_stale = run_check_once(args, show_diff, format)?;

	if !watch {
		if is_stale {
			process::exit(1);
		}
		return Ok(());
	}

	watch_sources(args, "checking", || {
		run_check_once(args, show_diff, format).map(|_| ())
	})
}

/// Run a single check and return whether any output is stale (true = stale).
fn run_check_once(args: &DtxCli, show_diff: bool, format: OutputFormat) -> CliResult<bool> {
	let root = resolve_root(args);
	let outputs = render(args, &root)?;
	let result = check_outputs(&root, &outputs)?;

	if result.is_ok() {
		match format {
			OutputFormat::Json => {
				println!("{{\"ok\":true,\"stale\":[]}}");
			}
			OutputFormat::Github | OutputFormat::Text => {
				println!("Check passed: all {} output(s) are up to date.", outputs.len());
			}
		}
		return Ok(false);
	}

	match format {
		OutputFormat::Json => {
			let stale_entries: Vec<serde_json::Value> = result
				.stale
				.iter()
				.map(|entry| {
					serde_json::json!({
						"path": entry.path.display().to_string(),
						"missing": entry.current.is_none(),
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": false,
				"stale": stale_entries,
			});
			println!("{output}");
		}
		OutputFormat::Github => {
			for entry in &result.stale {
				println!(
					"::warning file={}::Generated file is out of date",
					entry.path.display()
				);
			}
			eprintln!("{}", check_summary(&result));
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");
			eprintln!();
			eprintln!("Stale outputs:");
			for entry in &result.stale {
				let status = if entry.current.is_none() {
					" (missing)"
				} else {
					""
				};
				eprintln!("  {}{status}", entry.path.display());

				if show_diff {
					print_diff(entry.current.as_deref().unwrap_or_default(), &entry.expected);
				}
			}

			eprintln!();
			eprintln!("{}", check_summary(&result));
		}
	}

	Ok(true)
}

fn check_summary(result: &CheckResult) -> String {
	format!(
		"{} output(s) are out of date. Run `dtx build` to fix.",
		result.stale.len()
	)
}

/// Re-run `rerun` whenever the token export or a config file changes.
fn watch_sources<F>(args: &DtxCli, action: &str, mut rerun: F) -> CliResult<()>
where
	F: FnMut() -> CliResult<()>,
{
	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let root = resolve_root(args);
	let config = DtxConfig::load_or_default(&root)?;
	let mut watched: Vec<PathBuf> = CONFIG_FILE_CANDIDATES.iter().map(PathBuf::from).collect();
	watched.push(config.source);

	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			let Ok(event) = res else {
				return;
			};

			let relevant = matches!(
				event.kind,
				notify::EventKind::Modify(_) | notify::EventKind::Create(_)
			) && event
				.paths
				.iter()
				.any(|path| watched.iter().any(|file| path.ends_with(file)));

			if relevant {
				let _ = tx.send(());
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, {action}...");
		if let Err(e) = rerun() {
			report_error(e);
		}
	}
}

fn run_list(args: &DtxCli) -> CliResult<()> {
	let root = resolve_root(args);
	let pipeline = load_pipeline(args, &root)?;
	let config = pipeline.config();

	println!("{} {}", colored!("Source:", bold), config.source.display());

	println!();
	println!("{}", colored!("Themes:", bold));
	for (key, theme) in &config.themes {
		println!("  {key} ({}) -> {}", theme.group(), theme.file(key));
	}
	println!("  components -> {}", config.components.file);

	println!();
	println!("{}", colored!("Platforms:", bold));
	let mut file_count = 0;
	for (name, platform) in &config.platforms {
		println!("  {name} [{}]", platform.transforms.join(", "));
		for file in &platform.files {
			file_count += 1;
			let filter = file
				.filter
				.as_deref()
				.map(|filter| format!(" <- {filter}"))
				.unwrap_or_default();
			println!(
				"    {} ({}){filter}",
				file.destination.display(),
				file.format
			);
		}
	}

	println!(
		"\n{} platform(s), {} file(s)",
		config.platforms.len(),
		file_count
	);

	if args.verbose {
		let registry = pipeline.registry();
		println!();
		println!(
			"Transforms: {}",
			registry.transform_names().collect::<Vec<_>>().join(", ")
		);
		println!(
			"Formats: {}",
			registry.format_names().collect::<Vec<_>>().join(", ")
		);
	}

	Ok(())
}

/// Print references that were left unchanged because no rewrite rule
/// recognized them.
fn print_reference_warnings(warnings: &[ReferenceWarning]) {
	for warning in warnings {
		eprintln!(
			"{} reference `{{{}}}` in `{}` ({}) does not match a known namespace",
			colored!("warning:", yellow),
			warning.reference,
			warning.path.join("."),
			warning.source,
		);
	}
}

/// Render through miette for rich diagnostics with help text and error
/// codes, falling back to a plain message.
fn report_error(e: Box<dyn std::error::Error>) {
	match e.downcast::<dtx_core::DtxError>() {
		Ok(dtx_err) => {
			let report: miette::Report = (*dtx_err).into();
			eprintln!("{report:?}");
		}
		Err(e) => {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
