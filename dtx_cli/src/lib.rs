use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate theme stylesheets, component classes and class-merge config from design \
	         tokens.",
	long_about = "dtx (design token transformer) turns the token export of a design tool into the \
	              styling artifacts a component library consumes.\n\nIt assembles theme and \
	              component token sources from the export, rewrites alias references, folds \
	              light/dark and density modes into CSS expressions, and renders every configured \
	              platform.\n\nQuick start:\n  dtx init    Create a dtx.toml config file\n  dtx \
	              build   Generate every output\n  dtx check   Verify generated files are up to \
	              date\n  dtx list    Show themes, platforms and destinations"
)]
pub struct DtxCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize dtx in a project by creating a sample `dtx.toml`.
	///
	/// The sample documents every option with its default value. If a config
	/// file already exists, this command is a no-op and exits successfully.
	Init,
	/// Generate every configured output from the token export.
	///
	/// Reads the export, assembles one source per theme plus the component
	/// source, and renders every platform's files. Only files whose content
	/// changed are written.
	///
	/// Use `--dry-run` to preview which files would change, or `--watch` to
	/// rebuild whenever the export or config changes.
	Build {
		/// Preview changes without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Watch the token export and config file and rebuild on change.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// Check that every generated file is up to date.
	///
	/// Renders every output in memory and compares it with the file on disk.
	/// Exits with a non-zero status code if any file is missing or stale,
	/// which makes it suitable for CI.
	Check {
		/// Show a unified diff for each stale file.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,

		/// Watch the token export and config file and re-run checks on
		/// change.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// List the configured themes, platforms and destinations.
	List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each stale entry includes
	/// the destination path and whether the file exists.
	Json,
	/// GitHub Actions annotation format.
	Github,
}
