//! [Cli] impl.

use ::std::{
    io::{BufWriter, Write, stdin},
    path::PathBuf,
};

use ::clap::{Args, CommandFactory, Parser, Subcommand};
use ::clap_complete::Shell;
use ::color_eyre::eyre::eyre;
use ::patharg::{InputArg, OutputArg};

use crate::resp::{
    self, Cardinality, LocateMode, Markers, Options, provide::OsFs,
};

/// Get default shell to use.
fn default_shell() -> Shell {
    Shell::from_env().unwrap_or(Shell::Bash)
}

/// Expand response files over search paths.
#[derive(Debug, Parser, Clone)]
#[command(author, version, args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// If no subcommand run expand.
    #[command(flatten)]
    expand: Expand,

    /// What action to take.
    #[command(subcommand)]
    command: Option<Action>,
}

/// What action to take.
#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    /// Generate completions.
    Completions(Completions),
    /// Expand a response file [default command].
    Expand(Expand),
    /// Locate a single file specification in the search paths.
    Locate(Locate),
}

impl From<Cli> for Action {
    fn from(value: Cli) -> Self {
        let Cli { expand, command } = value;
        command.unwrap_or(Action::Expand(expand))
    }
}

/// Search and resolution flags shared by the commands.
#[derive(Debug, Clone, Args)]
pub struct ModeArgs {
    /// Add a directory to the search path, in precedence order.
    #[arg(long = "search-path", short = 'I', value_name = "DIR")]
    pub search_paths: Vec<String>,

    /// Collect matches from every search path, not just the first.
    #[arg(long, conflicts_with = "first_any")]
    pub all: bool,

    /// Collect every match of the first search path that has any.
    #[arg(long)]
    pub first_any: bool,

    /// Never fall back to the working directory.
    #[arg(long)]
    pub ignore_cwd: bool,
}

impl ModeArgs {
    /// Combined lookup mode.
    pub fn mode(&self) -> LocateMode {
        let cardinality = if self.all {
            Cardinality::AllPaths
        } else if self.first_any {
            Cardinality::FirstInAnyPath
        } else {
            Cardinality::FirstInFirstPath
        };
        LocateMode {
            cardinality,
            ignore_cwd: self.ignore_cwd,
        }
    }
}

/// Generate completions.
#[derive(Debug, Clone, Args)]
pub struct Completions {
    /// Shell to generate for.
    #[arg(long, short, default_value_t = default_shell())]
    pub shell: Shell,

    /// File to write completions to.
    #[arg(default_value_t)]
    pub file: OutputArg,
}

impl Completions {
    /// Generate completions.
    ///
    /// # Errors
    /// If the completions cannot be written or generated.
    pub fn generate(self) -> ::color_eyre::Result<()> {
        let Self { shell, file } = self;
        ::clap_complete::generate(
            shell,
            &mut Cli::command(),
            env!("CARGO_PKG_NAME"),
            &mut file.create().map_err(|err| eyre!(err))?,
        );
        Ok(())
    }
}

/// Expand a response file.
#[derive(Debug, Clone, Args)]
pub struct Expand {
    /// Response file to expand.
    #[arg(default_value_t)]
    pub file: InputArg,

    /// Search and resolution flags.
    #[command(flatten)]
    pub mode: ModeArgs,

    /// Directory anchoring relative search paths, defaults to the response
    /// file's own directory.
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Prefix for comment and directive lines kept in the output.
    #[arg(long, default_value = ";")]
    pub ignore_marker: String,

    /// Prefix for assignment statements kept in the output.
    #[arg(long, default_value = "=")]
    pub statement_marker: String,

    /// Prefix for lines that failed to resolve.
    #[arg(long, default_value = "!")]
    pub failure_marker: String,

    /// Where to write the expansion.
    #[arg(long, short, default_value_t)]
    pub output: OutputArg,
}

impl Expand {
    /// Expand the response file and write one result entry per line.
    ///
    /// # Errors
    /// If the file cannot be read, a fatal resolution error occurs, or the
    /// output cannot be written.
    pub fn run(self) -> ::color_eyre::Result<()> {
        let Self {
            file,
            mode,
            base_dir,
            ignore_marker,
            statement_marker,
            failure_marker,
            output,
        } = self;

        let base_dir = base_dir.or_else(|| match &file {
            InputArg::Stdin => None,
            InputArg::Path(path) => path.parent().map(PathBuf::from),
        });

        let contents = match &file {
            InputArg::Stdin => ::std::io::read_to_string(stdin().lock()).map_err(|err| eyre!(err))?,
            InputArg::Path(path) => {
                ::std::fs::read_to_string(path).map_err(|err| eyre!(err))?
            }
        };
        let lines: Vec<String> = contents.lines().map(String::from).collect();

        let options = Options {
            output_base_dir: base_dir.map(|dir| dir.to_string_lossy().into_owned()),
            markers: Markers {
                ignore: ignore_marker,
                statement: statement_marker,
                failure: failure_marker,
            },
        };

        let expanded = resp::process_response_file_lines(
            &OsFs,
            &lines,
            &mode.search_paths,
            mode.mode(),
            &options,
        )
        .map_err(|err| eyre!(err))?;

        let mut output = output
            .create()
            .map_err(|err| eyre!(err))?
            .map_right(BufWriter::new);

        for entry in &expanded {
            output.write_all(entry.as_bytes()).map_err(|err| eyre!(err))?;
            output.write_all(b"\n").map_err(|err| eyre!(err))?;
        }

        Ok(())
    }
}

/// Locate a single file specification in the search paths.
#[derive(Debug, Clone, Args)]
pub struct Locate {
    /// File specification to resolve, wildcards allowed.
    pub filespec: String,

    /// Search and resolution flags.
    #[command(flatten)]
    pub mode: ModeArgs,

    /// Also print which search path produced each batch of matches.
    #[arg(long)]
    pub used: bool,

    /// Where to print matches.
    #[arg(long, short, default_value_t)]
    pub output: OutputArg,
}

impl Locate {
    /// Print every match, one per line.
    ///
    /// # Errors
    /// If the lookup is invalid or the output cannot be written.
    pub fn run(self) -> ::color_eyre::Result<()> {
        let Self {
            filespec,
            mode,
            used,
            output,
        } = self;

        let mut used_paths = Vec::new();
        let matches = resp::locate_all_matching_files(
            &OsFs,
            &filespec,
            &mode.search_paths,
            mode.mode(),
            used.then_some(&mut used_paths),
        )
        .map_err(|err| eyre!(err))?;

        let mut output = output
            .create()
            .map_err(|err| eyre!(err))?
            .map_right(BufWriter::new);

        for path in &matches {
            output.write_all(path.as_bytes()).map_err(|err| eyre!(err))?;
            output.write_all(b"\n").map_err(|err| eyre!(err))?;
        }
        for search_path in &used_paths {
            output
                .write_all(format!("used: {search_path}\n").as_bytes())
                .map_err(|err| eyre!(err))?;
        }

        Ok(())
    }
}
