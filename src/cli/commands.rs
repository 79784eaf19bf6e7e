use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Heuristic build-strategy discovery for arbitrary C/C++ checkouts
#[derive(Parser, Debug)]
#[command(
    name = "autobuild",
    about = "Heuristic build-strategy discovery for arbitrary C/C++ checkouts",
    version,
    author,
    long_about = "autobuild inspects a source tree, recognizes the build systems it uses \
                  (Make, Autotools, CMake or loose C files) and proposes one bash script per \
                  plausible strategy. Each script can then be run in an isolated copy of the \
                  tree to find out which strategies actually produce object files and libraries."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "List build candidates for a source tree",
        long_about = "Runs every detector over the tree and prints the resulting build \
                      candidates in registration order.\n\n\
                      Examples:\n  \
                      autobuild detect\n  \
                      autobuild detect /src/libpng --format json"
    )]
    Detect(DetectArgs),

    #[command(
        about = "Materialize one build script per candidate",
        long_about = "Renders every candidate into a bash script that copies the tree into \
                      <BASE_DIR><index> and runs the candidate's steps there.\n\n\
                      Examples:\n  \
                      autobuild scripts /src/libpng --base-dir /tmp/test-fuzz-build-\n  \
                      autobuild scripts --output-dir ./scripts"
    )]
    Scripts(ScriptsArgs),

    #[command(
        about = "Run every candidate and report the artifacts it produced",
        long_about = "Writes each script to the script path, invokes the compile command, and \
                      diffs the working directory against the untouched tree.\n\n\
                      Examples:\n  \
                      autobuild evaluate /src/libpng\n  \
                      autobuild evaluate --compile-command 'bash build.sh' --format yaml"
    )]
    Evaluate(EvaluateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(value_name = "PATH", help = "Source tree (defaults to current directory)")]
    pub target: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ScriptsArgs {
    #[arg(value_name = "PATH", help = "Source tree (defaults to current directory)")]
    pub target: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PREFIX",
        help = "Working directory prefix; the candidate index is appended"
    )]
    pub base_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Write build-<i>.sh files here instead of printing them"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format when printing"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    #[arg(value_name = "PATH", help = "Source tree (defaults to current directory)")]
    pub target: Option<PathBuf>,

    #[arg(
        long,
        value_name = "PREFIX",
        help = "Working directory prefix; the candidate index is appended"
    )]
    pub base_dir: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Where each build script is written")]
    pub script_path: Option<PathBuf>,

    #[arg(long, value_name = "COMMAND", help = "Command that runs the written script")]
    pub compile_command: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
