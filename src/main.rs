use autobuild::cli::commands::{CliArgs, Commands};
use autobuild::cli::handlers::{handle_detect, handle_evaluate, handle_scripts};
use autobuild::util::logging::{init_logging, parse_level};
use autobuild::{AutobuildConfig, VERSION};

use clap::Parser;
use tracing::{debug, Level};

fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("autobuild v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Detect(detect_args) => handle_detect(detect_args, args.quiet),
        Commands::Scripts(scripts_args) => handle_scripts(scripts_args, args.quiet),
        Commands::Evaluate(evaluate_args) => handle_evaluate(evaluate_args, args.quiet),
    };

    std::process::exit(exit_code);
}

/// Flags win over `AUTOBUILD_LOG_LEVEL` and `AUTOBUILD_LOG_JSON`
fn init_logging_from_args(args: &CliArgs) {
    let mut logging = AutobuildConfig::default().logging_config();
    if let Some(level_str) = &args.log_level {
        logging.level = parse_level(level_str);
    } else if args.verbose {
        logging.level = Level::DEBUG;
    } else if args.quiet {
        logging.level = Level::ERROR;
    }

    init_logging(logging);
}
