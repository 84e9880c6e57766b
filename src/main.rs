//! gitclone - a resumable, primer-aware `git clone`.

use clap::Parser;

use gitclone::cli::Args;
use gitclone::core::junk::{install_signal_handler, JunkTracker};
use gitclone::core::orchestrator;
use gitclone::core::OutputSink;
use gitclone::output::{CliOutput, OutputConfig};
use gitclone::{check_dependencies, logging};

fn main() {
    let args = Args::parse();

    logging::init_logging(args.verbose, args.quiet);

    if let Err(e) = check_dependencies() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = install_signal_handler() {
        log::warn!("failed to install signal handler: {e}");
    }

    let mut output = CliOutput::new(OutputConfig::new(args.quiet, args.verbose));
    let mut sink = OutputSink(&mut output);

    let exit_code = match orchestrator::run(&args, &mut sink) {
        Ok(outcome) => {
            if !outcome.checkout_failed {
                sink.0.result(&format!("Cloned into '{}'", outcome.work_dir.display()));
            }
            outcome.checkout_failed as i32
        }
        Err(e) => {
            sink.0.error(&e.to_string());
            1
        }
    };

    // Idempotent: a successful clone already left the Junk Tracker at
    // `LeaveAll`, so this is a no-op there; a failure or incomplete
    // checkout still needs its cleanup/resume-hint policy applied.
    JunkTracker::run_cleanup();

    std::process::exit(exit_code);
}
