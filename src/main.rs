//! bouncer CLI entry point

use bouncer::audio::LameTranscoder;
use bouncer::config::{Cli, Settings};
use bouncer::pipeline::{self, RunOutcome};
use bouncer::prompt::{DialogPrompt, Prompt};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_MESSAGE: &str = "Press Enter to exit";

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    let settings = Settings::from_cli(&cli);
    let prompt = DialogPrompt::new(settings.pause_on_exit);
    let transcoder = LameTranscoder::new();

    let code = match pipeline::run(&settings, &prompt, &transcoder) {
        Ok(RunOutcome::Initialized { matched_dir_name }) => {
            println!();
            if matched_dir_name {
                println!("config.ini was created from the project directory name.");
            } else {
                println!("A blank config.ini was created.");
            }
            println!("Please fill out the rest of the file and rerun bouncer.");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::NeedsInput) => {
            println!();
            println!("Please update config.ini with the required values and rerun bouncer.");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Completed(summary)) => {
            println!();
            println!(
                "Summary: version {} exported ({} stems, {} skipped); next version is {}",
                summary.version,
                summary.post.exported.len(),
                summary.post.skipped.len(),
                summary.next_version
            );
            println!("  Showcase: {}", summary.showcase_file.display());
            println!("  POST:     {}", summary.post.package_dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_user_fixable() {
                eprintln!("Fix the project and rerun bouncer.");
            }
            ExitCode::FAILURE
        }
    };

    prompt.acknowledge(EXIT_MESSAGE);
    code
}

fn init_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_target(false)
        .init();
}
