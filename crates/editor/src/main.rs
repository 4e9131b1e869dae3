use std::env;
use std::process::ExitCode;

use tracing::{error, info};

mod app;

use app::CliAction;

fn main() -> ExitCode {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let editor_args = match app::parse_args(&args) {
        Ok(CliAction::Run(editor_args)) => editor_args,
        Ok(CliAction::Help) => {
            println!("{}", app::usage_text());
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", app::usage_text());
            return ExitCode::from(2);
        }
    };

    app::init_tracing();
    info!("=== ninja editor startup ===");

    match app::build_app(editor_args) {
        Ok(wiring) => app::run(wiring),
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
