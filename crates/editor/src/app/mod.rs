mod bootstrap;
mod loop_runner;
mod palette;
mod session;

pub(crate) use bootstrap::{build_app, init_tracing, parse_args, usage_text, CliAction};
pub(crate) use loop_runner::run;
