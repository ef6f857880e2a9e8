// error_chain macro can recurse deeply
#![recursion_limit = "1024"]

#[macro_use]
extern crate error_chain;
#[macro_use(lazy_static)]
extern crate lazy_static;
#[macro_use]
extern crate log;

mod args;
mod commands;
mod constants;
mod divergence;
mod errors;
mod generator;
mod indel;
mod model;
mod profile;
mod progress;
mod table;
mod target;

fn print_err(e: &errors::Error) {
    use error_chain::ChainedError;
    use std::io::Write; // trait which holds `display_chain`
    let stderr = &mut ::std::io::stderr();
    let errmsg = "Error writing to stderr";

    writeln!(stderr, "{}", e.display_chain()).expect(errmsg);
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn inner_main() -> errors::Result<()> {
    let invocation = args::parse_args()?;
    init_logging(invocation.verbosity);

    match invocation.args {
        args::Args::Predict(args) => commands::predict::main(&args),
        args::Args::Compare(args) => commands::compare::main(&args),
        args::Args::Summarize(args) => commands::summarize::main(&args),
        args::Args::Candidates(args) => commands::candidates::main(&args),
        args::Args::None => Ok(()),
    }
}

fn main() {
    if let Err(e) = inner_main() {
        print_err(&e);

        ::std::process::exit(1);
    } else {
        ::std::process::exit(0);
    }
}
