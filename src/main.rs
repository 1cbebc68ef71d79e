use clap::Parser;

use fermyon::cli::Cli;
use fermyon::dispatch::{self, HostEnv};
use fermyon::logging;
use fermyon::runner::{ProcessRunner, Streams};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let log_file = logging::init(cli.debug);
    let env = HostEnv::capture(Some(log_file));

    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    let mut streams = Streams::new(&mut out, &mut err);

    if let Err(e) = dispatch::dispatch(&cli, &env, &ProcessRunner, &mut streams).await {
        let code = e.exit_code();
        tracing::debug!(exit_code = code, "command failed");
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(code);
    }
}
