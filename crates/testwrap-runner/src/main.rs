//! testwrap
//!
//! - `testwrap run [PACKAGES].. [FLAGS]..` : discover, compose, run
//! - `testwrap policy ...`                 : check the shipped permission policy
//!
//! Exit status: 0 on success, the test tool's own code on test failure,
//! 1 on any wrapper error.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use testwrap_core::error::TestwrapError;
use testwrap_runner::cli::{self, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let code = match cli::execute(cli).await {
        Ok(0) => 0,
        Ok(code) => {
            let e = TestwrapError::TestFailed(code);
            tracing::error!(code = e.code().as_str(), "{e}");
            e.exit_code()
        }
        Err(e) => {
            tracing::error!(code = e.code().as_str(), "{e}");
            eprintln!("testwrap: {e}");
            e.exit_code()
        }
    };

    std::process::exit(code);
}
