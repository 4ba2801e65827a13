use clap::Parser;
use std::process::ExitCode;
use walletwatch::arguments::Arguments;

/// walletwatch entry point
///
/// Everything runs sequentially on one current-thread runtime. Exit code is
/// 0 on clean shutdown, 1 on a startup failure or a failed `--once` cycle.
fn main() -> ExitCode {
    let args = Arguments::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("❌ Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(walletwatch::run::run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}
