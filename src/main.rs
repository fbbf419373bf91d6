use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    backstop::cli::main().await
}
