use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    ecsctl_lib::run(std::env::args_os()).await
}
