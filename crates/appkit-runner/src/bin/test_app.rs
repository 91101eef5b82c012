use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    appkit_infra::init_tracing();
    appkit_runner::main_with(appkit_actions::test_app::registry()).await
}
