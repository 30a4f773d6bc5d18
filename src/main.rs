use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    inventory_import_lib::run().await
}
