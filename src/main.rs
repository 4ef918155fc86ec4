#[tokio::main]
async fn main() {
    if let Err(e) = xenowatch_lib::run().await {
        eprintln!("xenowatch: {e}");
        std::process::exit(1);
    }
}
