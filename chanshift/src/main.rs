#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    chanshift::init_logger();
    chanshift::run().await
}
