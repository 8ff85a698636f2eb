#[tokio::main]
async fn main() -> anyhow::Result<()> {
    multilingual_paraphraser_lib::run().await
}
