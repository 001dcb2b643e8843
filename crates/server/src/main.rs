#[tokio::main]
async fn main() -> anyhow::Result<()> {
    talentfilter_server::start().await
}
