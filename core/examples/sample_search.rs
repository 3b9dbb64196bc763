use simsearch::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::default();
    let session = SearchSession::with_shared_model(SharedModel::global(), &config.embedding).await?;

    let load = session.load_source(SourceKind::Sample, &config).await;
    session.build_index(load.documents).await?;

    for query in ["open an account", "where is my card", "borrow money"] {
        println!("{query}");
        for result in session.search(query, 2).await? {
            println!(
                "  {}. {} ({:.3})",
                result.rank,
                result.document.content(),
                result.similarity()
            );
        }
    }
    Ok(())
}
