use crate::config::Config;
use crate::constants::limits;
use crate::state::SharedState;

pub async fn cmd_trending(config: &Config, limit: Option<u32>) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let limit = limit
        .unwrap_or(config.trending.limit)
        .clamp(1, limits::MAX_TRENDING_LIMIT);

    let Some(records) = state.trending.top_trending_with_limit(limit).await else {
        anyhow::bail!(
            "Could not read trending searches from the {} store",
            state.trending.backend_name()
        );
    };

    if records.is_empty() {
        println!("No searches recorded yet.");
        println!();
        println!("Search with: marquee search \"movie name\"");
        return Ok(());
    }

    println!("Trending Movies ({} backend)", state.trending.backend_name());
    println!("{:-<60}", "");

    for (index, record) in records.iter().enumerate() {
        println!(
            "{:>2}. {} ({} searches)",
            index + 1,
            record.search_term,
            record.count
        );
        if !record.poster_url.is_empty() {
            println!("    {}", record.poster_url);
        }
    }

    Ok(())
}
