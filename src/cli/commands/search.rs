use crate::config::Config;
use crate::state::SharedState;
use crate::view::{ViewState, render_text};

pub async fn cmd_search(config: &Config, query: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    println!("Searching for: {query}");
    println!();

    let result = state.catalog.fetch_movies(query).await;

    // Recorded inline rather than through the queue, the process exits next.
    if let Ok(movies) = &result
        && let Some(first) = movies.first()
        && !query.is_empty()
    {
        state.trending.record_search(query, first).await;
    }

    let mut view = ViewState {
        input: query.to_string(),
        ..Default::default()
    };
    view.begin_fetch(query);
    view.apply_fetch(&result);

    print!("{}", render_text(&view));

    Ok(())
}
