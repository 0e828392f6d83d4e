//! Interactive search command handler
//!
//! Every stdin line replaces the search input, as if it had been typed into
//! the search box. Results are printed each time a fetch settles.

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::services::SearchSession;
use crate::state::SharedState;
use crate::view::render_text;

pub async fn cmd_interactive(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let session = SearchSession::start(
        Arc::clone(&state.search),
        Arc::clone(&state.trending),
        config.debounce(),
    );

    println!("Type to search, an empty line shows popular movies. Ctrl+D to quit.");

    let mut rx = session.subscribe();
    let printer = tokio::spawn(async move {
        let mut started = false;
        let mut last_printed = String::new();
        while rx.changed().await.is_ok() {
            let view = rx.borrow_and_update().clone();
            started |= view.loading || !view.movies.is_empty() || view.error.is_some();
            if !started || view.loading {
                continue;
            }
            let text = render_text(&view);
            if text != last_printed {
                println!();
                print!("{text}");
                last_printed = text;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_input = String::new();
    while let Some(line) = lines.next_line().await? {
        last_input = line.trim().to_string();
        session.set_input(last_input.clone());
    }

    // Let the last query settle before leaving.
    let settle = config.debounce()
        + Duration::from_secs(config.catalog.request_timeout_seconds.into());
    let mut rx = session.subscribe();
    let _ = tokio::time::timeout(
        settle,
        rx.wait_for(|v| v.debounced == last_input && !v.loading),
    )
    .await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    drop(session);
    printer.abort();

    Ok(())
}
