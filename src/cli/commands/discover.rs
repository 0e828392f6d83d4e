use crate::clients::{MovieCatalog, TmdbClient};
use crate::config::Config;
use crate::view::{ViewState, render_text};

pub async fn cmd_discover(config: &Config) -> anyhow::Result<()> {
    let catalog = TmdbClient::new(&config.catalog)?;

    let mut view = ViewState::default();
    view.begin_fetch("");
    view.apply_fetch(&catalog.discover().await);

    println!("Popular right now");
    println!();
    print!("{}", render_text(&view));

    Ok(())
}
