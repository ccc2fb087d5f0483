use super::{panel, ui};
use crate::core::{RateProvider, Selection};
use crate::dashboard::{Applied, CatalogState, Dashboard};
use anyhow::{Result, bail};
use std::sync::Arc;

/// Loads everything for `selection` once and returns the rendered dashboard.
///
/// Fails as soon as the currency list is in if it lacks either code.
pub async fn load(provider: Arc<dyn RateProvider>, selection: Selection) -> Result<Dashboard> {
    let mut dashboard = Dashboard::new(provider, selection).keep_unknown_codes();
    dashboard.start();

    while let Some(applied) = dashboard.next_event().await {
        if applied == Applied::Catalog {
            check_catalog(&dashboard)?;
        }
    }
    check_catalog(&dashboard)?;

    Ok(dashboard)
}

fn check_catalog(dashboard: &Dashboard) -> Result<()> {
    match dashboard.catalog() {
        CatalogState::Ready(catalog) => {
            let selection = dashboard.selection();
            for code in [&selection.source, &selection.target] {
                if !catalog.contains(code) {
                    bail!("Unsupported currency: {}", code);
                }
            }
            Ok(())
        }
        CatalogState::Failed(e) => bail!("Failed to load currency list: {}", e),
        CatalogState::Loading => bail!("Currency list did not load"),
    }
}

pub async fn run(provider: Arc<dyn RateProvider>, selection: Selection) -> Result<()> {
    let spinner = ui::new_spinner("Fetching exchange rates");
    let result = load(provider, selection).await;
    spinner.finish_and_clear();

    println!("{}", panel::render(&result?));
    Ok(())
}
