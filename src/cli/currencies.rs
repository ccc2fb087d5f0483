use super::ui;
use crate::core::{Catalog, RateProvider};
use anyhow::{Context, Result};
use comfy_table::Cell;

pub fn display_as_table(catalog: &Catalog) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);
    for (code, name) in catalog.iter() {
        table.add_row(vec![Cell::new(code), Cell::new(name)]);
    }
    table.to_string()
}

pub async fn run(provider: &dyn RateProvider) -> Result<()> {
    let spinner = ui::new_spinner("Fetching currency list");
    let result = provider.get_currencies().await;
    spinner.finish_and_clear();

    let catalog = result.context("Failed to load currency list")?;
    println!(
        "{}",
        ui::style_text("Supported currencies", ui::StyleType::Title)
    );
    println!("{}", display_as_table(&catalog));
    Ok(())
}
