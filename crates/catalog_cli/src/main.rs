//! Catalog probe.
//!
//! Loads configuration from `CATALOG_*` environment variables, opens the
//! configured database and prints a short summary of its contents.

use catalog_core::{
    core_version, init_logging_from_config, CoreConfig, ProductOptionService, ProductService,
    UnitOfWork,
};
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("catalog_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = CoreConfig::from_env()?;
    init_logging_from_config(&config)?;

    let uow = UnitOfWork::from_config(&config)?;
    let products = ProductService::new(&uow).list_products()?;
    let options = ProductOptionService::new(&uow);

    println!("catalog_core version={}", core_version());
    println!("database={}", config.db_path.display());
    println!("products={}", products.len());
    for product in &products {
        let option_count = options.list_options(product.id)?.len();
        println!(
            "- {} name={:?} price={} delivery_price={} options={option_count}",
            product.id, product.name, product.price, product.delivery_price
        );
    }
    Ok(())
}
