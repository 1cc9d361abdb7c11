//! Walk one order through the kitchen.
//!
//! Reads the store location from ORDERS_DB_* variables. Defaults to a
//! temporary database so repeated runs start clean.

use order_lifecycle::{
    Item, OrderService, OrderStore, Status, View,
    config::StoreConfig,
    logging::{self, Profile},
};

fn main() -> anyhow::Result<()> {
    logging::init(Profile::Development);

    let mut config = StoreConfig::from_env();
    if std::env::var_os("ORDERS_DB_PATH").is_none() {
        config = config.temporary(true);
    }

    let service = OrderService::new(OrderStore::open(&config)?);

    let id = service.create_order(vec![Item::new("Burger", 2), Item::new("Fries", 1)])?;
    println!("placed {id}");

    for status in [Status::Preparing, Status::Served, Status::Closed] {
        let change = service.move_status(&id, status)?;
        println!("{status}: {} row(s) changed", change.rows_changed());
        for view in View::ALL {
            println!("  {view}: {:?}", service.list(view)?);
        }
    }

    // a closed ticket stays closed
    if let Err(err) = service.move_status(&id, Status::Preparing) {
        println!("refused: {err}");
    }

    println!("{:#?}", service.order_detail(&id)?);
    service.store().flush()?;

    Ok(())
}
