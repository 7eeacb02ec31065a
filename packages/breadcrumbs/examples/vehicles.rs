//! A breadcrumb bar for the vehicle pages of the marketplace.
//!
//! The route table comes from TOML. The sibling vehicles are loaded lazily on first use, so the
//! first build waits on a fetch and the trail appears once it settles.

use std::{cell::RefCell, rc::Rc};

use carlot_breadcrumbs::prelude::*;
use carlot_history::{History, MemoryHistory};
use futures::executor::LocalPool;

const ROUTES: &str = r#"
home_title = "Marketplace"
home_icon = "store"

[[routes]]
title = "Vehicles"
icon = "car"
patterns = ["/vehicles"]

[[routes]]
title = "Vehicle"
icon = "car"
patterns = ["/vehicles/:id"]

[[routes]]
title = "Photos"
icon = "camera"
patterns = ["/vehicles/:id/photos"]
"#;

#[derive(Default)]
struct Inventory {
    vehicles: RefCell<Option<Vec<ParamOption>>>,
}

impl Inventory {
    async fn load(&self) -> Result<(), ResolveError> {
        tracing::info!("loading vehicles");
        *self.vehicles.borrow_mut() = Some(vec![
            ParamOption::new("42", "Honda Civic"),
            ParamOption::new("99", "Tesla Model 3"),
            ParamOption::new("7", "Fiat Panda"),
        ]);
        Ok(())
    }
}

fn vehicle_siblings(
    inventory: &Rc<Inventory>,
    _: &AccumulatedParams,
) -> Result<Resolution, ResolveError> {
    if let Some(vehicles) = inventory.vehicles.borrow().as_ref() {
        return Ok(Resolution::ready(vehicles.clone()));
    }

    let inventory = inventory.clone();
    Ok(Resolution::fetch(FetchThunk::new(move || async move {
        inventory.load().await
    })))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = BreadcrumbConfig::from_toml_str(ROUTES)?;
    let table = RouteTable::from_config(&config).resolver("Vehicle", "id", vehicle_siblings);

    let mut pool = LocalPool::new();
    let inventory = Rc::new(Inventory::default());
    let history = Rc::new(MemoryHistory::with_initial_path("/vehicles/42/photos"));
    let mut navigator = BreadcrumbNavigator::new(
        table,
        history.clone(),
        pool.spawner(),
        config.build_options(),
    );

    navigator.refresh(&inventory);
    println!("before the fetch: {}", render_html(navigator.trail()));

    pool.run_until_stalled();
    navigator.poll(&inventory);
    println!("after the fetch:  {}", render_html(navigator.trail()));

    if let Navigation::Navigated(path) = navigator.select(2, "id", "99")? {
        println!("switched to {path}");
    }
    navigator.poll(&inventory);
    println!("sibling:          {}", render_html(navigator.trail()));

    history.go_back();
    navigator.poll(&inventory);
    println!("back:             {}", render_html(navigator.trail()));

    Ok(())
}
