//! Commands that read and write the local client store.

use std::path::{Path, PathBuf};

use anyhow::Context;
use naftas_core::{Bookmark, ClientStore};
use rust_decimal::Decimal;

/// `$XDG_DATA_HOME/naftas/store.json` or the platform equivalent.
///
/// # Errors
///
/// Returns an error if the platform has no data directory.
pub(crate) fn default_store_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .context("no data directory for this platform; pass --store or set NAFTAS_STORE_PATH")?;
    Ok(data_dir.join("naftas").join("store.json"))
}

#[derive(Debug)]
pub(crate) struct NewBookmark<'a> {
    pub brand: &'a str,
    pub fuel: &'a str,
    pub price: Decimal,
    pub date: &'a str,
    pub city: Option<&'a str>,
    pub liters: Option<Decimal>,
}

pub(crate) fn run_city_show(path: &Path) -> anyhow::Result<()> {
    match ClientStore::load(path)?.city {
        Some(city) => println!("{city}"),
        None => println!("no city selected"),
    }
    Ok(())
}

pub(crate) fn run_city_set(path: &Path, name: &str) -> anyhow::Result<()> {
    let name = name.trim();
    anyhow::ensure!(!name.is_empty(), "city name must not be empty");

    let mut store = ClientStore::load(path)?;
    store.set_city(name);
    store.save(path)?;
    tracing::info!(city = name, path = %path.display(), "city saved");
    println!("selected city: {name}");
    Ok(())
}

pub(crate) fn run_bookmarks_list(path: &Path) -> anyhow::Result<()> {
    let store = ClientStore::load(path)?;
    if store.bookmarks.is_empty() {
        println!("no bookmarks saved");
        return Ok(());
    }

    for b in &store.bookmarks {
        let total = b
            .total
            .map_or_else(String::new, |t| format!("  total {t}"));
        println!(
            "{:<40}{:<16}{:<20}{:>10}  {}{total}",
            b.id, b.brand, b.fuel_type, b.price.to_string(), b.date
        );
    }
    Ok(())
}

/// Save a bookmark, replacing any existing one for the same brand, fuel and
/// city.
///
/// # Errors
///
/// Returns an error if no city is given or stored, or the store cannot be
/// read or written.
pub(crate) fn run_bookmarks_add(path: &Path, new: &NewBookmark<'_>) -> anyhow::Result<()> {
    anyhow::ensure!(new.price > Decimal::ZERO, "price must be positive");
    if let Some(liters) = new.liters {
        anyhow::ensure!(liters > Decimal::ZERO, "liters must be positive");
    }

    let mut store = ClientStore::load(path)?;
    let city = match new.city {
        Some(city) => city.to_owned(),
        None => store
            .city
            .clone()
            .context("no city given and none stored; use --city or `city set`")?,
    };

    let bookmark = Bookmark::new(
        new.brand,
        new.fuel,
        new.price,
        new.date,
        &city,
        new.liters,
    );
    anyhow::ensure!(
        new.liters.is_none() || bookmark.total.is_some(),
        "liters × price is too large"
    );
    let id = bookmark.id.clone();
    store.save_bookmark(bookmark);
    store.save(path)?;

    println!("saved {id}");
    Ok(())
}

pub(crate) fn run_bookmarks_remove(path: &Path, id: &str) -> anyhow::Result<()> {
    let mut store = ClientStore::load(path)?;
    if store.remove_bookmark(id) {
        store.save(path)?;
        println!("removed {id}");
    } else {
        println!("no bookmark with id {id}");
    }
    Ok(())
}
