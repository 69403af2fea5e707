use std::num::NonZeroU32;

use clap::Parser;
use log::{debug, error};
use tally::{chart, io, ops};

/// Purchase history plotter
///
/// Reads purchases from standard input, one per line, as `item,date,price,store`, and
/// charts them by month.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Show purchase history for this store.
    #[arg(long)]
    store: Option<String>,
    /// Show purchase history for this item.
    #[arg(long)]
    item: Option<String>,
    /// Plot by total dollar amount instead of purchase count.
    #[arg(long)]
    total: bool,
    /// Scale the Y-axis by counting by this value (instead of by 1's).
    #[arg(long, default_value_t = chart::DEFAULT_SCALE)]
    scale: NonZeroU32,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut stdin = std::io::stdin().lock();
    let mut purchases = io::read_purchases(&mut stdin).unwrap_or_else(|err| {
        error!("Failed to read purchases from standard input: {err}");
        std::process::exit(1);
    });
    debug!("Loaded {} purchases", purchases.len());

    if let Some(item) = &args.item {
        purchases = ops::filter_purchases(&purchases, "item", item.as_str());
        debug!("{} purchases of {:?}", purchases.len(), item);
    }
    if let Some(store) = &args.store {
        purchases = ops::filter_purchases(&purchases, "store", store.as_str());
        debug!("{} purchases at {:?}", purchases.len(), store);
    }

    let series = if args.total {
        ops::total_spent_by_month(&purchases)
    } else {
        ops::counts_by_month(&purchases)
    };

    println!(
        "{}",
        io::history_title(args.item.as_deref(), args.store.as_deref())
    );
    println!("{}", chart::to_chart(&series, args.scale));
}
