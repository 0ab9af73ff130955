use crate::cli::Source;
use pairs_core::fs::{normalize_ticker, read_dir_universe, read_json};
use pairs_core::{Config, EarningsPairs, Pair, Universe};
use tracing::{debug, error, info, trace};

/// Rank every pair of tickers, and print the report.
pub(crate) fn run(tickers: Vec<String>, source: Source, json: bool) -> anyhow::Result<()> {
    let time = std::time::Instant::now();

    // 1. settings & filing records
    let config = config(&source)?;
    let universe = load(&source, &config, &tickers)?;
    debug!("{} tickers loaded", universe.len());

    // 2. compare
    let mut earnings_pairs = EarningsPairs::with_config(&universe, config)?;
    earnings_pairs.generate_pairs()?;
    let report = earnings_pairs.compare_pairs();

    // 3. report
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    info!(
        "{} pairs compared, time elapsed: {:?}",
        report.len(),
        time.elapsed()
    );

    Ok(())
}

/// Print every marker between `first` & `second`, with the pair's relationship.
pub(crate) fn markers(first: String, second: String, source: Source) -> anyhow::Result<()> {
    let config = config(&source)?;
    let (first, second) = (normalize_ticker(&first), normalize_ticker(&second));
    let universe = load(&source, &config, &[first.clone(), second.clone()])?;

    let history = |symbol: &str| {
        universe
            .get(symbol)
            .and_then(|ticker| ticker.history())
            .ok_or_else(|| {
                error!("no filing records found for [{symbol}]");
                anyhow::anyhow!("no filing records found for [{symbol}]")
            })
    };
    let (d1, d2) = (history(&first)?, history(&second)?);

    let mut pair = Pair::with_config(&first, &second, d1, d2, &config)?;
    pair.generate_markers();
    let rel = *pair.calculate_relationship();

    let label = pair.label();
    println!("------------------------------------");
    for marker in pair.markers() {
        println!(
            "[{label}]: {}  Pos: {}   Neg: {}",
            marker.date1, rel.perc_pos, rel.perc_neg
        );
    }
    println!(
        "------------------------------------\n\
        {} markers ({} without price data), {} positive, {} negative",
        pair.markers().len(),
        rel.invalid,
        rel.total_pos,
        rel.total_neg
    );

    Ok(())
}

// environment settings, overridden by any cli input
fn config(source: &Source) -> anyhow::Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(dir) = &source.dir {
        config.data_dir = dir.clone();
    }
    if let Some(year_range) = source.year_range {
        config.year_range = year_range.into();
    }
    trace!("running with {config:?}");
    Ok(config)
}

// read the filing records, from a .json universe if provided, otherwise per ticker .csv files
fn load(source: &Source, config: &Config, tickers: &[String]) -> anyhow::Result<Universe> {
    match &source.input {
        Some(path) => {
            info!("reading ticker universe from {} ...", path.display());
            read_json(path)
        }
        None if tickers.is_empty() => {
            error!("no tickers provided");
            Err(anyhow::anyhow!(
                "provide tickers to compare, or a universe file with --input"
            ))
        }
        None => {
            info!(
                "reading filing records from {} ...",
                config.data_dir.display()
            );
            read_dir_universe(&config.data_dir, tickers)
        }
    }
}
