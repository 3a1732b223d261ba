use std::{io::stdout, process::exit, sync::Arc};

use anyhow::Result;

use linkscrape::{
    config::{parse_time_limit, Configuration},
    logger,
    patterns::compile_all,
    reporter::Reporter,
    scanner::Scraper,
    targets,
    utils::fmt_err,
};

/// resolve targets, compile patterns, build the client and hand everything to the Scraper
///
/// any error returned from here stops the run before or between batches; per-url failures are
/// reported by the Scraper and never surface here
async fn wrapped_main(config: Arc<Configuration>) -> Result<()> {
    log::trace!("enter: wrapped_main");

    // nothing is fetched until the targets are known to be valid
    let targets = targets::resolve(config.url(), config.file())?;
    let patterns = compile_all(&config.patterns)?;
    let client = config.build_client()?;

    log::debug!(
        "scraping {} url(s) for {} pattern(s)",
        targets.len(),
        patterns.len()
    );

    let scraper = Scraper::new(
        client,
        patterns,
        config.parallel,
        parse_time_limit(&config.time_limit),
    );

    let mut reporter = Reporter::new(&config, stdout())?;

    scraper.run(&targets, &mut reporter).await?;

    log::trace!("exit: wrapped_main");
    Ok(())
}

fn main() {
    let config = match Configuration::new() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("{:#}", e);
            exit(1);
        }
    };

    // setup logging based on the number of -v's used
    if let Err(e) = logger::initialize(config.clone()) {
        eprintln!("{:#}", e);
        exit(1);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", fmt_err(&format!("Could not start the async runtime: {}", e)));
            exit(1);
        }
    };

    if let Err(e) = runtime.block_on(wrapped_main(config)) {
        eprintln!("{}", fmt_err(&format!("{:#}", e)));
        exit(1);
    }

    log::trace!("exit: main");
}
