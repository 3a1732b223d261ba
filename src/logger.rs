use std::env;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use anyhow::{Context, Result};
use env_logger::Builder;

use crate::{
    config::Configuration,
    message::LogMessage,
    traits::ScrapeSerialize,
    utils::{fmt_err, write_to},
};

/// map the number of -v's to a RUST_LOG directive, `None` means logging stays off
pub fn verbosity_to_directive(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("linkscrape=debug,info"),
        _ => Some("linkscrape=trace,info"),
    }
}

/// Create a customized instance of
/// [env_logger::Logger](https://docs.rs/env_logger/latest/env_logger/struct.Logger.html)
/// with timer offset/color and set the log level based on `verbosity`
pub fn initialize(config: Arc<Configuration>) -> Result<()> {
    // use occurrences of -v on commandline or verbosity = N in linkscrape.toml to set
    // log level for the application; respects already specified RUST_LOG environment variable
    if env::var("RUST_LOG").is_err() {
        if let Some(directive) = verbosity_to_directive(config.verbosity) {
            env::set_var("RUST_LOG", directive);
        }
    }

    let start = Instant::now();
    let mut builder = Builder::from_default_env();

    let file = if !config.debug_log.is_empty() {
        let f = OpenOptions::new() // std fs
            .create(true)
            .append(true)
            .open(&config.debug_log)
            .with_context(|| fmt_err(&format!("Could not open {}", &config.debug_log)))?;

        let mut writer = BufWriter::new(f);

        // write out the configuration to the debug file if it exists
        write_to(&*config, &mut writer, config.json)?;

        Some(Arc::new(RwLock::new(writer)))
    } else {
        None
    };

    builder
        .format(move |_, record| {
            let log_entry = LogMessage {
                message: record.args().to_string(),
                level: record.level().to_string(),
                time_offset: start.elapsed().as_secs_f32(),
                module: record.target().to_string(),
                kind: "log".to_string(),
            };

            // results go to stdout; logs stay out of the way on stderr
            eprint!("{}", log_entry.as_str());

            if let Some(buffered_file) = file.clone() {
                if let Ok(mut unlocked) = buffered_file.write() {
                    let _ = write_to(&log_entry, &mut *unlocked, config.json);
                }
            }

            Ok(())
        })
        .init();

    Ok(())
}
