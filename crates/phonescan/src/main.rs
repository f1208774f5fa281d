use anyhow::Context;
use clap::Parser;
use phonescan::cancel::CancelFlag;
use phonescan::cli::Cli;
use phonescan::error::ExitCode;
use phonescan::extract::Found;
use phonescan::output::{Reporter, Sink};
use phonescan::scan::{ScanStats, Scanner};
use phonescan::Grammar;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("PHONESCAN_LOG").unwrap_or_else(|_| EnvFilter::new("off"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    // Reset SIGPIPE handler to default (terminate) so piping to head/tail works correctly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    init_logging();
    let cli = Cli::parse();

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("phonescan: {:#}", e);
            ExitCode::Fatal
        }
    };

    std::process::exit(exit_code as i32);
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || handler_flag.raise())
        .context("failed to install Ctrl-C handler")?;

    let pattern = Grammar::indian().compile()?;
    debug!(pattern = pattern.as_str(), "compiled phone pattern");
    let scanner = Scanner::new(&pattern, cli.extension()).with_cancel(cancel.clone());

    let use_color = !cli.no_color && atty::is(atty::Stream::Stderr);
    let mut reporter = Reporter::new(use_color, cli.verbose);
    let start_time = Instant::now();

    let stats = if cli.parallel {
        let results = scanner.scan_parallel(&cli.root)?;
        let mut stats = ScanStats::default();
        results.iter().for_each(|result| stats.record(result));

        let items = results.into_iter().flat_map(|result| match result {
            Ok(matches) => matches.into_found().map(Ok).collect::<Vec<_>>(),
            Err(err) => vec![Err(err)],
        });
        let mut sink = open_sink(cli)?;
        drain(items, &mut sink, &mut reporter, cli.fail_fast)?;
        sink.finish()?;
        stats
    } else {
        let mut scan = scanner.scan(&cli.root)?;
        let mut sink = open_sink(cli)?;
        drain(scan.by_ref(), &mut sink, &mut reporter, cli.fail_fast)?;
        sink.finish()?;
        scan.stats().clone()
    };

    reporter.summary(&stats, start_time.elapsed());

    if cancel.is_raised() {
        reporter.interrupted();
        return Ok(ExitCode::Interrupted);
    }
    Ok(if stats.errors > 0 {
        ExitCode::ReadErrors
    } else {
        ExitCode::Success
    })
}

fn open_sink(cli: &Cli) -> anyhow::Result<Sink> {
    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout()),
    };
    Ok(Sink::new(cli.format(), writer))
}

fn drain<I>(
    items: I,
    sink: &mut Sink,
    reporter: &mut Reporter,
    fail_fast: bool,
) -> phonescan::Result<()>
where
    I: Iterator<Item = phonescan::Result<Found>>,
{
    for item in items {
        match item {
            Ok(found) => sink.write(&found)?,
            Err(err) if !err.is_per_entry() => return Err(err),
            Err(err) => {
                reporter.error(&err);
                if fail_fast {
                    break;
                }
            }
        }
    }
    Ok(())
}
