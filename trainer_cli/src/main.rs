use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use trainer_cli::{bootstrap, Args, Reply};

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for snapshots
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let mut session = bootstrap(&args)?;
    let started = Instant::now();

    if let Some(keys) = &args.keys {
        if let Reply::Show(output) = session.process_line(keys, started.elapsed())? {
            println!("{output}");
        }
        return Ok(());
    }

    info!("modal trainer starting");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", session.render()?)?;

    for line in stdin.lock().lines() {
        let line = line?;
        match session.process_line(&line, started.elapsed()) {
            Ok(Reply::Show(output)) => writeln!(stdout, "{output}")?,
            Ok(Reply::Exit) => break,
            Err(err) => {
                warn!("{err:#}");
                writeln!(stdout, "error: {err:#}")?;
            }
        }
        stdout.flush()?;
    }

    Ok(())
}
