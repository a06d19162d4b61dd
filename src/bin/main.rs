#[macro_use]
extern crate log;

use std::env;
use std::io::{BufReader, IsTerminal, Write};

use betterselect::prelude::*;
use clap::Parser;
use color_eyre::eyre::{Result, bail};

//------------------------------------------------------------------------------
fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::builder().format_timestamp_nanos().init();

    match real_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // downstream pipe closed: exit silently
            if err
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::BrokenPipe)
            {
                std::process::exit(0)
            }
            Err(err)
        }
    }
}

fn parse_args() -> SelectOptions {
    let mut args = Vec::new();

    args.extend(env::args().next());
    args.extend(
        env::var("BSEL_DEFAULT_OPTIONS")
            .ok()
            .and_then(|val| shlex::split(&val))
            .unwrap_or_default(),
    );
    args.extend(env::args().skip(1));

    SelectOptions::parse_from(args)
}

fn read_source(opts: &SelectOptions) -> Result<SelectSource> {
    if let Some(path) = &opts.source {
        debug!("reading source from {}", path.display());
        return Ok(SelectSource::from_path(path)?);
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() && opts.url.is_none() {
        bail!("nothing to select: pipe options on stdin, or pass --source or --url");
    }
    if stdin.is_terminal() {
        return Ok(SelectSource::default());
    }
    Ok(SelectSource::from_lines(&opts.name, BufReader::new(stdin.lock()))?)
}

fn real_main() -> Result<i32> {
    let opts = parse_args();
    let source = read_source(&opts)?;
    debug!("{} declared options", source.options.len());

    let output = BetterSelect::run_with(opts, source)?;
    if output.is_abort {
        return Ok(130);
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}")?;
    stdout.flush()?;
    Ok(0)
}
