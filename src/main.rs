use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use twitter_direct::classify;
use twitter_direct::config::Config;
use twitter_direct::diagnostics;
use twitter_direct::error::Error;
use twitter_direct::intercept::Interceptor;
use twitter_direct::replacer::Replacer;

#[derive(Parser)]
#[command(name = "twitter-direct", about = "Expand t.co links in a saved Twitter API response")]
struct Cli {
    /// JSON document to transform
    path: PathBuf,

    /// Built-in profile to use (overrides `.twitter-direct.toml`)
    #[arg(long)]
    profile: Option<String>,

    /// URL the document was fetched from; classifies it and applies the blacklist
    #[arg(long)]
    request_url: Option<String>,

    /// Write the transformed document to this file
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    }
}

/// Read the document, transform it, report the count.
///
/// # Errors
///
/// Returns errors from config loading, reading or parsing the document, or
/// writing the output file.
fn run(cli: &Cli) -> Result<(), Error> {
    let config = Config::load(Path::new("."), cli.profile.as_deref())?;
    let mut document = read_document(&cli.path)?;
    let interceptor = Interceptor::new(Replacer::new(config.profile), &config.blacklist);

    let label = match &cli.request_url {
        Some(url) => classify::document_type(url),
        None => cli.path.display().to_string(),
    };
    if cli.request_url.is_some() && interceptor.is_blacklisted(&label) {
        println!("skipped {} ({label} is blacklisted)", cli.path.display());
        return Ok(());
    }

    let outcome = interceptor.replacer().transform(&mut document, &label);
    println!("replaced {} url(s) in {}", outcome.count, cli.path.display());

    if let Some(output) = &cli.output {
        let json = serde_json::to_string_pretty(&document)?;
        std::fs::write(output, json)?;
    }
    return Ok(());
}

/// Read and parse a JSON document from disk.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the file doesn't exist, `Error::Io` for
/// other read failures, or `Error::InvalidJson` if it doesn't parse.
fn read_document(path: &Path) -> Result<Value, Error> {
    let content = match std::fs::read_to_string(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound { path: path.to_path_buf() });
        },
        Err(e) => return Err(Error::Io(e)),
        Ok(c) => c,
    };
    return serde_json::from_str(&content)
        .map_err(|source| return Error::InvalidJson { path: path.to_path_buf(), source });
}
