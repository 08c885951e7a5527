use std::{path::PathBuf, process::ExitCode};

use bin2src::{Language, encode_file};
use clap::{Parser, error::ErrorKind};

/// Convertit un fichier binaire en tableau d'octets compilable.
#[derive(Parser, Debug)]
#[command(name = "bin2src", version, long_about = None)]
struct Cli {
    /// Nom du symbole généré (`<SYMBOL>` et `<SYMBOL>_size`)
    symbol: String,

    /// Fichier à encoder
    input: PathBuf,

    /// Fichier source à écrire (créé ou tronqué)
    output: PathBuf,

    /// Dialecte de sortie
    #[arg(long, value_enum, default_value_t = Language::Rust)]
    lang: Language,
}

fn run(cli: &Cli) -> anyhow::Result<u64> {
    let total = encode_file(&cli.symbol, &cli.input, &cli.output, cli.lang)?;
    Ok(total)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(&cli) {
        Ok(total) => {
            log::info!("{:?}: {} bytes written as `{}`", cli.output, total, cli.symbol);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("bin2src failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
