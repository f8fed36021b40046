use clap::Parser;
use currency_path_converter::{ConverterConfig, ConverterKind, CurrencyId, MAX_NODES};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(long, env = "CONVERTER_QUOTES", help = "CSV file of direct quotes with a from,to,rate header")]
    pub quotes: PathBuf,

    #[clap(long, env = "CONVERTER_KIND", default_value = "sparse", help = "Path engine to use (dense or sparse)")]
    pub kind: ConverterKind,

    #[clap(long, env = "CONVERTER_MAX_NODES", default_value_t = MAX_NODES, help = "Number of currency slots; every id must be below this")]
    pub max_nodes: usize,

    #[clap(long, help = "Currency to convert from")]
    pub from: CurrencyId,

    #[clap(long, required = true, value_delimiter = ',', help = "Comma-separated list of currencies to convert into")]
    pub to: Vec<CurrencyId>,

    #[clap(long, default_value_t = 1.0, help = "Amount of the source currency")]
    pub amount: f64,

    #[clap(long, help = "Print each conversion and its hop chain as JSON")]
    pub json: bool,
}

impl Args {
    /// Engine selection taken from the parsed arguments
    pub fn config(&self) -> ConverterConfig {
        ConverterConfig {
            kind: self.kind,
            max_nodes: self.max_nodes,
        }
    }
}

pub fn parse_cli_args() -> Args {
    let args = Args::parse();
    tracing::debug!(
        quotes = %args.quotes.display(),
        kind = %args.kind,
        max_nodes = args.max_nodes,
        from = args.from,
        targets = ?args.to,
        "Parsed CLI arguments"
    );
    args
}
