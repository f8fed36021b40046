pub mod cli;

use currency_path_converter::errors::Result;
use currency_path_converter::{load_quotes_from_path, Converter, ConverterBuilder};
use serde::Serialize;
use tracing_subscriber::filter::Directive;

/// One answered conversion, as printed with `--json`
#[derive(Serialize)]
struct ConversionReport {
    from: usize,
    to: usize,
    amount: f64,
    value: f64,
    path: Option<Vec<usize>>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(
                    "currency_path_converter=info"
                        .parse::<Directive>()
                        .map_err(anyhow::Error::from)?,
                ),
        )
        .compact()
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .init();

    let args = cli::parse_cli_args();
    let config = args.config();
    config.validate()?;

    let book = load_quotes_from_path(&args.quotes)?;
    tracing::info!(
        quote_count = book.len(),
        max_currency = ?book.max_currency(),
        "Quote file loaded"
    );

    let converter = ConverterBuilder::new()
        .config(&config)
        .add_rates(book.rates)
        .build()?;

    for &to in &args.to {
        let value = converter.convert(args.amount, args.from, to)?;
        let path = converter.path(args.from, to)?;

        if args.json {
            let report = ConversionReport {
                from: args.from,
                to,
                amount: args.amount,
                value,
                path: path.as_ref().map(|path| path.currencies()),
            };
            println!("{}", serde_json::to_string(&report)?);
            continue;
        }

        match path {
            Some(path) if value != 0.0 => {
                println!("{} {} = {} {}  via {}", args.amount, args.from, value, to, path);
            }
            Some(path) => {
                tracing::warn!(from = args.from, to = to, path = %path, "A rate on the path is unavailable");
                println!("{} {} -> {}: rate unavailable", args.amount, args.from, to);
            }
            None => {
                println!("{} {} -> {}: no conversion path", args.amount, args.from, to);
            }
        }
    }

    Ok(())
}
