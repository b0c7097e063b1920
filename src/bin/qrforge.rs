//! Command-line front end: encode payloads, resolve queries, build URLs.

use std::process::ExitCode;

use chrono::FixedOffset;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use qrforge::{negotiate_locale, Encoder, FieldMap, IntentKind, LOCALES, RawParameterBag, Resolver};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "qrforge")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the payload for an intent
    Encode {
        #[arg(value_enum)]
        kind: IntentKind,

        /// Editor field, e.g. `-f networkName=Cafe -f hidden=true`
        #[arg(short, long = "field", value_parser = parse_pair)]
        fields: Vec<(String, String)>,

        /// UTC offset for event dates without one, e.g. `+02:00`
        #[arg(long, value_parser = parse_offset)]
        utc_offset: Option<FixedOffset>,
    },

    /// Resolve a query string and print the resolution as JSON
    Resolve {
        /// Query string, with or without the leading `?`
        query: String,

        #[arg(long)]
        pretty: bool,

        #[arg(long, value_parser = parse_offset)]
        utc_offset: Option<FixedOffset>,
    },

    /// Build a request URL from parameters
    Url {
        /// Service base URL
        #[arg(long, default_value = "http://localhost:3000")]
        base: String,

        /// Query parameter, e.g. `type=wifi`
        #[arg(value_parser = parse_pair)]
        params: Vec<(String, String)>,
    },

    /// List supported locales, or pick one for a list of preferred tags
    Locales {
        #[arg(long = "prefer")]
        preferred: Vec<String>,
    },

    /// Print the JSON schema of a resolution
    #[cfg(feature = "jsonschema")]
    Schema,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

fn parse_offset(raw: &str) -> Result<FixedOffset, String> {
    raw.parse::<FixedOffset>()
        .map_err(|e| format!("invalid UTC offset {raw:?}: {e}"))
}

fn encoder(offset: Option<FixedOffset>) -> Encoder {
    offset.map_or_else(Encoder::default, Encoder::with_local_offset)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Encode {
            kind,
            fields,
            utc_offset,
        } => {
            let fields: FieldMap = fields.into_iter().collect();
            println!("{}", encoder(utc_offset).encode_fields(kind, &fields));
            ExitCode::SUCCESS
        }

        Command::Resolve {
            query,
            pretty,
            utc_offset,
        } => {
            let resolution = Resolver::new(encoder(utc_offset)).resolve(&RawParameterBag::from_query(&query));
            let json = if pretty {
                resolution.to_json_pretty()
            } else {
                resolution.to_json()
            };
            match json {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    eprintln!("error: {err}");
                    return ExitCode::FAILURE;
                }
            }
            match resolution.blocking_issue() {
                Some(issue) => {
                    eprintln!("error: {issue}");
                    ExitCode::FAILURE
                }
                None => ExitCode::SUCCESS,
            }
        }

        Command::Url { base, params } => {
            let bag: RawParameterBag = params.into_iter().collect();
            match bag.generate_url(&base) {
                Ok(url) => {
                    println!("{url}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("error: invalid base URL {base:?}: {err}");
                    ExitCode::FAILURE
                }
            }
        }

        Command::Locales { preferred } => {
            if preferred.is_empty() {
                for locale in &LOCALES {
                    println!("{:<8} {:?} {}", locale.code, locale.direction, locale.name);
                }
            } else {
                println!("{}", negotiate_locale(preferred.iter().map(String::as_str)).code);
            }
            ExitCode::SUCCESS
        }

        #[cfg(feature = "jsonschema")]
        Command::Schema => {
            let schema = schemars::schema_for!(qrforge::Resolution);
            match serde_json::to_string_pretty(&schema) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
