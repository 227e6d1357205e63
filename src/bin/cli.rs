//! ScoreKV CLI Client
//!
//! Command-line interface for interacting with ScoreKV.

use std::net::TcpStream;
use std::process::ExitCode;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use scorekv::protocol::{read_reply, write_request, Reply};

/// ScoreKV CLI
#[derive(Parser, Debug)]
#[command(name = "scorekv-cli")]
#[command(about = "CLI for the ScoreKV container store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7379")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping,

    /// Number of entries in a map
    Tlen { key: String },

    /// Add (score, value) pairs to a map
    Tadd {
        key: String,
        /// Alternating score value [score value ...]
        #[arg(required = true, num_args = 2..)]
        pairs: Vec<String>,
    },

    /// Check whether a score exists in a map
    Texists { key: String, score: String },

    /// Get the value at a score
    Tget { key: String, score: String },

    /// Value of the lowest-scored entry
    Thead { key: String },

    /// Value of the highest-scored entry
    Ttail { key: String },

    /// Entries between two ranks (negative ranks count from the end)
    Trange {
        key: String,
        start: String,
        end: String,
        /// Optional modifier: withscores or novalues
        modifier: Option<String>,
    },

    /// Entries between two score bounds ('(' prefix makes a bound exclusive)
    Trangebyscore {
        key: String,
        min: String,
        max: String,
        /// Optional modifier: withscores or novalues
        modifier: Option<String>,
    },

    /// Count entries between two score bounds
    Tcount { key: String, min: String, max: String },

    /// Number of observations in a time series
    Tslen { key: String },

    /// Add (time, value) pairs to a time series
    Tsadd {
        key: String,
        /// Alternating time value [time value ...]
        #[arg(required = true, num_args = 2..)]
        pairs: Vec<String>,
    },

    /// Check whether an observation exists at a time
    Tsexists { key: String, time: String },

    /// 1-based position a time holds or would hold
    Tsrank { key: String, time: String },

    /// Get the value at a time
    Tsget { key: String, time: String },

    /// Observations between two ranks
    Tsrange {
        key: String,
        start: String,
        end: String,
        /// Optional modifier: withscores or novalues
        modifier: Option<String>,
    },

    /// Observations between two time bounds
    Tsrangebytime {
        key: String,
        min: String,
        max: String,
        /// Optional modifier: withscores or novalues
        modifier: Option<String>,
    },

    /// Count observations between two time bounds
    Tscount { key: String, min: String, max: String },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let tokens = to_tokens(args.command);

    let stream = match TcpStream::connect(&args.server) {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("Could not connect to {}: {}", args.server, e);
            return ExitCode::FAILURE;
        }
    };

    let mut reader = std::io::BufReader::new(match stream.try_clone() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Connection error: {}", e);
            return ExitCode::FAILURE;
        }
    });
    let mut writer = std::io::BufWriter::new(stream);

    if let Err(e) = write_request(&mut writer, &tokens) {
        eprintln!("Failed to send request: {}", e);
        return ExitCode::FAILURE;
    }

    match read_reply(&mut reader) {
        Ok(reply) => {
            let failed = reply.is_error();
            print_reply(&reply, 0);
            if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Failed to read reply: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Flatten a parsed subcommand back into wire tokens.
fn to_tokens(command: Commands) -> Vec<Bytes> {
    let mut tokens: Vec<String> = Vec::new();
    match command {
        Commands::Ping => tokens.push("PING".into()),
        Commands::Tlen { key } => tokens.extend(["TLEN".into(), key]),
        Commands::Tadd { key, pairs } => {
            tokens.extend(["TADD".into(), key]);
            tokens.extend(pairs);
        }
        Commands::Texists { key, score } => tokens.extend(["TEXISTS".into(), key, score]),
        Commands::Tget { key, score } => tokens.extend(["TGET".into(), key, score]),
        Commands::Thead { key } => tokens.extend(["THEAD".into(), key]),
        Commands::Ttail { key } => tokens.extend(["TTAIL".into(), key]),
        Commands::Trange {
            key,
            start,
            end,
            modifier,
        } => {
            tokens.extend(["TRANGE".into(), key, start, end]);
            tokens.extend(modifier);
        }
        Commands::Trangebyscore {
            key,
            min,
            max,
            modifier,
        } => {
            tokens.extend(["TRANGEBYSCORE".into(), key, min, max]);
            tokens.extend(modifier);
        }
        Commands::Tcount { key, min, max } => tokens.extend(["TCOUNT".into(), key, min, max]),
        Commands::Tslen { key } => tokens.extend(["TSLEN".into(), key]),
        Commands::Tsadd { key, pairs } => {
            tokens.extend(["TSADD".into(), key]);
            tokens.extend(pairs);
        }
        Commands::Tsexists { key, time } => tokens.extend(["TSEXISTS".into(), key, time]),
        Commands::Tsrank { key, time } => tokens.extend(["TSRANK".into(), key, time]),
        Commands::Tsget { key, time } => tokens.extend(["TSGET".into(), key, time]),
        Commands::Tsrange {
            key,
            start,
            end,
            modifier,
        } => {
            tokens.extend(["TSRANGE".into(), key, start, end]);
            tokens.extend(modifier);
        }
        Commands::Tsrangebytime {
            key,
            min,
            max,
            modifier,
        } => {
            tokens.extend(["TSRANGEBYTIME".into(), key, min, max]);
            tokens.extend(modifier);
        }
        Commands::Tscount { key, min, max } => tokens.extend(["TSCOUNT".into(), key, min, max]),
    }
    tokens.into_iter().map(Bytes::from).collect()
}

/// Print a reply the way redis-cli would.
fn print_reply(reply: &Reply, index: usize) {
    let prefix = if index > 0 {
        format!("{}) ", index)
    } else {
        String::new()
    };
    match reply {
        Reply::Ok => println!("{}OK", prefix),
        Reply::Integer(value) => println!("{}(integer) {}", prefix, value),
        Reply::Bulk(payload) => println!("{}\"{}\"", prefix, String::from_utf8_lossy(payload)),
        Reply::Nil => println!("{}(nil)", prefix),
        Reply::Array(items) if items.is_empty() => println!("{}(empty array)", prefix),
        Reply::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                print_reply(item, i + 1);
            }
        }
        Reply::Error(message) => println!("{}(error) {}", prefix, message),
    }
}
