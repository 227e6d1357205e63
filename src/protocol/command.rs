//! Command definitions
//!
//! Parses request token vectors into typed commands. All argument
//! validation happens here, before any container is touched: a
//! malformed score, rank, bound, or trailing modifier rejects the whole
//! request.

use bytes::Bytes;

use crate::container::{Projection, ScoreRange};
use crate::error::{Result, ScoreKvError};

/// A parsed command.
///
/// The `T*` family addresses map containers (arbitrary double scores),
/// the `TS*` family time-series containers (timestamp scores). Both
/// share the same argument conventions.
#[derive(Debug, Clone)]
pub enum Command {
    /// Health check
    Ping,

    // -------------------------------------------------------------------------
    // Map commands
    // -------------------------------------------------------------------------
    /// Number of entries in a map
    TLen { key: Bytes },

    /// Add or update (score, value) pairs
    TAdd { key: Bytes, pairs: Vec<(f64, Bytes)> },

    /// Whether a score is present
    TExists { key: Bytes, score: f64 },

    /// Value at a score
    TGet { key: Bytes, score: f64 },

    /// Value of the lowest-scored entry
    THead { key: Bytes },

    /// Value of the highest-scored entry
    TTail { key: Bytes },

    /// Entries between two signed ranks
    TRange {
        key: Bytes,
        start: i64,
        end: i64,
        projection: Projection,
    },

    /// Entries between two score bounds
    TRangeByScore {
        key: Bytes,
        range: ScoreRange,
        projection: Projection,
    },

    /// Count of entries between two score bounds
    TCount { key: Bytes, range: ScoreRange },

    // -------------------------------------------------------------------------
    // Time-series commands
    // -------------------------------------------------------------------------
    /// Number of observations in a series
    TsLen { key: Bytes },

    /// Add or update (time, value) pairs
    TsAdd { key: Bytes, pairs: Vec<(f64, Bytes)> },

    /// Whether an observation at a time is present
    TsExists { key: Bytes, time: f64 },

    /// 1-based position a time holds or would hold
    TsRank { key: Bytes, time: f64 },

    /// Value at a time
    TsGet { key: Bytes, time: f64 },

    /// Observations between two signed ranks
    TsRange {
        key: Bytes,
        start: i64,
        end: i64,
        projection: Projection,
    },

    /// Observations between two time bounds
    TsRangeByTime {
        key: Bytes,
        range: ScoreRange,
        projection: Projection,
    },

    /// Count of observations between two time bounds
    TsCount { key: Bytes, range: ScoreRange },
}

impl Command {
    /// Parse a request token vector into a command.
    pub fn parse(args: &[Bytes]) -> Result<Command> {
        let Some(first) = args.first() else {
            return Err(ScoreKvError::Protocol("empty request".to_string()));
        };
        let name = String::from_utf8_lossy(first).to_ascii_uppercase();

        match name.as_str() {
            "PING" => {
                expect_arity(args, 1, &name)?;
                Ok(Command::Ping)
            }

            "TLEN" => {
                expect_arity(args, 2, &name)?;
                Ok(Command::TLen {
                    key: args[1].clone(),
                })
            }
            "TSLEN" => {
                expect_arity(args, 2, &name)?;
                Ok(Command::TsLen {
                    key: args[1].clone(),
                })
            }

            "THEAD" => {
                expect_arity(args, 2, &name)?;
                Ok(Command::THead {
                    key: args[1].clone(),
                })
            }
            "TTAIL" => {
                expect_arity(args, 2, &name)?;
                Ok(Command::TTail {
                    key: args[1].clone(),
                })
            }

            "TADD" => {
                let (key, pairs) = parse_add(args, &name)?;
                Ok(Command::TAdd { key, pairs })
            }
            "TSADD" => {
                let (key, pairs) = parse_add(args, &name)?;
                Ok(Command::TsAdd { key, pairs })
            }

            "TEXISTS" => {
                expect_arity(args, 3, &name)?;
                Ok(Command::TExists {
                    key: args[1].clone(),
                    score: parse_score(&args[2])?,
                })
            }
            "TSEXISTS" => {
                expect_arity(args, 3, &name)?;
                Ok(Command::TsExists {
                    key: args[1].clone(),
                    time: parse_score(&args[2])?,
                })
            }

            "TGET" => {
                expect_arity(args, 3, &name)?;
                Ok(Command::TGet {
                    key: args[1].clone(),
                    score: parse_score(&args[2])?,
                })
            }
            "TSGET" => {
                expect_arity(args, 3, &name)?;
                Ok(Command::TsGet {
                    key: args[1].clone(),
                    time: parse_score(&args[2])?,
                })
            }

            "TSRANK" => {
                expect_arity(args, 3, &name)?;
                Ok(Command::TsRank {
                    key: args[1].clone(),
                    time: parse_score(&args[2])?,
                })
            }

            "TRANGE" => {
                let (key, start, end, projection) = parse_rank_range(args, &name)?;
                Ok(Command::TRange {
                    key,
                    start,
                    end,
                    projection,
                })
            }
            "TSRANGE" => {
                let (key, start, end, projection) = parse_rank_range(args, &name)?;
                Ok(Command::TsRange {
                    key,
                    start,
                    end,
                    projection,
                })
            }

            "TRANGEBYSCORE" => {
                let (key, range, projection) = parse_score_range(args, &name)?;
                Ok(Command::TRangeByScore {
                    key,
                    range,
                    projection,
                })
            }
            "TSRANGEBYTIME" => {
                let (key, range, projection) = parse_score_range(args, &name)?;
                Ok(Command::TsRangeByTime {
                    key,
                    range,
                    projection,
                })
            }

            "TCOUNT" => {
                expect_arity(args, 4, &name)?;
                let range = parse_bounds(&args[2], &args[3])?;
                Ok(Command::TCount {
                    key: args[1].clone(),
                    range,
                })
            }
            "TSCOUNT" => {
                expect_arity(args, 4, &name)?;
                let range = parse_bounds(&args[2], &args[3])?;
                Ok(Command::TsCount {
                    key: args[1].clone(),
                    range,
                })
            }

            _ => Err(ScoreKvError::UnknownCommand(
                String::from_utf8_lossy(first).into_owned(),
            )),
        }
    }
}

// =============================================================================
// Argument parsing
// =============================================================================

fn expect_arity(args: &[Bytes], expected: usize, name: &str) -> Result<()> {
    if args.len() != expected {
        return Err(ScoreKvError::WrongArity(name.to_ascii_lowercase()));
    }
    Ok(())
}

/// `<cmd> key score value [score value ...]`
fn parse_add(args: &[Bytes], name: &str) -> Result<(Bytes, Vec<(f64, Bytes)>)> {
    if args.len() < 4 || args.len() % 2 != 0 {
        return Err(ScoreKvError::WrongArity(name.to_ascii_lowercase()));
    }
    let key = args[1].clone();
    let mut pairs = Vec::with_capacity((args.len() - 2) / 2);
    for chunk in args[2..].chunks_exact(2) {
        pairs.push((parse_score(&chunk[0])?, chunk[1].clone()));
    }
    Ok((key, pairs))
}

/// `<cmd> key start end [withscores|novalues]`
fn parse_rank_range(args: &[Bytes], name: &str) -> Result<(Bytes, i64, i64, Projection)> {
    if args.len() < 4 {
        return Err(ScoreKvError::WrongArity(name.to_ascii_lowercase()));
    }
    let start = parse_rank(&args[2])?;
    let end = parse_rank(&args[3])?;
    let projection = parse_modifiers(&args[4..])?;
    Ok((args[1].clone(), start, end, projection))
}

/// `<cmd> key min max [withscores|novalues]`
fn parse_score_range(args: &[Bytes], name: &str) -> Result<(Bytes, ScoreRange, Projection)> {
    if args.len() < 4 {
        return Err(ScoreKvError::WrongArity(name.to_ascii_lowercase()));
    }
    let range = parse_bounds(&args[2], &args[3])?;
    let projection = parse_modifiers(&args[4..])?;
    Ok((args[1].clone(), range, projection))
}

/// Parse a score token. Accepts the usual double spellings plus
/// `inf`/`+inf`/`-inf`; NaN is never a valid score.
pub(crate) fn parse_score(token: &[u8]) -> Result<f64> {
    let text = std::str::from_utf8(token).map_err(|_| ScoreKvError::NotADouble)?;
    let value: f64 = text.trim().parse().map_err(|_| ScoreKvError::NotADouble)?;
    if value.is_nan() {
        return Err(ScoreKvError::NotADouble);
    }
    Ok(value)
}

/// Parse a signed rank token.
fn parse_rank(token: &[u8]) -> Result<i64> {
    let text = std::str::from_utf8(token).map_err(|_| ScoreKvError::NotAnInteger)?;
    text.trim().parse().map_err(|_| ScoreKvError::NotAnInteger)
}

/// Parse one score bound; a leading `(` makes it exclusive.
fn parse_bound(token: &[u8]) -> Result<(f64, bool)> {
    match token.split_first() {
        Some((b'(', rest)) => Ok((parse_score(rest)?, true)),
        _ => Ok((parse_score(token)?, false)),
    }
}

fn parse_bounds(min: &[u8], max: &[u8]) -> Result<ScoreRange> {
    let (min, min_exclusive) = parse_bound(min)?;
    let (max, max_exclusive) = parse_bound(max)?;
    Ok(ScoreRange {
        min,
        max,
        min_exclusive,
        max_exclusive,
    })
}

/// Parse trailing range modifiers. `withscores` adds scores to the
/// output, `novalues` drops values (implying scores); anything else is
/// a syntax error. No modifier means values only.
fn parse_modifiers(rest: &[Bytes]) -> Result<Projection> {
    let mut with_scores = false;
    let mut with_values = true;
    for token in rest {
        if token.eq_ignore_ascii_case(b"withscores") {
            with_scores = true;
        } else if token.eq_ignore_ascii_case(b"novalues") {
            with_scores = true;
            with_values = false;
        } else {
            return Err(ScoreKvError::Syntax);
        }
    }
    Ok(Projection {
        include_scores: with_scores,
        include_values: with_values,
    }
    .resolve())
}
