//! Integration Tests
//!
//! End-to-end tests:
//! - Command flows through the engine (parse → dispatch → reply)
//! - Type separation between map and time-series keys
//! - Full TCP round trip against a running server

use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread;

use bytes::Bytes;
use scorekv::network::Server;
use scorekv::protocol::{read_reply, write_request, Command, Reply};
use scorekv::{Config, Engine};

fn run(engine: &Engine, parts: &[&str]) -> Reply {
    let tokens: Vec<Bytes> = parts.iter().map(|p| Bytes::from(p.to_string())).collect();
    match Command::parse(&tokens) {
        Ok(command) => engine.execute(command),
        Err(e) => Reply::error(e.to_string()),
    }
}

fn bulk(bytes: &'static [u8]) -> Reply {
    Reply::Bulk(Bytes::from_static(bytes))
}

// =============================================================================
// Engine Command Flow Tests
// =============================================================================

#[test]
fn test_map_command_flow() {
    let engine = Engine::new();

    assert_eq!(run(&engine, &["TLEN", "prices"]), Reply::Integer(0));
    assert_eq!(
        run(&engine, &["TADD", "prices", "1", "a", "2", "b", "3", "c"]),
        Reply::Ok
    );
    assert_eq!(run(&engine, &["TLEN", "prices"]), Reply::Integer(3));
    assert_eq!(run(&engine, &["TEXISTS", "prices", "2"]), Reply::Integer(1));
    assert_eq!(run(&engine, &["TEXISTS", "prices", "9"]), Reply::Integer(0));
    assert_eq!(run(&engine, &["TGET", "prices", "2"]), bulk(b"b"));
    assert_eq!(run(&engine, &["TGET", "prices", "9"]), Reply::Nil);
    assert_eq!(run(&engine, &["THEAD", "prices"]), bulk(b"a"));
    assert_eq!(run(&engine, &["TTAIL", "prices"]), bulk(b"c"));
}

#[test]
fn test_trange_flow() {
    let engine = Engine::new();
    run(&engine, &["TADD", "m", "1", "a", "2", "b", "3", "c"]);

    assert_eq!(
        run(&engine, &["TRANGE", "m", "0", "1"]),
        Reply::Array(vec![bulk(b"a"), bulk(b"b")])
    );
    assert_eq!(
        run(&engine, &["TRANGE", "m", "-1", "-1"]),
        Reply::Array(vec![bulk(b"c")])
    );
    assert_eq!(
        run(&engine, &["TRANGE", "m", "5", "10"]),
        Reply::Array(Vec::new())
    );
    assert_eq!(
        run(&engine, &["TRANGE", "m", "0", "0", "withscores"]),
        Reply::Array(vec![bulk(b"1"), bulk(b"a")])
    );
    assert_eq!(
        run(&engine, &["TRANGE", "m", "0", "-1", "novalues"]),
        Reply::Array(vec![bulk(b"1"), bulk(b"2"), bulk(b"3")])
    );
}

#[test]
fn test_trangebyscore_and_tcount_flow() {
    let engine = Engine::new();
    run(&engine, &["TADD", "m", "1", "a", "2", "b", "3", "c"]);

    assert_eq!(
        run(&engine, &["TRANGEBYSCORE", "m", "1", "(3"]),
        Reply::Array(vec![bulk(b"a"), bulk(b"b")])
    );
    assert_eq!(
        run(&engine, &["TRANGEBYSCORE", "m", "(1", "inf"]),
        Reply::Array(vec![bulk(b"b"), bulk(b"c")])
    );
    assert_eq!(
        run(&engine, &["TCOUNT", "m", "-inf", "+inf"]),
        Reply::Integer(3)
    );
    assert_eq!(run(&engine, &["TCOUNT", "m", "(1", "(3"]), Reply::Integer(1));
}

#[test]
fn test_tadd_updates_existing_score() {
    let engine = Engine::new();
    run(&engine, &["TADD", "m", "1", "old"]);
    run(&engine, &["TADD", "m", "1", "new"]);

    assert_eq!(run(&engine, &["TLEN", "m"]), Reply::Integer(1));
    assert_eq!(run(&engine, &["TGET", "m", "1"]), bulk(b"new"));
}

#[test]
fn test_reads_on_missing_key_do_not_create_it() {
    let engine = Engine::new();

    assert_eq!(run(&engine, &["TGET", "ghost", "1"]), Reply::Nil);
    assert_eq!(run(&engine, &["THEAD", "ghost"]), Reply::Array(Vec::new()));
    assert_eq!(
        run(&engine, &["TRANGE", "ghost", "0", "-1"]),
        Reply::Array(Vec::new())
    );
    assert_eq!(
        run(&engine, &["TCOUNT", "ghost", "-inf", "inf"]),
        Reply::Integer(0)
    );
    // Still absent: a later TADD reports an insert-from-empty length.
    run(&engine, &["TADD", "ghost", "1", "a"]);
    assert_eq!(run(&engine, &["TLEN", "ghost"]), Reply::Integer(1));
}

#[test]
fn test_error_replies() {
    let engine = Engine::new();
    run(&engine, &["TADD", "m", "1", "a"]);

    // Malformed score.
    let reply = run(&engine, &["TADD", "m", "abc", "x"]);
    assert!(reply.is_error());
    assert_eq!(run(&engine, &["TLEN", "m"]), Reply::Integer(1));

    // Unknown command.
    assert!(run(&engine, &["NOPE"]).is_error());

    // Bad trailing modifier.
    assert!(run(&engine, &["TRANGE", "m", "0", "-1", "everything"]).is_error());
}

// =============================================================================
// Time-Series Flow Tests
// =============================================================================

#[test]
fn test_timeseries_command_flow() {
    let engine = Engine::new();

    assert_eq!(
        run(&engine, &["TSADD", "temps", "1000", "20.5", "2000", "21.0"]),
        Reply::Ok
    );
    assert_eq!(run(&engine, &["TSLEN", "temps"]), Reply::Integer(2));
    assert_eq!(run(&engine, &["TSGET", "temps", "1000"]), bulk(b"20.5"));
    assert_eq!(
        run(&engine, &["TSEXISTS", "temps", "2000"]),
        Reply::Integer(1)
    );
    assert_eq!(
        run(&engine, &["TSRANGE", "temps", "0", "-1"]),
        Reply::Array(vec![bulk(b"20.5"), bulk(b"21.0")])
    );
    assert_eq!(
        run(&engine, &["TSRANGEBYTIME", "temps", "1500", "inf"]),
        Reply::Array(vec![bulk(b"21.0")])
    );
    assert_eq!(
        run(&engine, &["TSCOUNT", "temps", "-inf", "inf"]),
        Reply::Integer(2)
    );
}

#[test]
fn test_tsrank_flow() {
    let engine = Engine::new();
    run(&engine, &["TSADD", "t", "1000", "a", "2000", "b", "3000", "c"]);

    assert_eq!(run(&engine, &["TSRANK", "t", "1000"]), Reply::Integer(1));
    assert_eq!(run(&engine, &["TSRANK", "t", "2500"]), Reply::Integer(3));
    assert_eq!(run(&engine, &["TSRANK", "t", "9000"]), Reply::Integer(4));
    // Missing key reports 0.
    assert_eq!(run(&engine, &["TSRANK", "nope", "1"]), Reply::Integer(0));
}

// =============================================================================
// Type Separation Tests
// =============================================================================

#[test]
fn test_wrong_type_across_families() {
    let engine = Engine::new();
    run(&engine, &["TADD", "shared", "1", "a"]);

    let reply = run(&engine, &["TSADD", "shared", "1000", "x"]);
    match reply {
        Reply::Error(message) => assert!(message.contains("WRONGTYPE")),
        other => panic!("Expected WRONGTYPE error, got {:?}", other),
    }

    let reply = run(&engine, &["TSLEN", "shared"]);
    assert!(reply.is_error());

    // The map side is untouched.
    assert_eq!(run(&engine, &["TLEN", "shared"]), Reply::Integer(1));
}

// =============================================================================
// TCP Round Trip Tests
// =============================================================================

fn request(
    writer: &mut BufWriter<TcpStream>,
    reader: &mut BufReader<TcpStream>,
    parts: &[&str],
) -> Reply {
    let tokens: Vec<Bytes> = parts.iter().map(|p| Bytes::from(p.to_string())).collect();
    write_request(writer, &tokens).unwrap();
    read_reply(reader).unwrap()
}

#[test]
fn test_tcp_round_trip() {
    let config = Config::builder()
        .listen_addr("127.0.0.1:0")
        .max_connections(4)
        .build();
    let engine = Arc::new(Engine::new());
    let mut server = Server::bind(config, engine).unwrap();
    let addr = server.local_addr().unwrap();

    thread::spawn(move || {
        let _ = server.run();
    });

    let stream = TcpStream::connect(addr).unwrap();
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut writer = BufWriter::new(stream);

    assert_eq!(
        request(&mut writer, &mut reader, &["PING"]),
        bulk(b"PONG")
    );
    assert_eq!(
        request(&mut writer, &mut reader, &["TADD", "k", "1", "a", "2", "b"]),
        Reply::Ok
    );
    assert_eq!(
        request(&mut writer, &mut reader, &["TLEN", "k"]),
        Reply::Integer(2)
    );
    assert_eq!(
        request(&mut writer, &mut reader, &["TRANGE", "k", "0", "-1", "withscores"]),
        Reply::Array(vec![bulk(b"1"), bulk(b"a"), bulk(b"2"), bulk(b"b")])
    );

    // A parse error keeps the connection usable.
    assert!(request(&mut writer, &mut reader, &["BOGUS"]).is_error());
    assert_eq!(
        request(&mut writer, &mut reader, &["TGET", "k", "2"]),
        bulk(b"b")
    );
}

#[test]
fn test_tcp_concurrent_clients() {
    let config = Config::builder()
        .listen_addr("127.0.0.1:0")
        .max_connections(16)
        .build();
    let engine = Arc::new(Engine::new());
    let mut server = Server::bind(config, engine).unwrap();
    let addr = server.local_addr().unwrap();

    thread::spawn(move || {
        let _ = server.run();
    });

    let mut handles = Vec::new();
    for i in 0..4 {
        handles.push(thread::spawn(move || {
            let stream = TcpStream::connect(addr).unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = BufWriter::new(stream);

            let key = format!("key{}", i);
            for j in 0..25 {
                let score = format!("{}", j);
                let value = format!("v{}", j);
                let reply = request(&mut writer, &mut reader, &["TSADD", &key, &score, &value]);
                assert_eq!(reply, Reply::Ok);
            }
            let reply = request(&mut writer, &mut reader, &["TSLEN", &key]);
            assert_eq!(reply, Reply::Integer(25));
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}
