//! Sessions over real TCP through the adapter: concurrent clients, session
//! isolation, and stalled-peer timeouts.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chap::adapters::tcp;
use chap::application::errors::SessionError;
use chap::{AuthConfig, Prover, SharedSecret, Verdict, Verifier};

fn test_config() -> AuthConfig {
    AuthConfig {
        io_timeout: Duration::from_secs(2),
        ..AuthConfig::default()
    }
}

fn spawn_server(secret: &str) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let verifier = Arc::new(Verifier::new(SharedSecret::new(secret), test_config()).unwrap());
    thread::spawn(move || {
        let _ = tcp::serve(listener, verifier);
    });
    addr
}

#[test]
fn concurrent_clients_get_independent_verdicts() {
    let addr = spawn_server("pass123");

    let good = thread::spawn(move || {
        let prover = Prover::new(SharedSecret::new("pass123"), test_config()).unwrap();
        tcp::connect(addr, &prover)
    });
    let bad = thread::spawn(move || {
        let prover = Prover::new(SharedSecret::new("wrong"), test_config()).unwrap();
        tcp::connect(addr, &prover)
    });

    assert_eq!(good.join().unwrap().unwrap(), Verdict::Authenticated);
    assert_eq!(bad.join().unwrap().unwrap(), Verdict::Rejected);
}

#[test]
fn aborted_client_does_not_poison_later_sessions() {
    let addr = spawn_server("pass123");

    // Connect and vanish mid-handshake; the server session fails in its own
    // thread and must not affect anyone else.
    let aborted = TcpStream::connect(addr).unwrap();
    drop(aborted);

    let prover = Prover::new(SharedSecret::new("pass123"), test_config()).unwrap();
    assert_eq!(tcp::connect(addr, &prover).unwrap(), Verdict::Authenticated);
}

#[test]
fn silent_server_times_out_instead_of_hanging() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept, then say nothing and hold the connection open.
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(30));
        drop(stream);
    });

    let config = AuthConfig {
        io_timeout: Duration::from_millis(300),
        ..AuthConfig::default()
    };
    let prover = Prover::new(SharedSecret::new("pass123"), config).unwrap();

    let start = Instant::now();
    let outcome = tcp::connect(addr, &prover);
    let elapsed = start.elapsed();

    assert!(matches!(outcome, Err(SessionError::Transport(_))));
    assert!(
        elapsed < Duration::from_secs(5),
        "timeout did not fire, took {elapsed:?}"
    );
}
