/// Integration tests for the elevation retrieval pipeline.
///
/// These tests run the real transport and daemon against a local tiny_http
/// server playing the elevation provider:
/// 1. Redirect chains (relative and absolute targets) are followed to the
///    final body, with a hard hop cap
/// 2. Non-success statuses surface as transport failures
/// 3. A superseded request's response never reaches the monitor
/// 4. Position update → fetch → parse → threshold evaluation, end to end
///
/// Run with: cargo test --test elevation_pipeline

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use sealarm_service::config::{ServiceConfig, TransportConfig};
use sealarm_service::daemon::Daemon;
use sealarm_service::model::{AlarmState, Coordinate, Event, FetchOutcome, HttpError};
use sealarm_service::providers::ElevationProvider;
use sealarm_service::transport::RequestRunner;
use tiny_http::{Header, Response, Server};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Spawns a local HTTP server; `reply` maps a request URL (path + query) to
/// a (status, headers, body) triple. Returns the server's base URL. The
/// server thread runs until the test process exits.
fn spawn_server(
    reply: impl Fn(&str) -> (u16, Vec<(String, String)>, String) + Send + 'static,
) -> String {
    let server = Server::http("127.0.0.1:0").expect("failed to bind test server");
    let port = server
        .server_addr()
        .to_ip()
        .expect("test server should bind a TCP address")
        .port();

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let (status, headers, body) = reply(request.url());
            let mut response = Response::from_string(body).with_status_code(status);
            for (name, value) in headers {
                let header = Header::from_bytes(name.as_bytes(), value.as_bytes())
                    .expect("test header should be well-formed");
                response = response.with_header(header);
            }
            let _ = request.respond(response);
        }
    });

    format!("http://127.0.0.1:{}", port)
}

fn location(target: &str) -> Vec<(String, String)> {
    vec![("Location".to_string(), target.to_string())]
}

fn recv_outcome(rx: &mpsc::Receiver<Event>) -> FetchOutcome {
    match rx
        .recv_timeout(Duration::from_secs(10))
        .expect("expected a request outcome")
    {
        Event::RequestFinished(outcome) => outcome,
        other => panic!("unexpected event: {:?}", other),
    }
}

fn porto() -> Coordinate {
    Coordinate {
        latitude: 41.161758,
        longitude: -8.583933,
    }
}

/// Pumps the daemon's event loop until an evaluation produces a verdict.
fn wait_for_verdict(daemon: &mut Daemon) -> AlarmState {
    for _ in 0..100 {
        if let Some(state) = daemon.poll_event(Duration::from_millis(100)) {
            return state;
        }
    }
    panic!("no alarm verdict within deadline");
}

// ---------------------------------------------------------------------------
// 1. Redirect following
// ---------------------------------------------------------------------------

#[test]
fn test_redirect_chain_of_depth_three_delivers_final_body_once() {
    let base = spawn_server(|url| match url {
        "/start" => (302, location("/hop1"), String::new()),
        "/hop1" => (301, location("/hop2"), String::new()),
        "/hop2" => (307, location("/final"), String::new()),
        "/final" => (
            200,
            vec![],
            "LocalElevationCallback(0.5,'srtm30m')".to_string(),
        ),
        other => panic!("unexpected path: {}", other),
    });

    let (tx, rx) = mpsc::channel();
    let mut runner =
        RequestRunner::new(&TransportConfig::default(), tx).expect("client should build");
    let attempt = runner.start(&format!("{}/start", base));

    let outcome = recv_outcome(&rx);
    assert_eq!(outcome.attempt, attempt);
    let body = outcome.result.expect("redirect chain should end in a body");
    assert_eq!(body, "LocalElevationCallback(0.5,'srtm30m')");

    // The chain resolved exactly once; nothing else may arrive.
    assert!(
        rx.recv_timeout(Duration::from_millis(300)).is_err(),
        "the final body must be delivered exactly once"
    );
}

#[test]
fn test_absolute_redirect_target_is_honored() {
    // Self-referential absolute target: the handler hands out its own base.
    let base_holder: &'static std::sync::OnceLock<String> =
        Box::leak(Box::new(std::sync::OnceLock::new()));
    let base = spawn_server(move |url| match url {
        "/start" => (
            302,
            location(&format!("{}/landed", base_holder.get().expect("base set"))),
            String::new(),
        ),
        "/landed" => (200, vec![], "Foo(0.25,'srtm30m')".to_string()),
        other => panic!("unexpected path: {}", other),
    });
    base_holder.set(base.clone()).expect("base set once");

    let (tx, rx) = mpsc::channel();
    let mut runner =
        RequestRunner::new(&TransportConfig::default(), tx).expect("client should build");
    runner.start(&format!("{}/start", base));

    let outcome = recv_outcome(&rx);
    assert_eq!(outcome.result.expect("should land"), "Foo(0.25,'srtm30m')");
}

#[test]
fn test_redirect_loop_fails_with_too_many_redirects() {
    let base = spawn_server(|_url| (302, location("/again"), String::new()));

    let (tx, rx) = mpsc::channel();
    let config = TransportConfig {
        timeout_secs: 5,
        max_redirects: 3,
    };
    let mut runner = RequestRunner::new(&config, tx).expect("client should build");
    runner.start(&format!("{}/start", base));

    let outcome = recv_outcome(&rx);
    match outcome.result {
        Err(HttpError::TooManyRedirects { limit }) => assert_eq!(limit, 3),
        other => panic!("expected TooManyRedirects, got {:?}", other),
    }
}

#[test]
fn test_redirect_without_location_header_is_a_typed_failure() {
    let base = spawn_server(|_url| (302, vec![], String::new()));

    let (tx, rx) = mpsc::channel();
    let mut runner =
        RequestRunner::new(&TransportConfig::default(), tx).expect("client should build");
    runner.start(&format!("{}/start", base));

    let outcome = recv_outcome(&rx);
    assert!(
        matches!(outcome.result, Err(HttpError::MissingLocation { .. })),
        "expected MissingLocation, got {:?}",
        outcome.result
    );
}

// ---------------------------------------------------------------------------
// 2. Terminal statuses
// ---------------------------------------------------------------------------

#[test]
fn test_server_error_status_surfaces_as_status_failure() {
    let base = spawn_server(|_url| (500, vec![], "backend down".to_string()));

    let (tx, rx) = mpsc::channel();
    let mut runner =
        RequestRunner::new(&TransportConfig::default(), tx).expect("client should build");
    runner.start(&format!("{}/lookup", base));

    let outcome = recv_outcome(&rx);
    match outcome.result {
        Err(HttpError::Status { status, .. }) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected Status failure, got {:?}", other),
    }
}

#[test]
fn test_elapsed_time_is_measured() {
    let base = spawn_server(|_url| {
        thread::sleep(Duration::from_millis(50));
        (200, vec![], "Foo(0.5,'x')".to_string())
    });

    let (tx, rx) = mpsc::channel();
    let mut runner =
        RequestRunner::new(&TransportConfig::default(), tx).expect("client should build");
    runner.start(&format!("{}/lookup", base));

    let outcome = recv_outcome(&rx);
    assert!(
        outcome.elapsed >= Duration::from_millis(50),
        "elapsed must cover the full round trip, got {:?}",
        outcome.elapsed
    );
}

// ---------------------------------------------------------------------------
// 3. Supersession
// ---------------------------------------------------------------------------

#[test]
fn test_superseded_request_response_is_dropped() {
    let base = spawn_server(|url| match url {
        "/slow" => {
            thread::sleep(Duration::from_millis(400));
            (200, vec![], "LocalElevationCallback(1,'slow')".to_string())
        }
        "/fast" => (
            200,
            vec![],
            "LocalElevationCallback(0.5,'fast')".to_string(),
        ),
        other => panic!("unexpected path: {}", other),
    });

    let (tx, rx) = mpsc::channel();
    let mut runner =
        RequestRunner::new(&TransportConfig::default(), tx).expect("client should build");
    runner.start(&format!("{}/slow", base));
    let second = runner.start(&format!("{}/fast", base));

    let outcome = recv_outcome(&rx);
    assert_eq!(
        outcome.attempt, second,
        "only the superseding attempt's outcome may be delivered"
    );
    assert_eq!(
        outcome.result.expect("fast request should succeed"),
        "LocalElevationCallback(0.5,'fast')"
    );

    // The superseded attempt resolves later but must never surface.
    assert!(
        rx.recv_timeout(Duration::from_millis(800)).is_err(),
        "the superseded attempt's response must be dropped"
    );
}

// ---------------------------------------------------------------------------
// 4. End-to-end: position fix → alarm verdict
// ---------------------------------------------------------------------------

#[test]
fn test_low_elevation_raises_the_alarm_end_to_end() {
    let base = spawn_server(|url| {
        assert!(
            url.contains("coords=") && url.contains("41.161758"),
            "provider URL should carry the coordinate, got {}",
            url
        );
        // Reciprocal 2.0 → 0.5 m of ground.
        (
            200,
            vec![],
            "LocalElevationCallback(2.0,'srtm30m')".to_string(),
        )
    });

    let mut config = ServiceConfig::default();
    config.provider.base_url = Some(format!("{}/elevation_data/elev2018.js", base));
    let mut daemon = Daemon::new(config).expect("daemon should build");

    let positions = daemon.position_handle();
    assert!(positions.update(porto()));

    assert_eq!(
        wait_for_verdict(&mut daemon),
        AlarmState::Alarm,
        "0.5 m is below the 2.0 m threshold"
    );
}

#[test]
fn test_high_ground_is_safe_via_json_provider() {
    let base = spawn_server(|url| {
        assert!(
            url.contains("locations=") && url.contains("41.161758"),
            "provider URL should carry the coordinate, got {}",
            url
        );
        (
            200,
            vec![],
            r#"{"results":[{"latitude":41.161758,"longitude":-8.583933,"elevation":117.0}]}"#
                .to_string(),
        )
    });

    let mut config = ServiceConfig::default();
    config.provider.kind = ElevationProvider::OpenElevation;
    config.provider.base_url = Some(format!("{}/api/v1/lookup", base));
    let mut daemon = Daemon::new(config).expect("daemon should build");

    let positions = daemon.position_handle();
    assert!(positions.update(porto()));

    assert_eq!(wait_for_verdict(&mut daemon), AlarmState::Safe);
}

#[test]
fn test_startup_coordinate_produces_a_verdict_without_any_fix() {
    let base = spawn_server(|_url| {
        (
            200,
            vec![],
            "LocalElevationCallback(0.0084819,'srtm30m')".to_string(),
        )
    });

    let mut config = ServiceConfig::default();
    config.provider.base_url = Some(format!("{}/elevation_data/elev2018.js", base));
    let mut daemon = Daemon::new(config).expect("daemon should build");

    daemon.request_initial_position();

    assert_eq!(
        wait_for_verdict(&mut daemon),
        AlarmState::Safe,
        "Porto sits ~118 m above the sea"
    );
}

#[test]
fn test_unrecognized_body_raises_no_alarm_and_no_retry() {
    let base = spawn_server(|_url| (200, vec![], "<html>maintenance</html>".to_string()));

    let mut config = ServiceConfig::default();
    config.provider.base_url = Some(format!("{}/elevation_data/elev2018.js", base));
    let mut daemon = Daemon::new(config).expect("daemon should build");

    let positions = daemon.position_handle();
    assert!(positions.update(porto()));

    // The fetch completes and parsing fails; no verdict may ever appear.
    for _ in 0..20 {
        assert_eq!(
            daemon.poll_event(Duration::from_millis(100)),
            None,
            "an unparseable body must not produce a verdict"
        );
    }
}
