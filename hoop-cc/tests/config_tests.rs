//! Timing defaults that must agree across the two binaries

use hoop_as::config::ServiceConfig;
use hoop_cc::config::ClientConfig;

#[test]
fn test_server_budget_fits_inside_client_attempt() {
    let server = ServiceConfig::default();
    let client = ClientConfig::default();

    // A clip analyzed within budget must be answered before the client gives up
    assert!(
        server.analysis_timeout() < client.retry.attempt_timeout(),
        "server budget {:?} must stay below client attempt timeout {:?}",
        server.analysis_timeout(),
        client.retry.attempt_timeout()
    );
}
