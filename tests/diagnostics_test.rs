use cloud_logs::diagnostics::{DiagnosticLevel, init_diagnostics};

#[test]
fn test_init_diagnostics_only_installs_once() {
    assert!(init_diagnostics(DiagnosticLevel::Info).is_ok());
    // The second call reuses the first result instead of failing on the
    // already-installed global subscriber.
    assert!(init_diagnostics(DiagnosticLevel::Trace).is_ok());

    tracing::warn!("diagnostics installed");
}
