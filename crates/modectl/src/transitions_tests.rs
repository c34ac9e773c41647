use super::*;

#[test]
fn full_happy_path_span_to_bridge() {
    let s = ModeState::StableSpan;
    let s = next(s, Event::BeginStopping).unwrap();
    assert_eq!(s, ModeState::Stopping);
    let s = next(s, Event::BeginReconfiguring).unwrap();
    assert_eq!(s, ModeState::Reconfiguring);
    let s = next(s, Event::BeginStarting).unwrap();
    assert_eq!(s, ModeState::Starting);
    let s = next(s, Event::Stabilized(Mode::Bridge)).unwrap();
    assert_eq!(s, ModeState::StableBridge);
}

#[test]
fn reconfigure_failure_rolls_back_to_stable() {
    let s = ModeState::Reconfiguring;
    let s = next(s, Event::ReconfigureFailed).unwrap();
    assert_eq!(s, ModeState::RolledBack);
    let s = next(s, Event::Stabilized(Mode::Span)).unwrap();
    assert_eq!(s, ModeState::StableSpan);
}

#[test]
fn rollback_failure_reaches_degraded_and_needs_explicit_clear() {
    let s = next(ModeState::Reconfiguring, Event::ReconfigureFailed).unwrap();
    let s = next(s, Event::RollbackFailed).unwrap();
    assert_eq!(s, ModeState::Degraded);
    let s = next(s, Event::ClearDegraded(Mode::Span)).unwrap();
    assert_eq!(s, ModeState::StableSpan);
}

#[test]
fn out_of_order_event_is_rejected() {
    let result = next(ModeState::StableSpan, Event::BeginStarting);
    assert!(matches!(result, Err(ModeError::IllegalTransition { from: ModeState::StableSpan, .. })));
}

#[test]
fn degraded_rejects_anything_but_clear() {
    let result = next(ModeState::Degraded, Event::BeginStopping);
    assert!(matches!(result, Err(ModeError::IllegalTransition { from: ModeState::Degraded, .. })));
}
