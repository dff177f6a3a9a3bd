//! Edge case and boundary condition tests for the irrigation controller

use rs_irrigation::hal::{MockBoard, MockSensor, MockStorage};
use rs_irrigation::parsing::{query_param, to_int};
use rs_irrigation::{
    compose, evaluate, handle_request, Calibration, Config, ControllerConfig, ControllerState,
    IrrigationController, Polarity, Request, RequestContext, Response, SensorConfig, SensorReader,
    Step, SystemMode, Threshold, ThresholdRequest, ThresholdStore,
};

fn state() -> ControllerState<MockStorage> {
    ControllerState::new(ThresholdStore::load(MockStorage::new(), 40), 1500)
}

fn ctx(moisture: u8, now_ms: u64) -> RequestContext {
    RequestContext { moisture, now_ms }
}

// ============================================================================
// Boundary Value Tests
// ============================================================================

#[test]
fn moisture_equal_to_threshold_does_not_irrigate() {
    let decision = evaluate(40, Threshold::clamped(40), SystemMode::Manual);
    assert!(!decision.outputs.relay);
    assert_eq!(decision.status.label(), "Idle (Manual)");

    let decision = evaluate(39, Threshold::clamped(40), SystemMode::Manual);
    assert!(decision.outputs.relay);
}

#[test]
fn zero_threshold_never_irrigates() {
    let decision = evaluate(0, Threshold::clamped(0), SystemMode::Manual);
    assert!(!decision.outputs.relay);
    // Alarm is independent of the threshold
    assert!(decision.outputs.buzzer);
}

#[test]
fn full_threshold_irrigates_below_saturation() {
    let decision = evaluate(99, Threshold::clamped(100), SystemMode::Wifi);
    assert!(decision.outputs.relay);
    assert!(!decision.outputs.buzzer);

    let decision = evaluate(100, Threshold::clamped(100), SystemMode::Wifi);
    assert!(!decision.outputs.relay);
}

#[test]
fn threshold_clamps_extreme_inputs() {
    assert_eq!(Threshold::clamped(i32::MIN).percent(), 0);
    assert_eq!(Threshold::clamped(i32::MAX).percent(), 100);
    assert_eq!(Threshold::clamped(100).stepped(Step::Up).percent(), 100);
    assert_eq!(Threshold::clamped(0).stepped(Step::Down).percent(), 0);
    assert!(Threshold::new(101).is_none());
}

// ============================================================================
// Sensor Calibration
// ============================================================================

#[test]
fn raw_outside_calibration_is_clamped() {
    let cal = Calibration::new(1000, 3000, Polarity::Direct);
    assert_eq!(cal.to_percent(0), 0);
    assert_eq!(cal.to_percent(2000), 50);
    assert_eq!(cal.to_percent(4095), 100);
}

#[test]
fn inverted_polarity_reads_dry_high() {
    let cal = Calibration::new(1000, 3000, Polarity::Inverted);
    assert_eq!(cal.to_percent(3000), 0);
    assert_eq!(cal.to_percent(1000), 100);
}

#[test]
fn reversed_bounds_are_swapped() {
    let cal = Calibration::new(3000, 1000, Polarity::Direct);
    assert_eq!(cal.raw_min(), 1000);
    assert_eq!(cal.raw_max(), 3000);
}

#[test]
fn degenerate_calibration_reads_zero() {
    let cal = Calibration::new(2000, 2000, Polarity::Direct);
    assert_eq!(cal.to_percent(2000), 0);
    assert_eq!(cal.to_percent(4095), 0);
}

#[test]
fn sensor_config_feeds_controller() {
    let config = Config::default()
        .with_controller(ControllerConfig::default().with_splash_ms(0))
        .with_sensor(SensorConfig::default().with_polarity(Polarity::Inverted));
    let mut c = IrrigationController::new(MockBoard::hardware(), MockStorage::new(), &config);
    c.start(0);

    // Inverted: raw 0 is saturated soil
    c.hardware_mut().sensor.raw = 0;
    c.tick(0);
    assert_eq!(c.state().moisture(), Some(100));
    assert!(!c.hardware().relay.level);

    let reader = SensorReader::new(config.sensor.calibration());
    assert_eq!(reader.read_percent(&mut MockSensor::new(4095)), 0);
}

// ============================================================================
// Query Parsing
// ============================================================================

#[test]
fn percent_encoded_threshold_value() {
    assert_eq!(
        ThresholdRequest::from_query("value=%35%35"),
        ThresholdRequest::Set(55)
    );
    assert_eq!(
        ThresholdRequest::from_query("value=%2D10"),
        ThresholdRequest::Set(-10)
    );
}

#[test]
fn first_parameter_occurrence_wins() {
    assert_eq!(query_param("value=10&value=20", "value").as_deref(), Some("10"));
    assert_eq!(query_param("?value=10", "value").as_deref(), Some("10"));
    assert_eq!(query_param("values=10", "value"), None);
}

#[test]
fn empty_value_converts_to_zero() {
    assert_eq!(ThresholdRequest::from_query("value="), ThresholdRequest::Set(0));
    assert_eq!(ThresholdRequest::from_query("value"), ThresholdRequest::Set(0));
    assert_eq!(to_int(""), 0);
    assert_eq!(to_int("-"), 0);
}

#[test]
fn overflowing_value_saturates_then_clamps() {
    let mut s = state();
    let req = Request::from_uri("/threshold?value=99999999999999");
    handle_request(&mut s, &req, ctx(0, 0));
    assert_eq!(s.threshold().percent(), 100);

    let req = Request::from_uri("/threshold?value=-99999999999999");
    handle_request(&mut s, &req, ctx(0, 0));
    assert_eq!(s.threshold().percent(), 0);
}

// ============================================================================
// Remote Staleness
// ============================================================================

#[test]
fn stale_remote_reported_once_and_relay_held() {
    let mut s = state();
    handle_request(&mut s, &Request::ToggleMode, ctx(0, 0));
    handle_request(&mut s, &Request::Status, ctx(10, 100));
    assert!(s.outputs().relay);

    assert!(!s.check_remote_stale(30_099, 30_000));
    assert!(s.check_remote_stale(30_100, 30_000));
    assert!(!s.check_remote_stale(60_000, 30_000));
    // Detection only
    assert!(s.outputs().relay);

    // A new poll re-arms detection
    handle_request(&mut s, &Request::Status, ctx(10, 70_000));
    assert!(!s.check_remote_stale(99_999, 30_000));
    assert!(s.check_remote_stale(100_000, 30_000));
}

#[test]
fn stale_check_ignored_in_manual_mode() {
    let mut s = state();
    assert!(!s.check_remote_stale(1_000_000, 30_000));
}

// ============================================================================
// Display Composition
// ============================================================================

#[test]
fn banner_has_priority_over_menu() {
    let mut s = state();
    s.on_buttons(rs_irrigation::ButtonEvents {
        menu: true,
        ..Default::default()
    });
    s.toggle_mode(0);

    let frame = compose(&s, 100);
    assert_eq!(frame.line(0), "WiFi Mode");

    let frame = compose(&s, 1500);
    assert_eq!(frame.line(0), "Set Threshold:");
    assert_eq!(frame.line(1), "40%");
}

#[test]
fn moisture_unknown_before_first_sample() {
    let s = state();
    let frame = compose(&s, 0);
    assert_eq!(frame.line(0), "Moisture: --%");
    assert_eq!(frame.line(1), "Status: Idle");
}

#[test]
fn long_banner_is_truncated_to_row_width() {
    let mut s = state();
    s.show_banner("Smart Irrigation Controller v2", 0, 1000);
    let frame = compose(&s, 0);
    assert_eq!(frame.line(0), "Smart Irrigation");
}

// ============================================================================
// Requests
// ============================================================================

#[test]
fn index_request_has_no_side_effects() {
    let mut s = state();
    assert_eq!(handle_request(&mut s, &Request::Index, ctx(0, 0)), Response::Page);
    assert_eq!(s.mode(), SystemMode::Manual);
    assert_eq!(s.moisture(), None);
    assert!(!s.outputs().buzzer);
}

#[test]
fn threshold_request_while_menu_open_still_applies() {
    let mut s = state();
    s.on_buttons(rs_irrigation::ButtonEvents {
        menu: true,
        ..Default::default()
    });
    handle_request(&mut s, &Request::from_uri("/threshold?value=25"), ctx(0, 0));
    assert_eq!(s.threshold().percent(), 25);
    assert!(s.menu_active());
}
