//! Session-level tests: classifiers, calibration and lifecycle together


use face_gestures::{
    calibration::CalibrationStep,
    config::Config,
    landmarks::LandmarkFrame,
    session::{FrameOutcome, GestureListener, GestureSession},
    tilt::{TiltDirection, TiltEvent},
};
use test_helpers::{
    blink_frames, closed_frame, config_without_calibration, neutral_frame, synthetic_frame, tilted_frame,
};

fn feed(session: &mut GestureSession, frames: &[LandmarkFrame], start_ms: u64, step_ms: u64) -> Vec<FrameOutcome> {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| session.evaluate(Some(frame), start_ms + i as u64 * step_ms))
        .collect()
}

fn started(config: &Config) -> GestureSession {
    let mut session = GestureSession::new(config);
    session.start();
    session
}

#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
}

impl GestureListener for Recorder {
    fn on_blink(&mut self) {
        self.calls.push("blink".to_string());
    }

    fn on_tilt_left(&mut self) {
        self.calls.push("left".to_string());
    }

    fn on_tilt_right(&mut self) {
        self.calls.push("right".to_string());
    }

    fn on_calibration_progress(&mut self, blinks: u32, target: u32) {
        self.calls.push(format!("calibration {blinks}/{target}"));
    }

    fn on_calibration_complete(&mut self) {
        self.calls.push("calibration complete".to_string());
    }
}

#[test]
fn test_blink_sequence_fires_once_on_second_low_frame() {
    let mut session = started(&config_without_calibration());
    let outcomes = feed(&mut session, &blink_frames(), 1000, 200);

    let fired: Vec<usize> = outcomes
        .iter()
        .enumerate()
        .filter(|(_, o)| o.blink.is_some())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(fired, vec![3]);
    assert_eq!(session.status().blink_count, 1);
}

#[test]
fn test_blink_within_debounce_is_suppressed() {
    let mut session = started(&config_without_calibration());
    let frames = vec![
        neutral_frame(),
        neutral_frame(),
        closed_frame(),
        closed_frame(),
        neutral_frame(),
        closed_frame(),
        closed_frame(),
    ];
    let outcomes = feed(&mut session, &frames, 1000, 100);

    assert!(outcomes[3].blink.is_some());
    assert_eq!(outcomes.iter().filter(|o| o.blink.is_some()).count(), 1);
}

#[test]
fn test_is_blinking_tracks_confirmed_closure() {
    let mut session = started(&config_without_calibration());
    feed(&mut session, &[neutral_frame(), neutral_frame(), closed_frame()], 0, 100);
    assert!(!session.status().is_blinking);

    session.evaluate(Some(&closed_frame()), 300);
    assert!(session.status().is_blinking);

    session.evaluate(Some(&neutral_frame()), 400);
    assert!(!session.status().is_blinking);
}

#[test]
fn test_tilt_right_fires_once_on_third_frame() {
    let mut session = started(&config_without_calibration());
    let frames = vec![tilted_frame(20.0); 4];
    let outcomes = feed(&mut session, &frames, 1000, 50);

    let tilts: Vec<Option<TiltEvent>> = outcomes.iter().map(|o| o.tilt).collect();
    assert_eq!(tilts, vec![None, None, Some(TiltEvent::Right), None]);
    assert_eq!(session.status().tilt_direction, TiltDirection::Right);
}

#[test]
fn test_sustained_tilt_fires_once() {
    let mut session = started(&config_without_calibration());
    let frames = vec![tilted_frame(25.0); 20];
    let outcomes = feed(&mut session, &frames, 0, 50);

    assert_eq!(outcomes.iter().filter(|o| o.tilt.is_some()).count(), 1);
    assert_eq!(session.status().tilt_right_count, 1);
}

#[test]
fn test_return_to_neutral_allows_second_tilt() {
    let mut session = started(&config_without_calibration());
    let mut frames = vec![tilted_frame(20.0); 3];
    frames.push(neutral_frame());
    frames.extend(vec![tilted_frame(20.0); 3]);

    // 200 ms spacing keeps the second confirmation clear of the 600 ms debounce
    let outcomes = feed(&mut session, &frames, 0, 200);
    assert_eq!(outcomes[2].tilt, Some(TiltEvent::Right));
    assert_eq!(outcomes[6].tilt, Some(TiltEvent::Right));
    assert_eq!(session.status().tilt_right_count, 2);
}

#[test]
fn test_left_tilt_and_blink_in_same_frame() {
    let mut session = started(&config_without_calibration());
    let frames = vec![
        synthetic_frame(0.3, 0.0),
        synthetic_frame(0.3, -30.0),
        synthetic_frame(0.05, -30.0),
        synthetic_frame(0.05, -30.0),
    ];
    let outcomes = feed(&mut session, &frames, 0, 100);

    let last = outcomes[3];
    assert!(last.blink.is_some());
    assert_eq!(last.tilt, Some(TiltEvent::Left));
}

#[test]
fn test_calibration_consumes_three_blinks() {
    let mut session = started(&Config::default());
    assert!(session.status().calibrating);

    let mut recorder = Recorder::default();
    let mut start = 1000;
    for _ in 0..3 {
        for outcome in feed(&mut session, &blink_frames(), start, 200) {
            assert!(outcome.blink.is_none(), "blink leaked to consumer during calibration");
            outcome.dispatch(&mut recorder);
        }
        start += 1000;
    }

    assert_eq!(
        recorder.calls,
        vec!["calibration 1/3", "calibration 2/3", "calibration complete"]
    );
    let status = session.status();
    assert!(!status.calibrating);
    assert_eq!(status.blink_count, 0);

    // After calibration blinks reach the consumer
    let outcomes = feed(&mut session, &blink_frames(), start, 200);
    assert!(outcomes[3].blink.is_some());
    assert_eq!(session.status().blink_count, 1);
}

#[test]
fn test_calibration_step_reported_in_outcome() {
    let mut session = started(&Config::default());
    let outcomes = feed(&mut session, &blink_frames(), 1000, 200);
    assert_eq!(
        outcomes[3].calibration,
        Some(CalibrationStep::Progress { blinks: 1, target: 3 })
    );
}

#[test]
fn test_tilts_delivered_during_calibration() {
    let mut session = started(&Config::default());
    let outcomes = feed(&mut session, &vec![tilted_frame(20.0); 3], 0, 50);
    assert_eq!(outcomes[2].tilt, Some(TiltEvent::Right));
    assert!(session.status().calibrating);
}

#[test]
fn test_skip_calibration() {
    let mut session = started(&Config::default());
    assert!(session.skip_calibration());
    assert!(!session.skip_calibration());

    let outcomes = feed(&mut session, &blink_frames(), 1000, 200);
    assert!(outcomes[3].blink.is_some());
}

#[test]
fn test_skip_after_calibration_blink_resets_count() {
    let mut session = started(&Config::default());
    let outcomes = feed(&mut session, &blink_frames(), 1000, 200);
    assert!(outcomes[3].calibration.is_some());
    assert_eq!(session.status().blink_count, 1);
    assert_eq!(session.status().calibration_blinks, 1);

    assert!(session.skip_calibration());
    let status = session.status();
    assert!(!status.calibrating);
    assert_eq!(status.blink_count, 0);
    assert_eq!(status.calibration_blinks, 0);
}

#[test]
fn test_calibration_complete_keeps_closure_confirmed() {
    let mut session = started(&Config::default());
    let mut outcomes = Vec::new();
    for round in 0..3 {
        outcomes.extend(feed(&mut session, &blink_frames()[..4], 1000 + round * 1000, 200));
    }
    assert_eq!(outcomes.last().and_then(|o| o.calibration), Some(CalibrationStep::Completed));

    // Eyes stay shut past completion: the closure is still in progress
    assert!(session.status().is_blinking);
    for ts in [3700, 3800, 3900] {
        assert!(session.evaluate(Some(&closed_frame()), ts).blink.is_none());
        assert!(session.status().is_blinking);
    }

    session.evaluate(Some(&neutral_frame()), 4000);
    assert!(!session.status().is_blinking);
}

#[test]
fn test_reset_counts_mid_closure_keeps_blinking_flag() {
    let mut session = started(&config_without_calibration());
    feed(&mut session, &[neutral_frame(), neutral_frame(), closed_frame(), closed_frame()], 1000, 200);
    assert!(session.status().is_blinking);

    session.reset_counts();
    assert!(session.status().is_blinking);
    assert_eq!(session.status().blink_count, 0);
    assert!(session.evaluate(Some(&closed_frame()), 1700).blink.is_none());
}

#[test]
fn test_missing_face_keeps_state() {
    let mut session = started(&config_without_calibration());
    feed(&mut session, &[neutral_frame(), neutral_frame(), closed_frame()], 0, 200);

    let outcome = session.evaluate(None, 600);
    assert!(!outcome.face_present);
    assert!(!outcome.evaluated);
    assert!(!session.status().face_present);

    // Second closed frame after the gap still completes the run
    let outcome = session.evaluate(Some(&closed_frame()), 800);
    assert!(outcome.blink.is_some());
    assert!(session.status().face_present);
    assert_eq!(session.status().frames_without_face, 1);
}

#[test]
fn test_empty_frame_counts_as_no_face() {
    let mut session = started(&config_without_calibration());
    let outcome = session.evaluate(Some(&LandmarkFrame::default()), 0);
    assert!(!outcome.face_present);
}

#[test]
fn test_out_of_order_frame_rejected() {
    let mut session = started(&config_without_calibration());
    feed(&mut session, &vec![tilted_frame(20.0); 2], 1000, 50);

    let outcome = session.evaluate(Some(&tilted_frame(20.0)), 900);
    assert!(!outcome.evaluated);
    assert!(outcome.face_present);
    assert!(session.status().face_present);
    assert!(!session.evaluate(None, 900).face_present);

    // The run continues from the accepted frames
    let outcome = session.evaluate(Some(&tilted_frame(20.0)), 1100);
    assert_eq!(outcome.tilt, Some(TiltEvent::Right));
}

#[test]
fn test_not_running_ignores_frames() {
    let mut session = GestureSession::new(&config_without_calibration());
    let outcome = session.evaluate(Some(&closed_frame()), 0);
    assert_eq!(outcome, FrameOutcome::default());
    assert_eq!(session.status().frames_evaluated, 0);
}

#[test]
fn test_reset_counts_keeps_running() {
    let mut session = started(&config_without_calibration());
    feed(&mut session, &blink_frames(), 1000, 200);
    feed(&mut session, &vec![tilted_frame(-20.0); 3], 2000, 50);

    let status = session.status();
    assert_eq!((status.blink_count, status.tilt_left_count), (1, 1));

    session.reset_counts();
    let status = session.status();
    assert!(status.running);
    assert_eq!((status.blink_count, status.tilt_left_count), (0, 0));
}

#[test]
fn test_stop_clears_state() {
    let mut session = started(&Config::default());
    feed(&mut session, &vec![tilted_frame(20.0); 3], 0, 50);
    session.stop();

    let status = session.status();
    assert!(!status.running);
    assert!(!status.calibrating);
    assert_eq!(status.tilt_direction, TiltDirection::Neutral);
    assert_eq!(status.tilt_right_count, 0);

    // Restart accepts earlier timestamps again and calibrates afresh
    session.start();
    assert!(session.status().calibrating);
    let outcomes = feed(&mut session, &vec![tilted_frame(20.0); 3], 0, 50);
    assert_eq!(outcomes[2].tilt, Some(TiltEvent::Right));
}

#[test]
fn test_dispatch_order_and_routing() {
    let outcome = FrameOutcome {
        evaluated: true,
        face_present: true,
        blink: None,
        tilt: Some(TiltEvent::Left),
        calibration: Some(CalibrationStep::Completed),
    };
    let mut recorder = Recorder::default();
    outcome.dispatch(&mut recorder);
    assert_eq!(recorder.calls, vec!["calibration complete", "left"]);
    assert!(outcome.has_events());
    assert!(!FrameOutcome::default().has_events());
}

#[test]
fn test_status_reports_last_readings() {
    let mut session = started(&config_without_calibration());
    assert_eq!(session.status().openness, None);
    assert_eq!(session.status().roll_degrees, None);

    session.evaluate(Some(&synthetic_frame(0.25, 10.0)), 0);
    let status = session.status();
    assert!((status.openness.unwrap() - 0.25).abs() < 1e-6);
    assert!((status.roll_degrees.unwrap() - 10.0).abs() < 1e-6);

    // A face-less frame keeps the previous readings
    session.evaluate(None, 50);
    assert!(session.status().openness.is_some());

    session.stop();
    assert_eq!(session.status().openness, None);
}
