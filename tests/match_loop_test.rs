//! Match loop driven end to end with fake collaborators

use gesture_pong::clock::Clock;
use gesture_pong::gesture::{
    CameraFrame, DetectedHand, FrameSource, GestureError, HandDetector, HandTracker, Landmark,
    ScriptEnd, ScriptedGesture,
};
use gesture_pong::render::{DisplayError, DrawCommand, Frame, Renderer};
use gesture_pong::settings::TrackerSettings;
use gesture_pong::sim::Side;
use gesture_pong::{LoopState, MatchError, MatchLoop, Settings, TerminationReason};

#[derive(Default)]
struct RecordingDisplay {
    frames: Vec<Frame>,
    quit_polls: usize,
    /// Report a quit event on this poll (1-based)
    quit_on_poll: Option<usize>,
    /// Report the quit key after this many frames
    quit_key_after_frames: Option<usize>,
    opens: usize,
    closes: usize,
}

impl Renderer for RecordingDisplay {
    fn open(&mut self) -> Result<(), DisplayError> {
        self.opens += 1;
        Ok(())
    }

    fn quit_requested(&mut self) -> bool {
        self.quit_polls += 1;
        self.quit_on_poll == Some(self.quit_polls)
    }

    fn present(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn key_pressed(&mut self, key: char) -> bool {
        key == 'q' && self.quit_key_after_frames == Some(self.frames.len())
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}

#[derive(Default)]
struct CountingClock {
    waits: usize,
}

impl Clock for CountingClock {
    fn wait_for_next_tick(&mut self) {
        self.waits += 1;
    }
}

fn limited(max_ticks: u64) -> Settings {
    let mut settings = Settings::default();
    settings.game_loop.max_ticks = Some(max_ticks);
    settings
}

fn new_game(
    settings: &Settings,
    script: ScriptedGesture,
    display: RecordingDisplay,
) -> MatchLoop<ScriptedGesture, RecordingDisplay, CountingClock> {
    MatchLoop::new(settings, script, display, CountingClock::default())
}

#[test]
fn test_no_hand_holds_last_position() {
    let script = ScriptedGesture::new(
        std::iter::once(Some(0.3)).chain(std::iter::repeat_n(None, 50)),
        ScriptEnd::NoHand,
    );
    let mut game = new_game(&Settings::default(), script, RecordingDisplay::default());
    game.start().unwrap();

    game.step();
    assert_eq!(game.state().player.y, 130.0);

    for _ in 0..50 {
        assert_eq!(game.step(), &LoopState::Running);
        assert_eq!(game.state().player.y, 130.0);
    }
}

#[test]
fn test_nan_reading_keeps_last_valid_position() {
    let script = ScriptedGesture::new([Some(0.5), Some(f32::NAN), None, None], ScriptEnd::NoHand);
    let mut game = new_game(&Settings::default(), script, RecordingDisplay::default());
    game.start().unwrap();

    for _ in 0..4 {
        game.step();
        assert_eq!(game.state().player.y, 250.0);
    }
}

#[test]
fn test_hand_drives_player_paddle() {
    let script = ScriptedGesture::new([Some(0.0), Some(1.0), Some(0.5)], ScriptEnd::NoHand);
    let mut game = new_game(&Settings::default(), script, RecordingDisplay::default());
    game.start().unwrap();

    game.step();
    assert_eq!(game.state().player.y, 0.0);
    game.step();
    assert_eq!(game.state().player.y, 500.0);
    game.step();
    assert_eq!(game.state().player.y, 250.0);
}

#[test]
fn test_long_match_invariants() {
    let readings = (0..3000).map(|i| {
        if i % 7 == 0 {
            None
        } else {
            Some(((i as f32) * 0.013).sin() * 0.6 + 0.5)
        }
    });
    let script = ScriptedGesture::new(readings, ScriptEnd::NoHand);
    let mut game = new_game(&limited(3000), script, RecordingDisplay::default());
    game.start().unwrap();

    let mut last_total = 0;
    let mut points = 0;
    while game.step() == &LoopState::Running {
        let state = game.state();
        for paddle in [&state.player, &state.ai] {
            assert!(paddle.y >= 0.0 && paddle.y <= 500.0);
        }
        assert_eq!(state.ball.vel.x.abs(), 5.0);
        assert_eq!(state.ball.vel.y.abs(), 5.0);

        let total = state.score.player + state.score.ai;
        assert!(total - last_total <= 1, "at most one point per tick");
        if let Some(side) = game.last_events().scored {
            points += 1;
            assert_eq!(total, last_total + 1);
            assert_eq!(state.ball.pos.x, 400.0);
            assert_eq!(state.ball.pos.y, 300.0);
            assert!(matches!(side, Side::Left | Side::Right));
        } else {
            assert_eq!(total, last_total);
        }
        last_total = total;
    }

    assert_eq!(
        game.loop_state(),
        &LoopState::Terminated(TerminationReason::TickLimit)
    );
    assert_eq!(game.state().time_ticks, 3000);
    assert_eq!(points, last_total);
}

#[test]
fn test_frames_mirror_state() {
    let script = ScriptedGesture::new([], ScriptEnd::NoHand);
    let mut game = new_game(&limited(120), script, RecordingDisplay::default());
    let summary = game.run().unwrap();

    let frames = &game.renderer().frames;
    assert_eq!(frames.len(), 120);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame.tick, i as u64 + 1);
        assert_eq!(frame.commands.len(), 5);
        assert!(matches!(frame.commands[0], DrawCommand::Clear(_)));
        assert!(matches!(frame.commands[1], DrawCommand::Circle { .. }));
        assert!(matches!(frame.commands[2], DrawCommand::Rect { .. }));
        assert!(matches!(frame.commands[3], DrawCommand::Rect { .. }));
        match &frame.commands[4] {
            DrawCommand::Text { text, .. } => assert_eq!(text, &frame.score.label()),
            other => panic!("expected score text, got {:?}", other),
        }
    }
    assert_eq!(frames.last().unwrap().score, summary.score);
    assert_eq!(game.clock().waits, 120);
}

#[test]
fn test_quit_event_ends_before_next_tick() {
    let display = RecordingDisplay {
        quit_on_poll: Some(5),
        ..Default::default()
    };
    let script = ScriptedGesture::new([], ScriptEnd::NoHand);
    let mut game = new_game(&Settings::default(), script, display);

    let summary = game.run().unwrap();

    assert_eq!(summary.reason, TerminationReason::QuitEvent);
    assert_eq!(summary.ticks, 4);
    assert_eq!(game.gesture().polls(), 4);
    assert_eq!(game.gesture().release_count(), 1);
    assert_eq!(game.renderer().closes, 1);
}

#[test]
fn test_quit_key_after_render() {
    let display = RecordingDisplay {
        quit_key_after_frames: Some(3),
        ..Default::default()
    };
    let script = ScriptedGesture::new([], ScriptEnd::NoHand);
    let mut game = new_game(&Settings::default(), script, display);

    let summary = game.run().unwrap();

    assert_eq!(summary.reason, TerminationReason::QuitKey);
    assert_eq!(summary.ticks, 3);
    assert_eq!(game.renderer().frames.len(), 3);
    // The quitting tick does not wait on the clock
    assert_eq!(game.clock().waits, 2);
}

#[test]
fn test_capture_failure_terminates_and_cleans_up_once() {
    let script = ScriptedGesture::new([Some(0.5); 3], ScriptEnd::CaptureFailure);
    let mut game = new_game(&Settings::default(), script, RecordingDisplay::default());

    let summary = game.run().unwrap();

    assert_eq!(
        summary.reason,
        TerminationReason::CaptureFailed(GestureError::FrameGrab)
    );
    assert_eq!(summary.ticks, 3);
    assert_eq!(game.renderer().frames.len(), 3);
    assert_eq!(game.gesture().acquire_count(), 1);
    assert_eq!(game.gesture().release_count(), 1);
    assert_eq!(game.renderer().opens, 1);
    assert_eq!(game.renderer().closes, 1);

    drop(game);
}

// Camera + detector stand-ins for the tracker path

struct FakeCamera {
    available: bool,
    frames_left: usize,
}

impl FrameSource for FakeCamera {
    fn open(&mut self) -> Result<(), GestureError> {
        if self.available {
            Ok(())
        } else {
            Err(GestureError::DeviceUnavailable("/dev/video0".into()))
        }
    }

    fn grab(&mut self) -> Result<Option<CameraFrame>, GestureError> {
        if self.frames_left == 0 {
            return Ok(None);
        }
        self.frames_left -= 1;
        Ok(Some(CameraFrame::blank(4, 4)))
    }
}

/// Hand at a fixed height, alternating with empty frames
struct BlinkingHand {
    y: f32,
    calls: usize,
}

impl HandDetector for BlinkingHand {
    fn detect(&mut self, _frame: &CameraFrame) -> Result<Vec<DetectedHand>, GestureError> {
        self.calls += 1;
        if self.calls % 2 == 0 {
            return Ok(Vec::new());
        }
        let wrist = Landmark {
            x: 0.5,
            y: self.y,
            z: 0.0,
        };
        Ok(vec![DetectedHand {
            confidence: 0.95,
            landmarks: vec![wrist; 21],
        }])
    }
}

#[test]
fn test_tracker_in_loop() {
    let tracker = HandTracker::new(
        FakeCamera {
            available: true,
            frames_left: 6,
        },
        BlinkingHand { y: 0.75, calls: 0 },
        TrackerSettings::default(),
    );
    let mut game = MatchLoop::new(
        &Settings::default(),
        tracker,
        RecordingDisplay::default(),
        CountingClock::default(),
    );

    let summary = game.run().unwrap();

    // Six frames, then the camera runs dry
    assert_eq!(summary.ticks, 6);
    assert_eq!(
        summary.reason,
        TerminationReason::CaptureFailed(GestureError::FrameGrab)
    );
    // 0.75 * 600 - 50, held through the empty frames
    assert_eq!(game.state().player.y, 400.0);
}

#[test]
fn test_camera_unavailable_is_fatal_at_startup() {
    let tracker = HandTracker::new(
        FakeCamera {
            available: false,
            frames_left: 0,
        },
        BlinkingHand { y: 0.5, calls: 0 },
        TrackerSettings::default(),
    );
    let mut game = MatchLoop::new(
        &Settings::default(),
        tracker,
        RecordingDisplay::default(),
        CountingClock::default(),
    );

    let err = game.run().unwrap_err();
    assert!(matches!(
        err,
        MatchError::Gesture(GestureError::DeviceUnavailable(_))
    ));
    assert_eq!(game.renderer().opens, 0);
    assert_eq!(game.state().time_ticks, 0);
}
