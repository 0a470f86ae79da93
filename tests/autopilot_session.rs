use std::time::Duration;

use fsd_snake::autopilot::AutopilotState;
use fsd_snake::game::{
    AutopilotConfig, CollisionType, Direction, EndCause, GameConfig, GameSession, Position,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const FRAME: Duration = Duration::from_millis(16);

fn config(crash_delay_ms: u64) -> GameConfig {
    let mut config = GameConfig::default();
    config.autopilot = AutopilotConfig::default().with_fixed_crash_delay(crash_delay_ms);
    config
}

fn session(seed: u64, crash_delay_ms: u64) -> GameSession {
    GameSession::with_rng(config(crash_delay_ms), StdRng::seed_from_u64(seed))
}

/// Tick until the autopilot reaches `state`, returning the ticks spent
fn tick_until(session: &mut GameSession, state: AutopilotState) -> u64 {
    let mut ticks = 0;
    while session.autopilot_state() != state {
        assert!(ticks < 10_000, "never reached {:?}", state);
        assert!(session.on_tick(FRAME).is_none(), "session ended early");
        ticks += 1;
    }
    ticks
}

#[test]
fn test_malfunction_crashes_on_an_empty_grid() {
    for seed in 0..10 {
        let mut session = session(seed, 1000);
        session.on_toggle_autopilot();
        tick_until(&mut session, AutopilotState::Malfunctioning);

        let mut end = None;
        for _ in 0..5_000 {
            if let Some(report) = session.on_tick(FRAME) {
                end = Some(report);
                break;
            }
        }

        let end = end.expect("malfunction should end the session");
        assert_eq!(end.cause, EndCause::Collision);
        assert_eq!(end.autopilot, AutopilotState::Malfunctioning);
        assert!(end.collision.is_some());
        assert!(session.is_over());
        assert_eq!(session.autopilot_state(), AutopilotState::Off);
    }
}

#[test]
fn test_active_autopilot_never_reverses() {
    let mut session = session(3, 3000);
    session.on_toggle_autopilot();
    tick_until(&mut session, AutopilotState::Active);

    let mut heading = session.state().snake.direction();
    let mut head = session.state().snake.head();

    while session.autopilot_state() == AutopilotState::Active {
        assert!(session.on_tick(FRAME).is_none());

        let snake = &session.state().snake;
        if snake.head() != head {
            assert_ne!(snake.direction(), heading.opposite());
            assert_eq!(snake.head(), head.moved_in_direction(snake.direction()));
            heading = snake.direction();
            head = snake.head();
        }
    }
}

#[test]
fn test_active_autopilot_collects_items() {
    let mut session = session(5, 3000);
    session.on_toggle_autopilot();
    tick_until(&mut session, AutopilotState::Active);

    tick_until(&mut session, AutopilotState::Malfunctioning);
    assert!(session.state().score > 0);
    assert_eq!(
        session.state().snake.len(),
        3 + (session.state().score / 10) as usize
    );
}

#[test]
fn test_pickup_grows_by_exactly_one() {
    let mut session = session(1, 3000);
    let snake_before = session.state().snake.to_vec();
    let ahead = snake_before[0].moved_by(1, 0);
    session.state_mut().item = ahead;

    session.on_tick(Duration::from_millis(150));

    let snake_after = session.state().snake.to_vec();
    assert_eq!(snake_after.len(), snake_before.len() + 1);
    assert_eq!(snake_after[0], ahead);
    assert_eq!(&snake_after[1..], &snake_before[..]);
    assert_ne!(session.state().item, ahead);
    assert!(!session.state().snake.contains(session.state().item));
}

#[test]
fn test_deactivation_restores_recorded_interval() {
    let mut session = session(9, 5000);
    let manual = session.move_interval();

    session.on_toggle_autopilot();
    tick_until(&mut session, AutopilotState::Active);
    assert_eq!(session.move_interval(), manual / 2);

    // let the autopilot eat a little
    for _ in 0..60 {
        if session.autopilot_state() != AutopilotState::Active {
            break;
        }
        session.on_tick(FRAME);
    }

    assert_eq!(session.on_toggle_autopilot(), AutopilotState::Off);
    assert_eq!(session.move_interval(), manual);
    assert!(session.on_manual_direction(Direction::Down));
}

#[test]
fn test_toggle_during_malfunction_is_ignored() {
    let mut session = session(2, 1000);
    session.on_toggle_autopilot();
    tick_until(&mut session, AutopilotState::Malfunctioning);

    assert_eq!(
        session.on_toggle_autopilot(),
        AutopilotState::Malfunctioning
    );
    assert!(!session.on_manual_direction(Direction::Up));
}

#[test]
fn test_manual_wall_collision_reports_wall() {
    let mut session = session(4, 3000);
    session.state_mut().item = Position::new(0, 0);
    session.on_manual_direction(Direction::Down);

    let mut end = None;
    for _ in 0..100 {
        end = session.on_tick(Duration::from_millis(150));
        if end.is_some() {
            break;
        }
    }

    let end = end.expect("snake should reach the bottom wall");
    assert_eq!(end.cause, EndCause::Collision);
    assert_eq!(end.collision, Some(CollisionType::Wall));
    assert_eq!(end.autopilot, AutopilotState::Off);
    assert_eq!(session.on_tick(FRAME), None);
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let run = |seed| {
        let mut session = session(seed, 2500);
        session.on_toggle_autopilot();
        loop {
            if let Some(end) = session.on_tick(FRAME) {
                return (end, session.ticks());
            }
        }
    };

    assert_eq!(run(21), run(21));
}
