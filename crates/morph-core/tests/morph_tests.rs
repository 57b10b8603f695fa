use morph_core::math::ease;
use morph_core::morph::{transition_blend, MorphController, MorphCycle, MorphState, StepMorph};

#[test]
fn test_two_shape_cycle_scenario() {
    let cycle = MorphCycle::new(2, 5.0, 1.8);

    let s = cycle.state(3.0);
    assert_eq!((s.current, s.next, s.blend), (0, 1, 0.0));

    let s = cycle.state(4.5);
    assert_eq!((s.current, s.next), (0, 1));
    assert!((s.blend - ease(1.3 / 1.8)).abs() < 1e-5, "blend {}", s.blend);

    let s = cycle.state(5.0);
    assert_eq!((s.current, s.next, s.blend), (1, 0, 0.0));
}

#[test]
fn test_blend_monotonic_through_transition() {
    let cycle = MorphCycle::new(3, 5.0, 1.8);
    let mut prev = 0.0;
    for i in 0..=180 {
        let t = 3.2 + i as f32 * 0.01;
        let s = cycle.state(t.min(4.999));
        assert_eq!(s.current, 0);
        assert!(s.blend >= prev, "blend fell from {} to {} at t={}", prev, s.blend, t);
        assert!((0.0..=1.0).contains(&s.blend));
        prev = s.blend;
    }
    assert!(prev > 0.99);
}

#[test]
fn test_blend_continuous_across_slot_boundary() {
    // Showing next at blend 1 equals showing it as current at blend 0
    assert_eq!(transition_blend(5.0, 5.0, 1.8), 1.0);
    let cycle = MorphCycle::new(4, 5.0, 1.8);
    let after = cycle.state(10.0);
    assert_eq!(after.current, 2);
    assert_eq!(after.blend, 0.0);
}

#[test]
fn test_cycle_indices_always_in_range() {
    let cycle = MorphCycle::new(5, 5.0, 1.8).with_intro(0.25);
    for i in 0..5000 {
        let s = cycle.state(i as f32 * 0.173);
        assert!(s.current < 5 && s.next < 5);
        assert_eq!(s.next, (s.current + 1) % 5);
    }
}

#[test]
fn test_negative_time_rests_on_first_shape() {
    let cycle = MorphCycle::new(3, 2.0, 0.5);
    let s = cycle.state(-4.0);
    assert_eq!(
        s,
        MorphState {
            current: 0,
            next: 1,
            blend: 0.0
        }
    );
}

#[test]
fn test_pass_lengths() {
    let cycle = MorphCycle::new(5, 5.0, 1.8).with_intro(0.25);
    assert!((cycle.first_pass_length() - 20.25).abs() < 1e-5);
    assert_eq!(cycle.pass_length(), 25.0);
}

#[test]
fn test_last_target_in_frame_wins() {
    let mut c = MorphController::Stepped(StepMorph::new(5, 0, 0.5));
    assert!(c.set_target(3));
    assert!(c.set_target(1));
    let s = c.advance(0.0);
    assert_eq!((s.current, s.next), (0, 1));
    let s = c.advance(0.0);
    assert_eq!(s, MorphState::resting(1));
}

#[test]
fn test_step_blend_is_eased_progress() {
    let mut steps = StepMorph::new(3, 0, 0.1);
    steps.set_target(2);
    let mut prev = 0.0;
    for _ in 0..9 {
        let s = steps.advance();
        assert!((s.blend - ease(steps.progress())).abs() < 1e-6);
        assert!(s.blend > prev);
        prev = s.blend;
    }
}

#[test]
fn test_intro_slot_starts_part_way_through_blend() {
    let cycle = MorphCycle::new(5, 5.0, 1.8).with_intro(0.25);
    let s = cycle.state(0.0);
    assert_eq!((s.current, s.next), (0, 1));
    assert!((s.blend - ease(1.55 / 1.8)).abs() < 1e-5, "blend {}", s.blend);
    assert!(s.blend > 0.9);
    assert!(cycle.state(0.1).blend > s.blend);
    let s = cycle.state(0.25);
    assert_eq!((s.current, s.blend), (1, 0.0));
}

#[test]
fn test_retarget_mid_blend_unwinds_before_switching() {
    let mut steps = StepMorph::new(3, 0, 0.25);
    steps.set_target(1);
    steps.advance();
    let mid = steps.advance();
    assert_eq!((mid.current, mid.next), (0, 1));

    steps.set_target(2);
    let s = steps.advance();
    assert_eq!((s.current, s.next), (0, 1));
    assert!(s.blend < mid.blend);

    let mut prev = s;
    for _ in 0..10 {
        let s = steps.advance();
        if s.next != prev.next {
            // The incoming shape may only change while `current` is shown exactly
            assert!(
                prev.blend == 0.0 || s.blend == 0.0,
                "incoming swapped from {} to {} between blends {} and {}",
                prev.next,
                s.next,
                prev.blend,
                s.blend
            );
        }
        prev = s;
    }
    assert_eq!(prev, MorphState::resting(2));
}
