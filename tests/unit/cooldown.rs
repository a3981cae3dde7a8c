use super::*;

#[test]
fn first_hit_is_ready_second_is_cooling() {
    let gate = CooldownGate::new(Duration::from_secs(7));
    assert_eq!(gate.check(1, false), CooldownVerdict::Ready);

    match gate.check(1, false) {
        CooldownVerdict::Cooling { retry_after } => {
            assert!(retry_after <= Duration::from_secs(7));
            assert!(retry_after > Duration::ZERO);
        }
        CooldownVerdict::Ready => panic!("second hit inside the window must cool"),
    }
}

#[test]
fn invokers_cool_independently() {
    let gate = CooldownGate::new(Duration::from_secs(7));
    assert_eq!(gate.check(1, false), CooldownVerdict::Ready);
    assert_eq!(gate.check(2, false), CooldownVerdict::Ready);
    assert!(matches!(gate.check(1, false), CooldownVerdict::Cooling { .. }));
}

#[test]
fn owners_bypass_the_window() {
    let gate = CooldownGate::new(Duration::from_secs(7));
    assert_eq!(gate.check(1, true), CooldownVerdict::Ready);
    assert_eq!(gate.check(1, true), CooldownVerdict::Ready);
    // Owner hits never consume the window either.
    assert_eq!(gate.check(1, false), CooldownVerdict::Ready);
}

#[test]
fn window_reopens_after_it_elapses() {
    let gate = CooldownGate::new(Duration::from_millis(30));
    assert_eq!(gate.check(1, false), CooldownVerdict::Ready);
    std::thread::sleep(Duration::from_millis(45));
    assert_eq!(gate.check(1, false), CooldownVerdict::Ready);
}
