#![no_main]
use libfuzzer_sys::fuzz_target;
use overload_core::{Session, StateTag};

fuzz_target!(|data: &str| {
    // compact state tags re-render to what they parsed from
    if let Ok(tag) = data.parse::<StateTag>() {
        assert_eq!(tag.to_string().parse::<StateTag>().ok(), Some(tag));
    }
    // snapshots from disk may be arbitrary bytes
    if let Ok(session) = serde_json::from_str::<Session>(data) {
        let _ = serde_json::to_vec(&session);
        let _ = session.current_attempt();
    }
});
