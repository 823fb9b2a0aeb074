#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header probe and opcode walk must never panic
    let _ = zenpict::probe(data);

    let limits = zenpict::Limits {
        max_pixels: Some(1 << 22),
        max_memory_bytes: Some(1 << 26),
        ..zenpict::Limits::default()
    };
    let Ok(state) = zenpict::DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // Full-canvas and corner windows must never panic either
    let (w, h) = (state.width(), state.height());
    let _ = state.read_plane(0, 0, w, h, enough::Unstoppable);
    let _ = state.read_plane(w / 2, h / 2, w - w / 2, h - h / 2, enough::Unstoppable);
    let _ = state.read(
        &zenpict::PlaneRequest::full(&state).legacy(true),
        enough::Unstoppable,
    );
});
