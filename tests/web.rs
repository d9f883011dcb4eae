// Browser tests, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_game_builds_the_page() {
    valentine_quest::start_game().expect("start_game");
    let doc = web_sys::window().and_then(|w| w.document()).expect("document");
    assert!(doc.get_element_by_id("vq-canvas").is_some());
    assert!(doc.get_element_by_id("vq-ui").is_some());
}

#[wasm_bindgen_test]
fn random_memory_is_available_from_js() {
    let m = valentine_quest::random_memory();
    assert!(valentine_quest::MEMORIES.contains(&m.as_str()));
}
