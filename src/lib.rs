//! Valentine Quest core crate.
//!
//! A first-person target gallery in the browser. The player shoots hearts and
//! cookies; every ten hits the score-driven sequencer shows a milestone card
//! and ducks the music, and the hundredth hit reveals a mega-heart whose
//! breaking ends the game. `start_game()` wires everything into the page.

use wasm_bindgen::prelude::*;

mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod game;
pub mod logger;
pub mod music;
pub mod scene;
pub mod sequencer;
pub mod timer;

pub use error::{Result, ValentineError};
pub use sequencer::{Effect, Overlay, Screen, Sequencer};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// Static content
// -----------------------------------------------------------------------------

/// Greetings handed out by [`random_memory`].
pub const MEMORIES: &[&str] = &[
    "I love how you laugh at my bad jokes.",
    "Remember that time we got lost in the city?",
    "You are the best Valorant duo I could ask for.",
    "My favorite memory is our first date.",
    "You make every day better just by being in it.",
];

/// Names on the win screen, rank 1 first.
pub const LEADERBOARD: [&str; 10] = ["mpy", "—", "—", "—", "—", "—", "—", "—", "—", "—"];

/// Side-panel checklist.
pub const TODO_ITEMS: &[&str] = &[
    "Make a garden with the floor",
    "Interact with a crab",
    "Experience the fireworks at night",
    "Connect the stars in the sky at night",
    "Reach a score of 100",
];

// -----------------------------------------------------------------------------
// Entry points
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> std::result::Result<(), JsValue> {
    app::start()?;
    Ok(())
}

/// One of [`MEMORIES`], picked at random.
#[wasm_bindgen]
pub fn random_memory() -> String {
    use rand::seq::SliceRandom;
    MEMORIES.choose(&mut rand::thread_rng()).copied().unwrap_or_default().to_string()
}

/// JSON body `{"message": ...}` of the greeting endpoint.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Greeting {
    pub message: String,
}

#[cfg(feature = "serde")]
impl Greeting {
    pub fn random() -> Self {
        Self { message: random_memory() }
    }
}

#[cfg(all(feature = "serde", feature = "serde_json"))]
#[wasm_bindgen]
pub fn greeting_json() -> String {
    serde_json::to_string(&Greeting::random()).unwrap_or_default()
}
