//! # Voxel Island Entry Point
//!
//! Calls into the library's `run()` function, which starts a headless session.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- [config.json]
//! ```

fn main() {
    voxel_island::run();
}
