//! Main application entry point (native).
//!
//! Usage: `drawtool <script.json>`. Replays the script and prints the saved
//! snapshot to stdout.

#[cfg(feature = "native")]
fn main() {
    env_logger::init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("Usage: drawtool <script.json>");
        std::process::exit(2);
    };
    log::info!("Replaying {}", path);

    match drawtool_app::Script::from_file(&path).and_then(|script| script.run_to_snapshot()) {
        Ok(snapshot) => println!("{}", snapshot),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("drawtool: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
