#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use roster_business::session::load_session;
use roster_business::{AuthSession, BusinessConfig, FileTokenStore};
use roster_ui::state::State;

mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

fn main() -> eframe::Result {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_module("egui_winit::clipboard", log::LevelFilter::Off)
        .init();

    let config = BusinessConfig::init().unwrap_or_else(|err| {
        log::error!("{err:#}, falling back to defaults");
        BusinessConfig::default()
    });

    let session = match FileTokenStore::from_config(&config) {
        Ok(store) => {
            log::debug!("Reading session from {}", store.path().display());
            load_session(&store)
        }
        Err(err) => {
            log::error!("No token store available: {err}");
            AuthSession::default()
        }
    };
    if !session.is_authenticated() {
        log::warn!("No saved token, admin requests will be rejected");
    }

    // Commands are spawned on this runtime from the UI thread.
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("Failed to start tokio runtime: {err}");
            return Err(eframe::Error::AppCreation(Box::new(err)));
        }
    };
    let _guard = runtime.enter();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Roster",
        native_options,
        Box::new(move |_cc| {
            let state = State::new(config, session);
            let app = roster_ui::RosterApp::new(state);
            Ok(Box::new(app))
        }),
    )
}
