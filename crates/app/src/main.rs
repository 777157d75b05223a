//! `roadscape [LEVEL.json]`
//!
//! Opens a window on the given level, or on a generated one when no path is
//! given. Environment:
//!   - `ROADSCAPE_SEED`: seed for the generated level (default 1)
//!   - `ROADSCAPE_CONFIG`: JSON file with a `GeometryConfig`
//!   - `ROADSCAPE_SCREENSHOT`: save one frame to this path and exit

use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot};
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use world::config::GeometryConfig;
use world::terrain_generation::generate_level;
use world::{load_level, Level, LevelError};

const GENERATED_SIZE: usize = 64;
/// Frames to render before the screenshot is taken.
const SCREENSHOT_FRAME: u32 = 60;

fn main() -> AppExit {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Roadscape".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::Continuous,
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    });

    // LogPlugin is installed now, so failures below are reported through it.
    let config = match read_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid geometry config: {e}");
            return AppExit::error();
        }
    };
    let level = match std::env::args().nth(1) {
        Some(path) => load_level(&path, &config),
        None => {
            let seed = std::env::var("ROADSCAPE_SEED")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            info!("No level given, generating one from seed {seed}");
            generate_level(seed, GENERATED_SIZE, GENERATED_SIZE, &config).map_err(LevelError::from)
        }
    };
    let level: Level = match level {
        Ok(level) => level,
        Err(e) => {
            error!("Failed to load level: {e}");
            return AppExit::error();
        }
    };

    app.insert_resource(level)
        .insert_resource(config)
        .add_plugins(rendering::RenderingPlugin);

    if let Ok(path) = std::env::var("ROADSCAPE_SCREENSHOT") {
        app.insert_resource(ScreenshotRequest { frame: 0, path })
            .add_systems(Update, take_screenshot);
    }

    app.run()
}

fn read_config() -> Result<GeometryConfig, LevelError> {
    let Ok(path) = std::env::var("ROADSCAPE_CONFIG") else {
        return Ok(GeometryConfig::default());
    };
    let json = std::fs::read_to_string(&path)?;
    let config: GeometryConfig = serde_json::from_str(&json)?;
    info!("Using geometry config from {path}");
    Ok(config)
}

#[derive(Resource)]
struct ScreenshotRequest {
    frame: u32,
    path: String,
}

fn take_screenshot(
    mut commands: Commands,
    mut request: ResMut<ScreenshotRequest>,
    mut exit: EventWriter<AppExit>,
) {
    request.frame += 1;
    if request.frame == SCREENSHOT_FRAME {
        commands
            .spawn(Screenshot::primary_window())
            .observe(save_to_disk(request.path.clone()));
    } else if request.frame > SCREENSHOT_FRAME + 10 {
        exit.send(AppExit::Success);
    }
}
