//! n3s-scene: NES picture-plane editor
//!
//! Shows the four nametables and the OAM sprite list on a plane in 3D:
//! - Right-drag to orbit, WASD to pan, R to reset the camera
//! - Hover picks sprites over background tiles; Tab cycles overlapping picks
//! - Click to select, shift-click to toggle, Escape to clear
//! - [ and ] switch palettes; B/O toggle layers; G/H toggle grid and outlines

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod compositor;
mod config;
mod rasterizer;
mod scene;
mod session;
mod ui;

use clap::Parser;
use compositor::{MeshBank, SoftwareBackend};
use config::SceneConfig;
use macroquad::prelude::*;
use rasterizer::{Framebuffer, HEIGHT, WIDTH};
use scene::Snapshot;
use session::EditorSession;
use std::path::PathBuf;
use ui::MouseState;

/// Placeholder meshes generated when no tile data is given
const PLACEHOLDER_MESHES: usize = 16;

#[derive(Parser, Debug)]
#[command(version, about = "NES picture-plane scene editor")]
struct Args {
    /// Scene config (RON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Captured nametables, OAM and palettes (RON)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Raw CHR tile data
    #[arg(long, conflicts_with = "sheet")]
    chr: Option<PathBuf>,

    /// Greyscale PNG sheet of 8x8 tiles
    #[arg(long)]
    sheet: Option<PathBuf>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("n3s-scene v{}", VERSION),
        window_width: WIDTH as i32 * 2,
        window_height: HEIGHT as i32 * 2,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn load_config(args: &Args) -> SceneConfig {
    let Some(path) = &args.config else {
        return SceneConfig::default();
    };
    match SceneConfig::load(path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("Failed to load config {}: {}, using defaults", path.display(), e);
            SceneConfig::default()
        }
    }
}

fn load_meshes(args: &Args) -> MeshBank {
    let loaded = if let Some(path) = &args.chr {
        MeshBank::load_chr(path).map(|bank| (path, bank))
    } else if let Some(path) = &args.sheet {
        MeshBank::from_png(path).map(|bank| (path, bank))
    } else {
        return MeshBank::placeholder(PLACEHOLDER_MESHES);
    };

    match loaded {
        Ok((path, bank)) if bank.is_empty() => {
            log::warn!("No meshes in {}, using placeholders", path.display());
            MeshBank::placeholder(PLACEHOLDER_MESHES)
        }
        Ok((path, bank)) => {
            log::info!("Loaded {} meshes from {}", bank.len(), path.display());
            bank
        }
        Err(e) => {
            log::warn!("Failed to load meshes: {}, using placeholders", e);
            MeshBank::placeholder(PLACEHOLDER_MESHES)
        }
    }
}

/// Populate from the snapshot if one was given and loads, otherwise the demo scene
fn load_scene(session: &mut EditorSession, args: &Args, meshes: &MeshBank) {
    let mesh_count = meshes.len();

    if let Some(path) = &args.snapshot {
        match Snapshot::load(path) {
            Ok(snapshot) => {
                log::info!("Loaded snapshot from {}", path.display());
                session.load_snapshot(&snapshot, |tile| {
                    ((tile as usize) < mesh_count).then_some(tile as u32)
                });
                return;
            }
            Err(e) => log::warn!("Failed to load snapshot {}: {}", path.display(), e),
        }
    }

    session.populate_demo(mesh_count as u32);
}

/// Keyboard actions for this frame
fn handle_keys(session: &mut EditorSession) {
    if is_key_pressed(KeyCode::Tab) {
        session.cycle_hover();
    }
    if is_key_pressed(KeyCode::RightBracket) {
        let index = session.select_next_palette();
        log::info!("Palette {}", index);
    }
    if is_key_pressed(KeyCode::LeftBracket) {
        let index = session.select_previous_palette();
        log::info!("Palette {}", index);
    }
    if is_key_pressed(KeyCode::Escape) {
        session.clear_selection();
    }
    if is_key_pressed(KeyCode::R) {
        session.reset_camera();
    }

    let view = &mut session.view;
    if is_key_pressed(KeyCode::B) {
        view.render_background = !view.render_background;
    }
    if is_key_pressed(KeyCode::O) {
        view.render_oam = !view.render_oam;
    }
    if is_key_pressed(KeyCode::G) {
        view.nametable_grid = !view.nametable_grid;
    }
    if is_key_pressed(KeyCode::H) {
        view.oam_outlines = !view.oam_outlines;
    }

    let speed = session.config.pan_speed;
    let mut pan = (0.0, 0.0);
    if is_key_down(KeyCode::A) {
        pan.0 -= speed;
    }
    if is_key_down(KeyCode::D) {
        pan.0 += speed;
    }
    if is_key_down(KeyCode::W) {
        pan.1 += speed;
    }
    if is_key_down(KeyCode::S) {
        pan.1 -= speed;
    }
    if pan != (0.0, 0.0) {
        session.pan(pan.0, pan.1);
    }
}

/// Map window-space mouse input into framebuffer space
fn to_framebuffer(mouse: &MouseState, draw: Rect) -> (MouseState, bool) {
    let sx = WIDTH as f32 / draw.w;
    let sy = HEIGHT as f32 / draw.h;
    let local = MouseState {
        x: (mouse.x - draw.x) * sx,
        y: (mouse.y - draw.y) * sy,
        dx: mouse.dx * sx,
        dy: mouse.dy * sy,
        ..*mouse
    };
    (local, draw.contains(vec2(mouse.x, mouse.y)))
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args);
    let meshes = load_meshes(&args);
    let mut session = EditorSession::new(config);
    load_scene(&mut session, &args, &meshes);

    let mut fb = Framebuffer::new(WIDTH, HEIGHT);
    let mut mouse = MouseState::default();

    log::info!("=== n3s-scene v{} ===", VERSION);

    loop {
        mouse = MouseState::poll(&mouse);

        // Fit the framebuffer to the window, keeping its aspect ratio
        let scale = (screen_width() / WIDTH as f32).min(screen_height() / HEIGHT as f32);
        let draw_w = WIDTH as f32 * scale;
        let draw_h = HEIGHT as f32 * scale;
        let draw_rect = Rect::new(
            (screen_width() - draw_w) * 0.5,
            (screen_height() - draw_h) * 0.5,
            draw_w,
            draw_h,
        );

        let (local, inside) = to_framebuffer(&mouse, draw_rect);
        session.update(&local, (WIDTH as f32, HEIGHT as f32), inside);
        handle_keys(&mut session);

        fb.clear(session.config.overlay.clear);
        {
            let mut backend = SoftwareBackend::new(&mut fb, &meshes, session.plane);
            session.render(&mut backend);
            session.render_overlays(&mut backend);
        }

        clear_background(Color::from_rgba(30, 30, 35, 255));
        let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            draw_rect.x,
            draw_rect.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(draw_rect.w, draw_rect.h)),
                ..Default::default()
            },
        );

        // Status line
        let cursor = match session.cursor() {
            Some(p) => format!("({}, {})", p.x, p.y),
            None => "-".to_string(),
        };
        draw_text(
            &format!(
                "Pixel: {} | Hover: {:?} | Selected: {} | Palette: {}",
                cursor,
                session.highlight.active_target(),
                session.selection.len(),
                session.palettes.selected_index(),
            ),
            8.0,
            screen_height() - 8.0,
            16.0,
            Color::from_rgba(200, 200, 200, 255),
        );

        next_frame().await;
    }
}
