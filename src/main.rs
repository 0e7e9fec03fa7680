//! Demo driver: a scripted play / pause-autosave / resume cycle.
//!
//! Runs two "launches" of the same game against one on-disk store to show a
//! save surviving a process restart. Watch with `RUST_LOG=info`.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec3;
    use scene_session::{
        FileStore, GameSession, MemoryStore, PlayerAvatar, ProgressOwner, SaveStore, SceneRouter,
        SceneTarget,
    };

    const DT: f32 = 1.0 / 60.0;
    const SCENES: [&str; 4] = ["menu", "PROLOGUE SCENE", "GameScene", "Level2"];

    fn open_store(dir: &std::path::Path) -> Box<dyn SaveStore> {
        match FileStore::new(dir) {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("file store unavailable ({e}), running without persistence");
                Box::new(MemoryStore::new())
            }
        }
    }

    fn run_ticks(session: &mut GameSession, n: u32) {
        for _ in 0..n {
            session.tick(DT);
        }
    }

    pub fn run() {
        let dir = std::env::temp_dir().join("scene-session-demo");

        // First launch: fresh run, make some progress, pause to autosave.
        {
            let mut session = GameSession::new(open_store(&dir), SceneRouter::new(SCENES));
            log::info!("first launch, save present: {}", session.has_save());

            session.play();
            run_ticks(&mut session, 10);

            session.load_scene(SceneTarget::Name("Level2".into()));
            run_ticks(&mut session, 10);

            if let Some(world) = session.world() {
                world.player.borrow_mut().walk(Vec3::new(6.0, 0.0, -4.0));
                world.player.borrow_mut().face(0.8);
                world.progress.borrow_mut().add_score(40);
            }
            run_ticks(&mut session, 120);

            session.toggle_pause(); // autosaves
            log::info!(
                "paused in {:?} with save present: {}",
                session.current_scene(),
                session.has_save()
            );
        }

        // Second launch: the save is picked up and resumed into.
        let mut session = GameSession::new(open_store(&dir), SceneRouter::new(SCENES));
        log::info!("second launch, save present: {}", session.has_save());

        session.play();
        run_ticks(&mut session, 10);

        if let Some(world) = session.world() {
            let player = world.player.borrow();
            let progress = world.progress.borrow();
            log::info!(
                "resumed in {:?}: position {:?}, score {}, play time {:.1}s",
                session.current_scene(),
                player.position(),
                progress.score(),
                progress.elapsed_time(),
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is consumed as a library; set up logging and bail.
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("scene-session is a library on wasm; no demo entry point");
}
