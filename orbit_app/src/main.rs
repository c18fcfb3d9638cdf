//! Orbit demo application
//!
//! Builds a sun with an orbiting planet and moon, spawns comets from a pool
//! and runs a fixed number of frames against a recording backend. Every
//! frame's draw calls are counted and summarized through the log.

use std::cell::RefCell;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::rc::Rc;

use canvas_engine::foundation::logging;
use canvas_engine::prelude::*;
use thiserror::Error;

const CONFIG_FILE: &str = "orbit.ron";
const FRAMES: u32 = 240;
const ORBIT_RADIUS: f32 = 120.0;
const COMET_INTERVAL: u32 = 30;

/// Errors that abort the demo
#[derive(Error, Debug)]
enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("logger already installed")]
    Logger(#[from] log::SetLoggerError),

    #[error("object: {0}")]
    Object(#[from] ObjectError),

    #[error("pool: {0}")]
    Pool(#[from] PoolError),
}

struct OrbitApp {
    config: EngineConfig,
    recorder: Rc<RefCell<RecordingContext>>,
    scene: Scene,
    sun: SceneKey,
    planet: ObjectId,
    comets: Pool<GameObject>,
    timer: FrameTimer,
    draw_calls: usize,
}

impl OrbitApp {
    fn new(config: EngineConfig) -> Result<Self, AppError> {
        config.validate()?;
        let recorder = RecordingContext::shared();
        let composer = Composer::from_config(&config).with_context(recorder.clone());

        let moon = composer.build(
            ObjectProps::new()
                .with_position(24.0, 0.0)
                .with_size(6.0, 6.0)
                .with_anchor(0.5, 0.5)
                .with_opacity(0.8)
                .with_render(|moon: &GameObject, context: &mut dyn Context| {
                    context.set_fill_style("silver");
                    context.fill_rect(0.0, 0.0, moon.width(), moon.height());
                    let label = "moon";
                    let width = context.measure_text(label);
                    context.fill_text(label, (moon.width() - width) / 2.0, -4.0);
                }),
        );

        let mut planet = composer.build(
            ObjectProps::new()
                .with_position(ORBIT_RADIUS, 0.0)
                .with_size(16.0, 16.0)
                .with_anchor(0.5, 0.5)
                .with_render(|planet: &GameObject, context: &mut dyn Context| {
                    context.draw_image(ImageId(1), 0.0, 0.0, planet.width(), planet.height());
                }),
        );
        planet.add_child(moon)?;
        let planet_id = planet.id();

        let sun = composer.build(
            ObjectProps::new()
                .with_position(400.0, 300.0)
                .with_size(48.0, 48.0)
                .with_anchor(0.5, 0.5)
                .with_prop("color", "gold")
                .with_prop("type", "star")
                .with_child(planet),
        );

        let mut scene = Scene::new(config.scene.clone());
        let sun_x = sun.x();
        let sun_y = sun.y();
        let sun = scene.add(sun);
        scene.look_at(sun_x, sun_y);

        let comet_composer = Composer::from_config(&config).with_context(recorder.clone());
        let comets = Pool::with_config(move || comet_composer.build_default(), &config.pool)?;

        let timer = FrameTimer::new(config.frame_rate);
        log::info!("Orbit demo ready: {} scene objects, {} fps", scene.len(), config.frame_rate);

        Ok(Self {
            config,
            recorder,
            scene,
            sun,
            planet: planet_id,
            comets,
            timer,
            draw_calls: 0,
        })
    }

    fn run(mut self) -> Result<(), AppError> {
        let dt = self.timer.step();
        while self.timer.frame_count() < u64::from(FRAMES) {
            let steps = self.timer.advance(dt);
            for _ in 0..steps {
                self.update(dt);
            }
            self.render();
        }

        let neighbours = self.broad_phase();
        log::info!(
            "Ran {} frames: {} draw calls, {} comets alive, {} objects near the sun",
            self.timer.frame_count(),
            self.draw_calls,
            self.comets.size(),
            neighbours
        );
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        let frame = self.timer.frame_count();
        self.scene.update(dt);
        self.comets.update(dt);

        // Place the planet on its orbit; the moon follows through fan-out
        let angle = self.timer.total_time() * 0.5;
        if let Some(sun) = self.scene.get_mut(self.sun) {
            let (center_x, center_y) = (sun.x(), sun.y());
            sun.set_rotation(angle);
            if let Some(planet) = sun.child_mut(self.planet) {
                planet.set_x(center_x + ORBIT_RADIUS * angle.cos());
                planet.set_y(center_y + ORBIT_RADIUS * angle.sin());
            }
        }

        if frame % u64::from(COMET_INTERVAL) == 0 {
            self.spawn_comet(frame);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn spawn_comet(&mut self, frame: u64) {
        let offset = (frame % 7) as f32 * 40.0;
        let camera = self.scene.camera();
        let props = ObjectProps::new()
            .with_position(offset, 0.0)
            .with_size(4.0, 4.0)
            .with_velocity(60.0, 45.0)
            .with_acceleration(0.0, 10.0)
            .with_camera(camera.x, camera.y)
            .with_ttl(90.0)
            .with_prop("color", "white");

        match self.comets.get(props) {
            Some(comet) => log::debug!("Spawned comet {} at frame {}", comet.id(), frame),
            None => log::warn!("Comet pool exhausted at {} objects", self.comets.max_size()),
        }
    }

    fn render(&mut self) {
        self.scene.render();
        self.comets.render();
        self.draw_calls += self.recorder.borrow_mut().take_calls().len();
    }

    fn broad_phase(&self) -> usize {
        let scene = &self.config.scene;
        let mut quadtree = Quadtree::new(
            Rect::new(0.0, 0.0, scene.width, scene.height),
            self.config.quadtree.clone(),
        );

        for object in self.scene.objects() {
            quadtree.add(object);
            for child in object.children() {
                quadtree.add(child);
            }
        }
        quadtree.extend(self.comets.alive());

        self.scene
            .get(self.sun)
            .map_or(0, |sun| quadtree.get(sun).len())
    }
}

/// Config path from the command line, else `orbit.ron` next to this crate
fn config_path(arg: Option<OsString>) -> PathBuf {
    arg.map_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(CONFIG_FILE), PathBuf::from)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path(env::args_os().nth(1));
    let config = EngineConfig::load_or_default(&path)?;
    logging::init_with_level(&config.log_level).map_err(AppError::from)?;
    if !path.exists() {
        log::warn!("{} not found, running with the default configuration", path.display());
    }

    let app = OrbitApp::new(config)?;
    app.run()?;
    Ok(())
}
