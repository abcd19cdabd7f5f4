//! Galton Cascade entry point
//!
//! Handles platform-specific initialization and drives the tick loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_board {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use galton_cascade::SimConfig;
    use galton_cascade::consts::MAX_TICKS_PER_FRAME;
    use galton_cascade::renderer::{RenderState, shapes};
    use galton_cascade::sim::{SeededSource, SimEvent, SimState, tick};

    /// Board instance holding all state
    struct Board {
        state: SimState,
        rng: SeededSource,
        render_state: Option<RenderState>,
        /// Milliseconds not yet consumed by ticks
        accumulator: f64,
        last_time: f64,
    }

    impl Board {
        fn new(state: SimState, rng: SeededSource) -> Self {
            Self {
                state,
                rng,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run as many fixed-interval ticks as the elapsed time allows
        fn update(&mut self, elapsed_ms: f64) {
            let interval = self.state.config.tick_interval_ms;
            // Cap catch-up after the tab was hidden
            self.accumulator = (self.accumulator + elapsed_ms).min(interval * 4.0);

            let mut ticks = 0;
            while self.accumulator >= interval && ticks < MAX_TICKS_PER_FRAME {
                for event in tick(&mut self.state, &mut self.rng) {
                    if let SimEvent::RunComplete { run } = event {
                        let dist = galton_cascade::Distribution::from_table(&self.state.occupancy);
                        log::info!(
                            "Run {} settled: mean column {:.2}, std dev {:.2}",
                            run,
                            dist.mean,
                            dist.std_dev()
                        );
                    }
                }
                self.accumulator -= interval;
                ticks += 1;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let frame = self.state.snapshot();
            if let Some(ref mut render_state) = self.render_state {
                let balls = shapes::balls(&frame, galton_cascade::consts::BALL_RADIUS);
                match render_state.render(&balls) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Fresh board with a new seed (same config)
        fn reseed(&mut self, seed: u64) {
            let mut rng = SeededSource::new(seed);
            match SimState::new(self.state.config.clone(), &mut rng) {
                Ok(state) => {
                    self.state = state;
                    self.rng = rng;
                    self.accumulator = 0.0;
                    log::info!("Board reset with seed: {}", seed);
                }
                Err(e) => log::error!("Reset failed: {}", e),
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Galton Cascade starting...");

        let config = SimConfig::load();
        let seed = config.seed.unwrap_or(js_sys::Date::now() as u64);
        let mut rng = SeededSource::new(seed);
        let state = match SimState::new(config, &mut rng) {
            Ok(state) => state,
            Err(e) => {
                // Nothing is scheduled on a bad config
                log::error!("Invalid configuration: {}", e);
                return;
            }
        };
        log::info!(
            "Board initialized with seed: {} ({:.1} ticks/s)",
            seed,
            state.config.ticks_per_second()
        );
        let board = Rc::new(RefCell::new(Board::new(state, rng)));

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(canvas) = window
            .document()
            .and_then(|d| d.get_element_by_id("canvas"))
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(mut render_state) => {
                let mut b = board.borrow_mut();
                render_state.set_board(&shapes::board(&b.state.layout));
                b.render_state = Some(render_state);
            }
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_restart_button(board.clone());
        request_animation_frame(board);

        log::info!("Galton Cascade running!");
    }

    fn request_animation_frame(board: Rc<RefCell<Board>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            board_loop(board, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn board_loop(board: Rc<RefCell<Board>>, time: f64) {
        {
            let mut b = board.borrow_mut();

            let elapsed = if b.last_time > 0.0 {
                time - b.last_time
            } else {
                0.0
            };
            b.last_time = time;

            // Tick pass completes before the frame reads the board
            b.update(elapsed);
            b.render();
        }

        request_animation_frame(board);
    }

    fn setup_restart_button(board: Rc<RefCell<Board>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                board.borrow_mut().reseed(seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_board::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use serde::Serialize;

    use galton_cascade::sim::{SeededSource, SimEvent, SimState, tick};
    use galton_cascade::{ConfigError, Distribution, SimConfig};

    /// Ticks allowed per ball before the headless run gives up
    const TICK_BUDGET_PER_BALL: u64 = 10_000;

    /// Run a Galton board headlessly and report where the balls landed
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Board configuration as JSON. Defaults are used when omitted.
        #[arg(value_name = "CONFIG.json")]
        config_path: Option<PathBuf>,
        /// Seed for the coin flips. Overrides the seed in the config.
        #[arg(long, value_name = "N")]
        seed: Option<u64>,
        /// Print a JSON summary instead of the histogram.
        #[arg(long)]
        json: bool,
    }

    /// Summary printed with `--json`
    #[derive(Debug, Serialize)]
    struct RunReport<'a> {
        seed: u64,
        ticks: u64,
        complete: bool,
        distribution: &'a Distribution,
    }

    fn load_config(args: &Args) -> Result<SimConfig, ConfigError> {
        match &args.config_path {
            Some(path) => SimConfig::load_file(path),
            None => {
                let config = SimConfig::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn main() -> ExitCode {
        env_logger::init();
        log::info!("Galton Cascade (headless) starting...");

        let args = Args::parse();

        let config = match load_config(&args) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Invalid configuration: {}", e);
                eprintln!("Invalid configuration: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let seed = args.seed.or(config.seed).unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
        log::info!("Seed: {}", seed);

        let mut rng = SeededSource::new(seed);
        let mut state = match SimState::new(config, &mut rng) {
            Ok(state) => state,
            Err(e) => {
                eprintln!("Invalid configuration: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let budget = state.config.population as u64 * TICK_BUDGET_PER_BALL;
        let mut complete = false;
        while !complete && state.time_ticks < budget {
            complete = tick(&mut state, &mut rng)
                .iter()
                .any(|e| matches!(e, SimEvent::RunComplete { .. }));
        }
        if !complete {
            log::warn!("Tick budget of {} exhausted before the run completed", budget);
        }

        let dist = Distribution::from_table(&state.occupancy);
        if args.json {
            let report = RunReport {
                seed,
                ticks: state.time_ticks,
                complete,
                distribution: &dist,
            };
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    log::error!("Failed to serialize report: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        } else {
            print!("{}", dist.histogram(50));
            println!(
                "{} balls in {} ticks, mean column {:.2}, std dev {:.2}",
                dist.total,
                state.time_ticks,
                dist.mean,
                dist.std_dev()
            );
        }

        if complete {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
