use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;

use crossterm::event::{self, Event, KeyCode, KeyEvent};
use ratatui::{backend::Backend, Terminal};

use crate::config::AppConfig;
use crate::training::orchestrator::TrainingOrchestrator;
use crate::training::progress::TrainingUpdate;
use crate::viz::{eval_view, loss_view, sequence_view, Scene};
use crate::wave::Sequence;

use super::dashboard::DashboardState;
use super::view::{self, ViewData};

/// A training run executing on its own thread. The orchestrator travels into
/// the thread and comes back out when the run ends, so a second run cannot
/// start while one is in flight.
struct RunHandle {
    handle: JoinHandle<TrainingOrchestrator>,
    updates: mpsc::Receiver<TrainingUpdate>,
}

pub struct App {
    orchestrator: Option<TrainingOrchestrator>,
    run: Option<RunHandle>,
    dashboard: DashboardState,

    // Display copy of the pool so panning keeps working during a run
    pool: Vec<Sequence>,
    display_start: usize,
    display_count: usize,

    wave_scene: Scene,
    loss_scene: Scene,
    eval_scene: Scene,

    message: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, seed: Option<u64>) -> Self {
        let total_epochs = config.training.epochs;
        let mut orchestrator =
            TrainingOrchestrator::new(config.generation.clone(), config.training.clone());
        if let Some(seed) = seed {
            orchestrator = orchestrator.with_seed(seed);
        }

        let mut app = App {
            orchestrator: Some(orchestrator),
            run: None,
            dashboard: DashboardState::new(total_epochs),
            pool: Vec::new(),
            display_start: config.display.start_index,
            display_count: config.display.count,
            wave_scene: Scene::new(),
            loss_scene: Scene::new(),
            eval_scene: Scene::new(),
            message: None,
            should_quit: false,
        };
        // A fresh pool on startup, as if Generate were pressed immediately
        app.generate();
        app
    }

    /// Main application loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.drain_updates();

            terminal.draw(|f| self.render(f))?;

            if self.should_quit && self.run.is_none() {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events.
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Handle key press.
    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                if self.run.is_some() {
                    // There is no cancellation; the run finishes first
                    self.message = Some("Finishing the current run before exit...".to_string());
                }
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                self.generate();
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.start_training();
            }
            KeyCode::Left => {
                if self.display_start > 0 {
                    self.display_start -= 1;
                    self.rebuild_wave_scene();
                }
            }
            KeyCode::Right => {
                if self.display_start + 1 < self.pool.len() {
                    self.display_start += 1;
                    self.rebuild_wave_scene();
                }
            }
            KeyCode::Up => {
                self.display_count += 1;
                self.rebuild_wave_scene();
            }
            KeyCode::Down => {
                if self.display_count > 1 {
                    self.display_count -= 1;
                    self.rebuild_wave_scene();
                }
            }
            _ => {}
        }
    }

    /// Replace the pool with fresh sequences. Rejected while a run is active.
    fn generate(&mut self) {
        let Some(orchestrator) = self.orchestrator.as_mut() else {
            self.message = Some("Generation disabled while training".to_string());
            return;
        };

        let n = orchestrator.generate();
        self.pool = orchestrator.sequences().to_vec();
        self.display_start = self.display_start.min(n.saturating_sub(1));
        self.rebuild_wave_scene();
        self.message = Some(format!("Generated {n} sequences"));
    }

    /// Move the orchestrator onto a worker thread and start a run. Rejected
    /// while one is already out.
    fn start_training(&mut self) {
        let Some(orchestrator) = self.orchestrator.take() else {
            self.message = Some("Training already in progress".to_string());
            return;
        };

        let (tx, rx) = mpsc::channel();
        let handle = std::thread::spawn(move || {
            let mut orchestrator = orchestrator;
            let mut sink = tx;
            // Errors surface through the sink as Failed updates
            let _ = orchestrator.train(&mut sink);
            orchestrator
        });

        self.run = Some(RunHandle {
            handle,
            updates: rx,
        });
    }

    /// Pull pending updates from the run thread and rebuild affected plots.
    fn drain_updates(&mut self) {
        let Some(run) = &self.run else { return };

        let mut done = false;
        loop {
            match run.updates.try_recv() {
                Ok(update) => {
                    if matches!(
                        update,
                        TrainingUpdate::Finished | TrainingUpdate::Failed { .. }
                    ) {
                        done = true;
                    }

                    if self.dashboard.apply(&update) {
                        self.loss_scene = loss_view::build(&self.dashboard.history);
                    }
                    if let TrainingUpdate::EvaluationReady(report) = &update {
                        self.eval_scene = eval_view::build(report);
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                // Sender gone without Finished/Failed: the run thread died
                Err(mpsc::TryRecvError::Disconnected) => {
                    done = true;
                    break;
                }
            }
        }

        if done {
            self.rejoin();
        }
    }

    /// Take the orchestrator back from a finished run thread.
    fn rejoin(&mut self) {
        let Some(run) = self.run.take() else { return };
        match run.handle.join() {
            Ok(orchestrator) => {
                self.orchestrator = Some(orchestrator);
            }
            Err(_) => {
                self.message = Some("Training thread panicked".to_string());
            }
        }
    }

    fn rebuild_wave_scene(&mut self) {
        self.wave_scene = sequence_view::build(&self.pool, self.display_start, self.display_count);
    }

    fn is_training(&self) -> bool {
        self.run.is_some()
    }

    /// Render the UI.
    fn render(&self, frame: &mut ratatui::Frame) {
        view::render(
            frame,
            &ViewData {
                dashboard: &self.dashboard,
                wave: &self.wave_scene,
                loss: &self.loss_scene,
                eval: &self.eval_scene,
                pool_len: self.pool.len(),
                display_start: self.display_start,
                display_count: self.display_count,
                message: self.message.as_deref(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::orchestrator::TrainConfig;
    use crate::training::progress::RunPhase;
    use ratatui::backend::TestBackend;
    use std::time::{Duration, Instant};

    fn small_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.generation.count = 8;
        config.training = TrainConfig {
            epochs: 1,
            batch_size: 8,
            hidden_size: 4,
            learning_rate: 0.01,
            validation_min: 4,
            validation_fraction: 0.2,
            test_count: 2,
        };
        config.display.count = 3;
        config
    }

    fn wait_for_run(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(120);
        while app.is_training() && Instant::now() < deadline {
            app.drain_updates();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!app.is_training(), "run did not finish in time");
    }

    #[test]
    fn test_new_app_generates_a_pool() {
        let app = App::new(small_config(), Some(7));
        assert_eq!(app.pool.len(), 8);
        assert!(!app.wave_scene.is_empty());
        assert_eq!(app.wave_scene.legend.len(), 3);
    }

    #[test]
    fn test_generate_and_train_rejected_while_running() {
        let mut app = App::new(small_config(), Some(7));
        app.start_training();
        assert!(app.is_training());

        app.generate();
        assert_eq!(
            app.message.as_deref(),
            Some("Generation disabled while training")
        );

        app.start_training();
        assert_eq!(app.message.as_deref(), Some("Training already in progress"));

        wait_for_run(&mut app);
    }

    #[test]
    fn test_run_round_trip_updates_dashboard() {
        let mut app = App::new(small_config(), Some(11));
        app.start_training();
        wait_for_run(&mut app);

        assert_eq!(app.dashboard.phase, RunPhase::Complete);
        assert_eq!(app.dashboard.history.len(), 1);
        assert!(app.dashboard.eval.is_some());
        assert!(!app.loss_scene.is_empty());
        assert!(!app.eval_scene.is_empty());
        // The orchestrator is home again, so another run can start
        assert!(app.orchestrator.is_some());
    }

    #[test]
    fn test_dead_run_thread_is_rejoined() {
        let mut app = App::new(small_config(), Some(3));
        // As after start_training: the orchestrator is out on the thread
        app.orchestrator = None;

        let (tx, rx) = mpsc::channel();
        let handle = std::thread::spawn(move || -> TrainingOrchestrator {
            let _sink = tx;
            panic!("worker died")
        });
        app.run = Some(RunHandle {
            handle,
            updates: rx,
        });

        // The sender drops during unwind; draining must still notice the
        // dead thread and take the handle back
        wait_for_run(&mut app);
        assert_eq!(app.message.as_deref(), Some("Training thread panicked"));
        assert!(app.orchestrator.is_none());
    }

    #[test]
    fn test_run_loop_draws_to_a_test_backend() {
        let mut app = App::new(small_config(), Some(7));
        app.should_quit = true;

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        app.run(&mut terminal).unwrap();

        let drew_something = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .any(|cell| cell.symbol() != " ");
        assert!(drew_something, "the frame stayed blank");
    }

    #[test]
    fn test_display_window_keys_clamp() {
        let mut app = App::new(small_config(), Some(5));
        app.handle_key(KeyEvent::from(KeyCode::Left));
        assert_eq!(app.display_start, 0);

        for _ in 0..20 {
            app.handle_key(KeyEvent::from(KeyCode::Right));
        }
        assert_eq!(app.display_start, 7);

        for _ in 0..5 {
            app.handle_key(KeyEvent::from(KeyCode::Down));
        }
        assert_eq!(app.display_count, 1);

        app.handle_key(KeyEvent::from(KeyCode::Up));
        assert_eq!(app.display_count, 2);
    }
}
