//! Bracket Pong entry point
//!
//! Runs a whole tournament headlessly through the fixed-step loop, printing
//! each match result as a JSON line and the final bracket at the end.
//!
//! Usage: `bracket-pong [settings.json] [hot-seat|idle]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use bracket_pong::platform::ManualFrames;
    use bracket_pong::settings::SETTINGS_FILE;
    use bracket_pong::sim::SimPhase;
    use bracket_pong::{
        ControlMode, FixedLoop, InputState, Settings, Tournament, TournamentError,
    };

    /// Frame intervals to cycle through, roughly a 60 Hz display with hitches
    const FRAME_TIMES: [f32; 4] = [0.016, 0.017, 0.017, 0.033];
    /// Give up after this many frames (about three hours of play)
    const MAX_FRAMES: usize = 600_000;

    pub fn run() -> Result<(), TournamentError> {
        let mut args = std::env::args().skip(1);
        let path = args.next().unwrap_or_else(|| SETTINGS_FILE.to_string());
        let mut settings = Settings::load(&path);
        if let Some(mode) = args.next() {
            match ControlMode::from_str(&mode) {
                Some(mode) => settings.control_mode = mode,
                None => log::warn!("Unknown control mode '{}', keeping settings", mode),
            }
        }
        log::info!("Control mode: {}", settings.control_mode.as_str());

        let mut tournament = Tournament::with_roster(settings.clone())?;
        tournament.on_match_complete(|completion| match serde_json::to_string(completion) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode match result: {}", e),
        });

        let mut fixed = FixedLoop::new(ManualFrames::new(), settings.sim_hz)
            .with_max_frame_delta(settings.max_frame_delta);
        // Nobody at the keyboard
        let input = InputState::new();
        let mut rendered = 0u64;

        fixed.start();
        for frame in 0..MAX_FRAMES {
            let elapsed = FRAME_TIMES[frame % FRAME_TIMES.len()];
            fixed.frame(
                elapsed,
                |dt| {
                    let waiting = tournament
                        .current_match()
                        .is_some_and(|m| matches!(m.phase(), None | Some(SimPhase::Waiting)));
                    if waiting {
                        if let Err(e) = tournament.start_current_match() {
                            log::warn!("Could not serve: {}", e);
                        }
                    }
                    tournament.tick(&input, dt);
                },
                |_alpha| rendered += 1,
            );

            if tournament.current_match().is_some_and(|m| m.is_finished()) {
                tournament.advance()?;
            }
            if tournament.is_finished() {
                break;
            }
        }
        fixed.stop();

        log::info!(
            "{} updates over {} frames",
            fixed.total_updates(),
            rendered
        );

        match serde_json::to_string_pretty(&tournament.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode bracket: {}", e),
        }

        for (rank, entrant) in tournament.registry().standings().iter().enumerate() {
            log::info!(
                "{}. {} ({}-{})",
                rank + 1,
                entrant.display_name,
                entrant.win_count,
                entrant.loss_count
            );
        }

        match tournament.champion() {
            Some(champion) => log::info!("{} wins the tournament!", champion.display_name),
            None => log::warn!("Tournament did not finish"),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bracket Pong (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `FixedLoop::frame` itself
}
