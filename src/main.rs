//! Sky Barrage headless host
//!
//! Drives the engine with the demo autopilot at the fixed tick rate and logs
//! the result. Usage:
//!
//! ```text
//! sky-barrage [TUNING.json] [--seed N] [--max-ticks N] [--realtime]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::Instant;

    use sky_barrage::consts::{SIM_DT, TICK_INTERVAL};
    use sky_barrage::sim::autopilot;
    use sky_barrage::{Engine, TickOutcome, Tuning};

    env_logger::init();
    log::info!("Sky Barrage (headless) starting...");

    let args = match HostArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            log::error!("{msg}");
            eprintln!("usage: sky-barrage [TUNING.json] [--seed N] [--max-ticks N] [--realtime]");
            std::process::exit(2);
        }
    };

    let tuning = match &args.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("tuning {}: {e}; using defaults", path.display());
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let mut engine = match Engine::new(tuning, args.seed) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("bad tuning: {e}");
            std::process::exit(2);
        }
    };
    let mut next_deadline = Instant::now();

    for _ in 0..args.max_ticks {
        let input = autopilot(engine.state(), engine.tuning());
        let frame = match engine.tick(&input, SIM_DT) {
            Ok(frame) => frame,
            Err(e) => {
                log::error!("simulation error: {e}");
                std::process::exit(1);
            }
        };

        if frame.tick % 500 == 0 {
            log::info!(
                "tick {}: {:?}, score {}, {} sprites",
                frame.tick,
                frame.phase,
                frame.score,
                frame.draws.len()
            );
        }

        if let TickOutcome::GameOver {
            final_score,
            outcome,
        } = frame.outcome
        {
            println!("{outcome:?} after {} ticks, final score {final_score}", frame.tick);
            return;
        }

        if args.realtime {
            next_deadline += TICK_INTERVAL;
            let now = Instant::now();
            if next_deadline > now {
                std::thread::sleep(next_deadline - now);
            }
        }
    }

    let state = engine.state();
    println!(
        "stopped after {} ticks in {:?}, score {}",
        state.time_ticks,
        state.phase,
        state.score.value()
    );
}

#[cfg(not(target_arch = "wasm32"))]
struct HostArgs {
    tuning: Option<std::path::PathBuf>,
    seed: u64,
    max_ticks: u64,
    realtime: bool,
}

#[cfg(not(target_arch = "wasm32"))]
impl HostArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut parsed = HostArgs {
            tuning: None,
            seed: 12345,
            max_ticks: 30_000,
            realtime: false,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => parsed.seed = Self::number(&arg, args.next())?,
                "--max-ticks" => parsed.max_ticks = Self::number(&arg, args.next())?,
                "--realtime" => parsed.realtime = true,
                flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
                path => parsed.tuning = Some(path.into()),
            }
        }
        Ok(parsed)
    }

    fn number(flag: &str, value: Option<String>) -> Result<u64, String> {
        let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
        value
            .parse()
            .map_err(|e| format!("{flag} {value}: {e}"))
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is embedded by a web host; there is no standalone entry point
}
