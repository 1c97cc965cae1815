//! crash-recon entry point
//!
//! Usage: `crash-recon <scenario.json> [settings.json]`
//!
//! Runs the first-collision search on a recorded scenario and prints the
//! reconstructed contact (plus the reference comparison, if the scenario
//! carries one) as JSON on stdout.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use serde::Serialize;

    use crash_recon::{
        CollisionComparison, CollisionError, CollisionInstant, CollisionScenario, ReconstructionSettings,
        find_first_collision_instant,
    };

    #[derive(Serialize)]
    struct Report {
        instant: CollisionInstant,
        #[serde(skip_serializing_if = "Option::is_none")]
        comparison: Option<CollisionComparison>,
    }

    fn run(scenario_path: PathBuf, settings_path: Option<PathBuf>) -> Result<Report, CollisionError> {
        let settings = match settings_path {
            Some(path) => ReconstructionSettings::load(&path)?,
            None => ReconstructionSettings::default(),
        };
        let scenario = CollisionScenario::load(&scenario_path)?;

        let instant = find_first_collision_instant(&scenario, scenario.collision_time_ms, &settings)?;
        let comparison = scenario
            .reference
            .as_ref()
            .map(|reference| CollisionComparison::new(&instant.contact, reference))
            .transpose()?;

        if let Some(cmp) = &comparison {
            log::info!("Max position error vs reference: {:.4}", cmp.max_position_error());
        }
        Ok(Report { instant, comparison })
    }

    pub fn main() -> ExitCode {
        env_logger::init();

        let mut args = std::env::args_os().skip(1);
        let Some(scenario_path) = args.next().map(PathBuf::from) else {
            eprintln!("usage: crash-recon <scenario.json> [settings.json]");
            return ExitCode::from(2);
        };
        let settings_path = args.next().map(PathBuf::from);

        let report = match run(scenario_path, settings_path) {
            Ok(report) => report,
            Err(e) => {
                log::error!("Reconstruction failed ({}): {}", e.kind(), e);
                return ExitCode::FAILURE;
            }
        };

        match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to serialize report: {}", e);
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No command line on wasm; the library is used directly
}
