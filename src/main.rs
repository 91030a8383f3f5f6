use kinematics::{Scenario, ScenarioConfig};
use kinematics::run_3d;
use kinematics::{bench_tick, bench_tick_curve};

use clap::Parser;
use anyhow::{Context, Result};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file inside `scenarios/`
    #[arg(short, long, default_value = "free_flight.yaml")]
    file_name: String,

    /// Run the scenario without the viewer and print final body states
    #[arg(long)]
    headless: bool,

    /// Time World::tick for growing body counts and exit
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path).with_context(|| format!("opening {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("parsing {}", config_path.display()))?;

    log::info!("loaded scenario {}", config_path.display());

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.bench {
        bench_tick()?;
        bench_tick_curve()?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;

    if args.headless {
        let failures = scenario.run_headless();
        if failures > 0 {
            log::warn!("{failures} trajectory log appends failed");
        }

        println!("t = {:.3} s", scenario.world.time());
        for b in scenario.world.bodies() {
            let x = b.position();
            let v = b.velocity();
            println!(
                "{:>12}  x = ({:.3}, {:.3}, {:.3})  v = ({:.3}, {:.3}, {:.3})  travelled = {:.3} m",
                b.id(), x.x, x.y, x.z, v.x, v.y, v.z, b.distance()
            );
        }
    } else {
        run_3d(scenario);
    }

    Ok(())
}
