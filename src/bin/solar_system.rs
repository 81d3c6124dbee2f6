use env_logger::Env;
use tessera::{app::ExerciseApp, solar::SolarSystem};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    ExerciseApp::new(SolarSystem::new())?.run()
}
