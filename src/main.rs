use std::process::ExitCode;

use shaded_sphere::{AppConfig, run};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("shaded_sphere=info,warn"))
        .init();

    match run(AppConfig::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
