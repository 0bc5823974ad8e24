use std::env;
use std::process::ExitCode;

use autodock::color::error_print;
use autodock::errors::exit_code_for_io_error;
use autodock::{dispatch, EngineClient};

fn main() -> ExitCode {
    let argv: Vec<String> = env::args().skip(1).collect();
    let engine = match EngineClient::from_env() {
        Ok(engine) => engine,
        Err(e) => {
            error_print(&e.to_string());
            return ExitCode::from(exit_code_for_io_error(&e));
        }
    };
    ExitCode::from(dispatch(&engine, &argv))
}
