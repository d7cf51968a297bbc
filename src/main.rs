use std::process::ExitCode;

use safe_tree::TreeError;
use safe_tree::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = safe_tree::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            let code = e.downcast_ref::<TreeError>().map_or(1, TreeError::code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
