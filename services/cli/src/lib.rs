mod cli;
mod demo;
mod infra;

use job_board::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
