pub mod admin;
mod cli;
pub mod config;
pub mod error;
mod infra;
mod routes;
mod server;
pub mod telemetry;

use error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
