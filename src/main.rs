//! wavedraw entry point.

mod app;
mod commands;
mod config;
mod editor;
mod logging;
mod ui;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    app::run().await
}
