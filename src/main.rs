use dotenvy::dotenv;
use snafu::ResultExt as _;

mod beacon;
mod config;
mod counter;
mod database;
mod error;
mod logger;
mod model;
mod web;

use error::{ApplicationError, ConnectDatabaseSnafu};

#[tokio::main]
async fn main() -> Result<(), ApplicationError> {
    dotenv().ok();

    let config = config::load()?;

    let _guard = logger::init(&config)?;

    let database = database::connect(&config.surreal)
        .await
        .context(ConnectDatabaseSnafu)?;

    web::serve(config, database).await
}
