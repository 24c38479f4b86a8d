use std::ops::Deref;

use snafu::{Location, ResultExt as _, Snafu};
use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::Surreal;
use url::Url;

use crate::config::SurrealConfig;

pub type Result<T, E = DatabaseError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DatabaseError {
    #[snafu(display("cannot connect to the database `{url}` at {location}: {source}"))]
    Connection {
        url: Url,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot sign in to the database `{url}` at {location}: {source}"))]
    Signin {
        url: Url,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot select namespace or database on `{url}` at {location}: {source}"))]
    SelectNamespace {
        url: Url,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

/// A shared handle to the store holding the view count.
#[derive(Debug, Clone)]
pub struct Database {
    database: Surreal<Any>,
}

/// Connects to whatever engine the endpoint names. Credentials are only used
/// when both are configured; embedded engines such as `mem://` take none.
pub async fn connect(config: &SurrealConfig) -> Result<Database> {
    let url = &config.endpoint;

    let database = surrealdb::engine::any::connect(url.as_str())
        .await
        .context(ConnectionSnafu { url: url.clone() })?;

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        let credentials = auth::Database {
            username,
            password,
            namespace: &config.namespace,
            database: &config.database,
        };

        database
            .signin(credentials)
            .await
            .context(SigninSnafu { url: url.clone() })?;
    }

    database
        .use_ns(config.namespace.as_str())
        .use_db(config.database.as_str())
        .await
        .context(SelectNamespaceSnafu { url: url.clone() })?;

    Ok(Database { database })
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.database
    }
}
