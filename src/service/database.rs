// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection parameters.
//!
//! `db_provider = local` reads the connection from `db_*_local` keys. With
//! `db_provider = cloud` they come from the secret named by `db_secret_name`.

use crate::domain::provider::parse_source;
use crate::domain::{
    provider_key, ParamValue, ParameterStore, PliteError, ProviderSource, ResolverContext, Result,
};
use crate::service::secrets::Secrets;
use std::fmt;

/// Capability name of the database.
pub const DATABASE_CAPABILITY: &str = "db";

/// Key naming the secret that holds cloud database credentials.
pub const DB_SECRET_NAME_KEY: &str = "db_secret_name";

/// Connection parameters for a PostgreSQL-style database.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseParams {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// User name
    pub user: String,
    /// Password
    pub password: String,
}

impl DatabaseParams {
    /// Derives the database parameters for a resolved configuration.
    ///
    /// `secrets` is only consulted for a cloud database.
    pub fn from_context(context: &ResolverContext, secrets: &Secrets<'_>) -> Result<Self> {
        let key = provider_key(DATABASE_CAPABILITY);
        let value = context.params().get_str(&key).ok_or_else(|| {
            PliteError::MissingProviderSource {
                capability: DATABASE_CAPABILITY.to_string(),
            }
        })?;

        match parse_source(DATABASE_CAPABILITY, value)? {
            ProviderSource::Local => Self::from_local(context),
            ProviderSource::Cloud => {
                let name = context.params().require_str(DB_SECRET_NAME_KEY)?;
                tracing::debug!("Reading database parameters from secret [{}]", name);
                Self::from_secret(&secrets.get(name, None)?)
            }
            ProviderSource::Proxy => Err(PliteError::UnsupportedProviderSource {
                capability: DATABASE_CAPABILITY.to_string(),
                value: value.to_string(),
            }),
        }
    }

    fn from_local(context: &ResolverContext) -> Result<Self> {
        let params = context.params();
        Ok(Self {
            host: local_field(params, "host")?.to_plain_string("db_host_local")?,
            port: port(local_field(params, "port")?, "db_port_local")?,
            dbname: local_field(params, "name")?.to_plain_string("db_name_local")?,
            user: local_field(params, "user")?.to_plain_string("db_user_local")?,
            password: local_field(params, "password")?.to_plain_string("db_password_local")?,
        })
    }

    /// Reads the parameters from a secret holding `host`, `port`, `dbname`,
    /// `username` and `password`.
    pub fn from_secret(secret: &serde_json::Value) -> Result<Self> {
        let field = |name: &str| -> Result<ParamValue> {
            secret
                .get(name)
                .filter(|v| !v.is_null())
                .map(|v| ParamValue::new(v.clone()))
                .ok_or_else(|| PliteError::MissingParameter {
                    key: name.to_string(),
                })
        };

        Ok(Self {
            host: field("host")?.to_plain_string("host")?,
            port: port(&field("port")?, "port")?,
            dbname: field("dbname")?.to_plain_string("dbname")?,
            user: field("username")?.to_plain_string("username")?,
            password: field("password")?.to_plain_string("password")?,
        })
    }

    /// Renders the libpq key/value connection string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use plite::service::DatabaseParams;
    ///
    /// let params = DatabaseParams {
    ///     host: "localhost".to_string(),
    ///     port: 5432,
    ///     dbname: "demo".to_string(),
    ///     user: "app".to_string(),
    ///     password: "pw".to_string(),
    /// };
    /// assert_eq!(
    ///     params.connection_string(),
    ///     "host=localhost port=5432 dbname=demo user=app password=pw"
    /// );
    /// ```
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.dbname, self.user, self.password
        )
    }
}

impl fmt::Debug for DatabaseParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn local_field<'p>(params: &'p ParameterStore, name: &str) -> Result<&'p ParamValue> {
    let key = format!("db_{}_local", name);
    params
        .get(&key)
        .filter(|v| !v.is_null())
        .ok_or(PliteError::MissingParameter { key })
}

fn port(value: &ParamValue, key: &str) -> Result<u16> {
    let port = value.as_u64(key)?;
    u16::try_from(port).map_err(|e| PliteError::TypeConversion {
        key: key.to_string(),
        target_type: "u16".to_string(),
        source: Box::new(e),
    })
}
