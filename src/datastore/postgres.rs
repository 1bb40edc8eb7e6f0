mod bookmark_store;
mod errors;
mod follow_store;
mod like_store;
mod post_store;
mod user_store;

use crate::config::Config;
use crate::twoface::{Cause, DescribeErr, ExternalError, Fallible};
use actix_web::web::block;
use diesel::{
    pg::PgConnection,
    r2d2::{ConnectionManager, Pool},
    result::Error as DieselError,
};
use errors::BlockingResp;
use prometheus::{
    core::{Collector, Desc},
    proto::MetricFamily,
    IntGauge, Opts,
};
use std::time::Duration;

pub struct Dsn {
    secret: String,
}

impl Dsn {
    pub fn new(config: &Config) -> Self {
        Dsn {
            secret: config.db_dsn.clone(),
        }
    }
}

impl From<Dsn> for String {
    fn from(dsn: Dsn) -> String {
        dsn.secret
    }
}

const POOL_EXHAUSTED: ExternalError = ExternalError {
    cause: Cause::StoreUnavailable,
    text: "Database is unavailable",
};

/// An implementation of every datastore trait, backed by Postgres
#[derive(Clone)]
pub struct PostgresStore {
    pool: Pool<ConnectionManager<PgConnection>>,
    idle_conns: IntGauge,
    conns: IntGauge,
}

impl PostgresStore {
    pub fn new(
        dsn: Dsn,
        max_pool_size: u32,
        conn_timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let manager = ConnectionManager::<PgConnection>::new(dsn);
        let pool = Pool::builder()
            .max_size(max_pool_size)
            .connection_timeout(conn_timeout)
            .build(manager)?;
        let idle_conns = IntGauge::with_opts(Opts::new(
            "tuiter_db_connections_idle",
            "How many DB connections are currently idle",
        ))?;
        let conns = IntGauge::with_opts(Opts::new(
            "tuiter_db_connections",
            "How many DB connections are open",
        ))?;
        Ok(Self {
            pool,
            idle_conns,
            conns,
        })
    }

    /// Check a connection out of the pool and run `query` with it on the blocking threadpool.
    /// Each call is its own implicit transaction.
    async fn run<F, T>(&self, query: F) -> Fallible<T>
    where
        F: FnOnce(&PgConnection) -> Result<T, DieselError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.pool.get().describe_err(POOL_EXHAUSTED)?;
        block(move || query(&*conn)).await.to_resp()
    }
}

impl Collector for PostgresStore {
    fn desc(&self) -> Vec<&Desc> {
        let mut descs = self.idle_conns.desc();
        descs.extend(self.conns.desc());
        descs
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.idle_conns
            .set(self.pool.state().idle_connections as i64);
        self.conns.set(self.pool.state().connections as i64);
        let mut metrics = self.idle_conns.collect();
        metrics.extend(self.conns.collect());
        metrics
    }
}
