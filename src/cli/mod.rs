use clap::Parser;

use crate::common::info;
use crate::config::{env, Config};
use crate::Result;

const ABOUT: &str = "Dump every key of a redis database into a file of RESTORE commands";

const LONG_ABOUT: &str = "\
Dump every key of a redis database into a file in the redis protocol format.

The file holds one RESTORE command per key and can be piped directly into
another redis instance:

    cat redis_db_0_dump.rdb | redis-cli --pipe

It only relies on SCAN, DUMP and PTTL, so it also works against managed
deployments (e.g. AWS Elasticache) where SAVE/BGSAVE are not available.";

/// Redis dumper command
#[derive(Parser, Debug)]
#[command(version, about = ABOUT, long_about = LONG_ABOUT)]
pub struct DumperCommand {
    /// Indicate which db to process
    #[arg(long, env = env::DB, default_value_t = Config::DEFAULT_DB)]
    pub db: i64,
    /// Redis address (url and port)
    #[arg(long, env = env::ADDRESS, default_value = Config::DEFAULT_ADDRESS)]
    pub address: String,
}

/// Parse command line args
pub fn parse() -> DumperCommand {
    DumperCommand::parse()
}

impl DumperCommand {
    pub fn config(&self) -> Config {
        Config::new(self.db, self.address.clone())
    }

    pub async fn run(self) -> Result<()> {
        let config = self.config();

        info!("Start processing");
        crate::export(&config).await?;
        info!("End processing");

        Ok(())
    }
}
