use std::path::PathBuf;

pub mod env {
    pub const LOG_DIRECTIVE: &str = "REDIS_DUMPER_LOG";
    pub const DB: &str = "REDIS_DUMPER_DB";
    pub const ADDRESS: &str = "REDIS_DUMPER_ADDRESS";
}

// Export configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Database index to export.
    db: i64,
    // Server address (host:port).
    address: String,
    // COUNT hint passed to each SCAN round.
    batch_size: usize,
    // Directory the dump file is created in.
    output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db: Config::DEFAULT_DB,
            address: Config::DEFAULT_ADDRESS.to_owned(),
            batch_size: Config::DEFAULT_BATCH_SIZE,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub const DEFAULT_DB: i64 = 0;
    pub const DEFAULT_ADDRESS: &'static str = "localhost:6379";
    pub const DEFAULT_BATCH_SIZE: usize = 1000;

    pub fn new(db: i64, address: impl Into<String>) -> Self {
        Self {
            db,
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn db(&self) -> i64 {
        self.db
    }
    pub fn address(&self) -> &str {
        &self.address
    }
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn set_batch_size(&mut self, val: Option<usize>) {
        if let Some(val) = val {
            self.batch_size = std::cmp::max(val, 1);
        }
    }
    pub fn set_output_dir(&mut self, val: &mut Option<PathBuf>) {
        if let Some(val) = val.take() {
            self.output_dir = val;
        }
    }

    pub fn output_file_name(&self) -> String {
        format!("redis_db_{}_dump.rdb", self.db)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(self.output_file_name())
    }
}
