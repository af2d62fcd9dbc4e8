#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub fn temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("redis_dumper=trace"))
        .with_test_writer()
        .try_init();
}

// Expected bytes of one RESTORE record.
pub fn restore(key: &[u8], ttl_ms: &str, dump: &[u8]) -> Vec<u8> {
    let mut buf = b"*4\r\n$7\r\nRESTORE\r\n".to_vec();
    for arg in [key, ttl_ms.as_bytes(), dump] {
        buf.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        buf.extend_from_slice(arg);
        buf.extend_from_slice(b"\r\n");
    }
    buf
}

#[derive(Clone)]
pub struct Entry {
    pub dump: Vec<u8>,
    // PTTL reply. -1 means no expiry.
    pub pttl: i64,
}

// In memory redis speaking just enough of the protocol for an export:
// SELECT, SCAN, DUMP and PTTL over a single connection.
#[derive(Default)]
pub struct FakeRedis {
    pub databases: BTreeMap<i64, Vec<(Vec<u8>, Entry)>>,
    // Keys DUMP answers nil for, as if deleted after SCAN.
    pub vanished: Vec<Vec<u8>>,
    pub received: Vec<Vec<Vec<u8>>>,
}

impl FakeRedis {
    pub fn insert(&mut self, db: i64, key: &[u8], dump: &[u8], pttl: i64) {
        self.databases.entry(db).or_default().push((
            key.to_vec(),
            Entry {
                dump: dump.to_vec(),
                pttl,
            },
        ));
    }

    pub fn commands(&self) -> Vec<String> {
        self.received
            .iter()
            .map(|args| {
                args.iter()
                    .map(|arg| String::from_utf8_lossy(arg).into_owned())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    pub async fn serve(self) -> (SocketAddr, Arc<Mutex<FakeRedis>>, JoinHandle<()>) {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(self));

        let shared = state.clone();
        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            handle_connection(stream, shared).await;
        });

        (addr, state, handle)
    }

    fn reply(&mut self, db: &mut i64, args: &[Vec<u8>]) -> Vec<u8> {
        let name = String::from_utf8_lossy(&args[0]).to_uppercase();
        match name.as_str() {
            "SELECT" => {
                *db = parse(&args[1]);
                b"+OK\r\n".to_vec()
            }
            "SCAN" => {
                let cursor = parse(&args[1]) as usize;
                let count = parse(&args[3]) as usize;
                let keys = self.databases.get(&*db).cloned().unwrap_or_default();

                let end = std::cmp::min(cursor + count, keys.len());
                let next = if end >= keys.len() { 0 } else { end };

                let mut buf = b"*2\r\n".to_vec();
                buf.extend_from_slice(&bulk(next.to_string().as_bytes()));
                buf.extend_from_slice(format!("*{}\r\n", end - cursor).as_bytes());
                for (key, _) in &keys[cursor..end] {
                    buf.extend_from_slice(&bulk(key));
                }
                buf
            }
            "DUMP" => match self.lookup(*db, &args[1]) {
                Some(entry) => bulk(&entry.dump),
                None => b"$-1\r\n".to_vec(),
            },
            "PTTL" => match self.lookup(*db, &args[1]) {
                Some(entry) => format!(":{}\r\n", entry.pttl).into_bytes(),
                None => b":-2\r\n".to_vec(),
            },
            _ => format!("-ERR unknown command '{}'\r\n", name).into_bytes(),
        }
    }

    fn lookup(&self, db: i64, key: &[u8]) -> Option<Entry> {
        if self.vanished.iter().any(|k| k == key) {
            return None;
        }
        self.databases
            .get(&db)?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entry)| entry.clone())
    }
}

async fn handle_connection(stream: TcpStream, state: Arc<Mutex<FakeRedis>>) {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut db = 0;

    while let Some(args) = read_command(&mut reader).await {
        let reply = {
            let mut state = state.lock().unwrap();
            state.received.push(args.clone());
            state.reply(&mut db, &args)
        };
        writer.write_all(&reply).await.unwrap();
    }
}

async fn read_command<R>(reader: &mut BufReader<R>) -> Option<Vec<Vec<u8>>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut line = String::new();
    if reader.read_line(&mut line).await.unwrap() == 0 {
        return None;
    }
    let n: usize = line.trim_end().trim_start_matches('*').parse().unwrap();

    let mut args = Vec::with_capacity(n);
    for _ in 0..n {
        line.clear();
        reader.read_line(&mut line).await.unwrap();
        let len: usize = line.trim_end().trim_start_matches('$').parse().unwrap();

        let mut arg = vec![0u8; len + 2];
        reader.read_exact(&mut arg).await.unwrap();
        arg.truncate(len);
        args.push(arg);
    }
    Some(args)
}

fn bulk(v: &[u8]) -> Vec<u8> {
    let mut buf = format!("${}\r\n", v.len()).into_bytes();
    buf.extend_from_slice(v);
    buf.extend_from_slice(b"\r\n");
    buf
}

fn parse(v: &[u8]) -> i64 {
    std::str::from_utf8(v).unwrap().parse().unwrap()
}
