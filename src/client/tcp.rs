use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::client::Source;
use crate::common::debug;
use crate::protocol::connection::Connection;
use crate::protocol::frame::Frame;
use crate::{Cursor, DumperError, Dump, Key, Result};

pub struct Client<T = TcpStream> {
    connection: Connection<T>,
}

impl Client<TcpStream> {
    pub async fn from_addr(addr: impl ToSocketAddrs) -> Result<Self> {
        Ok(Client::new(TcpStream::connect(addr).await?))
    }

    /// Connect to `addr` and switch to database `db`.
    pub async fn connect(addr: impl ToSocketAddrs, db: i64) -> Result<Self> {
        let mut client = Client::from_addr(addr).await?;
        if db != 0 {
            client.select(db).await?;
        }
        Ok(client)
    }
}

impl<T> Client<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: T) -> Self {
        Self {
            connection: Connection::new(stream, Some(1024 * 4)),
        }
    }

    pub async fn select(&mut self, db: i64) -> Result<()> {
        let db = db.to_string();
        match self.request("SELECT", &[b"SELECT", db.as_bytes()]).await? {
            Frame::Simple(_) => {
                debug!(db = %db, "Selected database");
                Ok(())
            }
            frame => Err(unexpected("SELECT", frame)),
        }
    }

    async fn request(&mut self, command: &'static str, args: &[&[u8]]) -> Result<Frame> {
        match self.connection.request(args).await? {
            Frame::Error(message) => Err(DumperError::Server(message)),
            frame => {
                tracing::trace!(command, reply = %frame, "Reply");
                Ok(frame)
            }
        }
    }
}

#[async_trait]
impl<T> Source for Client<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn scan(&mut self, cursor: Cursor, count: usize) -> Result<(Cursor, Vec<Key>)> {
        let cursor = cursor.to_string();
        let count = count.to_string();
        let reply = self
            .request(
                "SCAN",
                &[b"SCAN", cursor.as_bytes(), b"COUNT", count.as_bytes()],
            )
            .await?;

        let (next, keys) = match reply {
            Frame::Array(mut frames) if frames.len() == 2 => {
                let keys = frames.pop();
                let next = frames.pop();
                match (next, keys) {
                    (Some(Frame::Bulk(next)), Some(Frame::Array(keys))) => (next, keys),
                    (next, keys) => {
                        let reply = Frame::Array(next.into_iter().chain(keys).collect());
                        return Err(unexpected("SCAN", reply));
                    }
                }
            }
            frame => return Err(unexpected("SCAN", frame)),
        };

        let next = atoi::atoi::<u64>(&next)
            .filter(|_| !next.is_empty() && next.iter().all(u8::is_ascii_digit))
            .map(Cursor::new)
            .ok_or_else(|| DumperError::UnexpectedReply {
                command: "SCAN",
                reply: format!("cursor {:?}", String::from_utf8_lossy(&next)),
            })?;

        let keys = keys
            .into_iter()
            .map(|frame| match frame {
                Frame::Bulk(key) => Ok(Key::from(key)),
                frame => Err(unexpected("SCAN", frame)),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((next, keys))
    }

    async fn dump(&mut self, key: &Key) -> Result<Dump> {
        match self.request("DUMP", &[b"DUMP", &key[..]]).await? {
            Frame::Bulk(dump) => Ok(Dump::from(dump)),
            Frame::Null => Err(DumperError::KeyNotFound { key: key.clone() }),
            frame => Err(unexpected("DUMP", frame)),
        }
    }

    async fn ttl(&mut self, key: &Key) -> Result<chrono::Duration> {
        match self.request("PTTL", &[b"PTTL", &key[..]]).await? {
            Frame::Integer(ms) => Ok(chrono::Duration::milliseconds(ms)),
            frame => Err(unexpected("PTTL", frame)),
        }
    }
}

fn unexpected(command: &'static str, frame: Frame) -> DumperError {
    DumperError::UnexpectedReply {
        command,
        reply: frame.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

    // Serve canned replies, one per received command, in order.
    fn serve(
        mut server: DuplexStream,
        replies: Vec<&'static [u8]>,
    ) -> tokio::task::JoinHandle<Vec<u8>> {
        tokio::spawn(async move {
            let mut received = Vec::new();
            for reply in replies {
                let mut buf = [0u8; 1024];
                let n = server.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
                server.write_all(reply).await.unwrap();
            }
            received
        })
    }

    #[test]
    fn scan_round() {
        tokio_test::block_on(async move {
            let (client, server) = tokio::io::duplex(1024);
            let handle = serve(
                server,
                vec![&b"*2\r\n$2\r\n42\r\n*3\r\n$1\r\na\r\n$1\r\nb\r\n$3\r\n\xff\x00c\r\n"[..]],
            );
            let mut client = Client::new(client);

            let (cursor, keys) = client.scan(Cursor::START, 1000).await.unwrap();
            assert_eq!(cursor, Cursor::new(42));
            assert_eq!(
                keys,
                vec![Key::from("a"), Key::from("b"), Key::new(&b"\xff\x00c"[..])]
            );

            let received = handle.await.unwrap();
            assert_eq!(
                &received[..],
                &b"*4\r\n$4\r\nSCAN\r\n$1\r\n0\r\n$5\r\nCOUNT\r\n$4\r\n1000\r\n"[..]
            );
        })
    }

    #[test]
    fn dump_and_ttl() {
        tokio_test::block_on(async move {
            let (client, server) = tokio::io::duplex(1024);
            let handle = serve(server, vec![&b"$3\r\nAAA\r\n"[..], &b":2500\r\n"[..], &b":-1\r\n"[..]]);
            let mut client = Client::new(client);
            let key = Key::from("a");

            assert_eq!(client.dump(&key).await.unwrap(), Dump::from(&b"AAA"[..]));
            assert_eq!(
                client.ttl(&key).await.unwrap(),
                chrono::Duration::milliseconds(2500)
            );
            assert_eq!(
                client.ttl(&key).await.unwrap(),
                chrono::Duration::milliseconds(-1)
            );

            handle.await.unwrap();
        })
    }

    #[test]
    fn dump_missing_key() {
        tokio_test::block_on(async move {
            let (client, server) = tokio::io::duplex(1024);
            let handle = serve(server, vec![&b"$-1\r\n"[..]]);
            let mut client = Client::new(client);

            let err = client.dump(&Key::from("gone")).await.unwrap_err();
            assert!(matches!(err, DumperError::KeyNotFound { key } if key == Key::from("gone")));

            handle.await.unwrap();
        })
    }

    #[test]
    fn server_error_reply() {
        tokio_test::block_on(async move {
            let (client, server) = tokio::io::duplex(1024);
            let handle = serve(server, vec![&b"-ERR DB index is out of range\r\n"[..]]);
            let mut client = Client::new(client);

            let err = client.select(99).await.unwrap_err();
            assert!(
                matches!(&err, DumperError::Server(message) if message == "ERR DB index is out of range")
            );

            handle.await.unwrap();
        })
    }

    #[test]
    fn malformed_scan_reply() {
        tokio_test::block_on(async move {
            let (client, server) = tokio::io::duplex(1024);
            let handle = serve(server, vec![&b"*2\r\n$3\r\nabc\r\n*0\r\n"[..], &b":1\r\n"[..]]);
            let mut client = Client::new(client);

            let err = client.scan(Cursor::START, 10).await.unwrap_err();
            assert!(matches!(err, DumperError::UnexpectedReply { command: "SCAN", .. }));

            let err = client.scan(Cursor::START, 10).await.unwrap_err();
            assert!(matches!(err, DumperError::UnexpectedReply { command: "SCAN", .. }));

            handle.await.unwrap();
        })
    }
}
