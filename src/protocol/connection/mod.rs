use std::io::Cursor;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

use crate::common::{ErrorKind, Result};
use crate::protocol::command;
use crate::protocol::frame::{Error as FrameError, Frame};

pub(crate) struct Connection<T = TcpStream> {
    stream: BufWriter<T>,
    // The buffer for reading frames.
    buffer: BytesMut,
    // The buffer for encoding commands.
    write_buffer: BytesMut,
}

impl<T> Connection<T>
where
    T: AsyncWrite + AsyncRead + Unpin,
{
    pub(crate) fn new(stream: T, buffer_size: Option<usize>) -> Self {
        Self {
            stream: BufWriter::new(stream),
            buffer: BytesMut::with_capacity(buffer_size.unwrap_or(4 * 1024)),
            write_buffer: BytesMut::new(),
        }
    }

    pub(crate) async fn write_command<A: AsRef<[u8]>>(&mut self, args: &[A]) -> Result<()> {
        self.write_buffer.clear();
        command::encode(args, &mut self.write_buffer);

        self.stream.write_all(&self.write_buffer).await?;
        self.stream.flush().await?;
        Ok(())
    }

    // Send command and wait for its reply.
    pub(crate) async fn request<A: AsRef<[u8]>>(&mut self, args: &[A]) -> Result<Frame> {
        self.write_command(args).await?;
        match self.read_frame().await? {
            Some(frame) => Ok(frame),
            None => Err(ErrorKind::ConnectionResetByPeer.into()),
        }
    }

    pub(crate) async fn read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                return if self.buffer.is_empty() {
                    Ok(None)
                } else {
                    Err(ErrorKind::ConnectionResetByPeer.into())
                };
            }
        }
    }

    fn parse_frame(&mut self) -> Result<Option<Frame>> {
        use FrameError::Incomplete;

        let mut buf = Cursor::new(&self.buffer[..]);

        match Frame::check(&mut buf) {
            Ok(_) => {
                let len = buf.position() as usize;
                buf.set_position(0);
                let frame = Frame::parse(&mut buf)?;
                self.buffer.advance(len);

                Ok(Some(frame))
            }
            Err(Incomplete) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
