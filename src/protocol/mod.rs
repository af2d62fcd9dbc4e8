pub(crate) mod command;
pub(crate) mod connection;
pub(crate) mod frame;

use std::fmt;
use std::ops::Deref;

pub(crate) const DELIMITER: &[u8; 2] = b"\r\n";

// Key is an opaque byte string as enumerated by the server.
// it is neither normalized nor validated.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key(Box<[u8]>);

impl Deref for Key {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.deref()))
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Key({:?})", String::from_utf8_lossy(self.deref()))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::new(s.as_bytes())
    }
}

impl From<Vec<u8>> for Key {
    fn from(v: Vec<u8>) -> Self {
        Key(v.into_boxed_slice())
    }
}

impl Key {
    pub fn new(v: impl Into<Box<[u8]>>) -> Self {
        Self(v.into())
    }

    pub fn into_boxed_bytes(self) -> Box<[u8]> {
        self.0
    }
}

// Dump is the serialized value of a key in the server's persistence format.
// It is copied to the output as is, never parsed.
#[derive(Clone, PartialEq, Eq)]
pub struct Dump(Box<[u8]>);

impl Deref for Dump {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for Dump {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Dump({} bytes)", self.0.len())
    }
}

impl From<&[u8]> for Dump {
    fn from(v: &[u8]) -> Self {
        Dump::new(v)
    }
}

impl From<Vec<u8>> for Dump {
    fn from(v: Vec<u8>) -> Self {
        Dump(v.into_boxed_slice())
    }
}

impl Dump {
    pub fn new(v: impl Into<Box<[u8]>>) -> Self {
        Self(v.into())
    }
}

// Cursor is the SCAN iteration position.
// Zero starts a full iteration and signals its end.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Cursor(u64);

impl Cursor {
    pub const START: Cursor = Cursor(0);

    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn is_complete(&self) -> bool {
        self.0 == 0
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Cursor {
    fn from(n: u64) -> Self {
        Cursor(n)
    }
}
