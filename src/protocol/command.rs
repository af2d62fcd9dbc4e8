use bytes::{BufMut, BytesMut};

use crate::protocol::DELIMITER;

pub(crate) mod prefix {
    pub(crate) const ARRAY: u8 = b'*';
    pub(crate) const BULK: u8 = b'$';
}

// Encode args as a request-multi-bulk command.
// *<number of args>\r\n followed by $<len>\r\n<arg>\r\n for each arg.
pub(crate) fn encode<A: AsRef<[u8]>>(args: &[A], dst: &mut BytesMut) {
    dst.reserve(encoded_len(args));

    dst.put_u8(prefix::ARRAY);
    put_decimal(dst, args.len() as u64);

    for arg in args {
        let arg = arg.as_ref();
        dst.put_u8(prefix::BULK);
        put_decimal(dst, arg.len() as u64);
        dst.put_slice(arg);
        dst.put_slice(DELIMITER);
    }
}

pub(crate) fn encoded_len<A: AsRef<[u8]>>(args: &[A]) -> usize {
    args.iter().fold(1 + decimal_len(args.len() as u64) + 2, |acc, arg| {
        let n = arg.as_ref().len();
        acc + 1 + decimal_len(n as u64) + 2 + n + 2
    })
}

fn put_decimal(dst: &mut BytesMut, val: u64) {
    use std::fmt::Write;

    // writing to BytesMut never fails.
    let _ = write!(dst, "{}", val);
    dst.put_slice(DELIMITER);
}

fn decimal_len(mut val: u64) -> usize {
    let mut n = 1;
    while val >= 10 {
        val /= 10;
        n += 1;
    }
    n
}
