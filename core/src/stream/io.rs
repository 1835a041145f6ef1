//! Normalized I/O for the whole-stream API plus the short-read helpers
//! shared by the header codec and the decoder.

use std::io::{self, ErrorKind, Read, Write};
use std::path::PathBuf;

use bytes::{BufMut, Bytes, BytesMut};

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
///
/// `Memory` output is returned to the caller in the stream report.
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    Memory,
}

/// Normalize input source into a boxed reader
pub fn open_input(src: InputSource) -> io::Result<Box<dyn Read + Send>> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => Box::new(std::fs::File::open(p)?),
        InputSource::Memory(b) => Box::new(io::Cursor::new(b)),
    };
    Ok(reader)
}

/// Normalize a non-memory output sink into a boxed writer.
///
/// Returns `None` for `OutputSink::Memory`; the caller owns that buffer.
pub fn open_output(sink: OutputSink) -> io::Result<Option<Box<dyn Write + Send>>> {
    match sink {
        OutputSink::Writer(w) => Ok(Some(w)),
        OutputSink::File(p) => Ok(Some(Box::new(io::BufWriter::new(std::fs::File::create(p)?)))),
        OutputSink::Memory => Ok(None),
    }
}

/// Read up to `len` octets, stopping early only at end of input.
///
/// A short result means the source is exhausted. The buffer grows with the data,
/// so a large `len` does not allocate up front.
pub fn read_up_to<R: Read>(r: &mut R, len: usize) -> io::Result<Bytes> {
    let mut buf = BytesMut::with_capacity(len.min(64 * 1024)).writer();
    io::copy(&mut r.by_ref().take(len as u64), &mut buf)?;
    Ok(buf.into_inner().freeze())
}

/// True when `r` has no further octets.
///
/// Consumes one octet when data remains; callers only use this where any
/// remaining data is already an error.
pub fn at_eof<R: Read>(r: &mut R) -> io::Result<bool> {
    let mut probe = [0u8; 1];
    loop {
        match r.read(&mut probe) {
            Ok(0) => return Ok(true),
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
