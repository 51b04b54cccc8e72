//! High-performance input layer
//!
//! Opens interval files with transparent gzip/bzip2 decompression and
//! memory maps large plain files.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Read buffer for compressed and small plain inputs
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Read buffer for plain inputs of 10MB and up
pub const LARGE_BUFFER_SIZE: usize = 1024 * 1024;

/// Plain inputs at least this large are memory mapped
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Plain,
    /// gzip or bgzip
    Gzip,
    Bzip2,
}

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";

/// Detect compression from the extension, falling back to magic bytes
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("gz") | Some("bgz") => return Ok(CompressionFormat::Gzip),
        Some("bz2") => return Ok(CompressionFormat::Bzip2),
        _ => {}
    }

    let mut magic = Vec::with_capacity(3);
    File::open(path)?.take(3).read_to_end(&mut magic)?;
    Ok(if magic.starts_with(GZIP_MAGIC) {
        CompressionFormat::Gzip
    } else if magic.starts_with(BZIP2_MAGIC) {
        CompressionFormat::Bzip2
    } else {
        CompressionFormat::Plain
    })
}

/// Plain input served straight from a memory map
pub struct MappedReader {
    mmap: Mmap,
    offset: usize,
}

impl MappedReader {
    pub fn new(file: &File) -> io::Result<Self> {
        // SAFETY: inputs are read-only for the duration of a run
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, offset: 0 })
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

impl Read for MappedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = (&self.mmap[self.offset..]).read(buf)?;
        self.offset += n;
        Ok(n)
    }
}

impl BufRead for MappedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.mmap[self.offset..])
    }

    fn consume(&mut self, amt: usize) {
        self.offset = (self.offset + amt).min(self.mmap.len());
    }
}

/// Boxed line source handed to the parsers
pub type InputReader = Box<dyn BufRead + Send>;

/// Open an input file, picking decompression and buffering automatically
pub fn open_input<P: AsRef<Path>>(path: P) -> io::Result<InputReader> {
    let path = path.as_ref();
    let format = detect_compression(path)?;
    let file = File::open(path)?;

    Ok(match format {
        CompressionFormat::Gzip => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            flate2::read::MultiGzDecoder::new(file),
        )),
        CompressionFormat::Bzip2 => Box::new(BufReader::with_capacity(
            DEFAULT_BUFFER_SIZE,
            bzip2::read::BzDecoder::new(file),
        )),
        CompressionFormat::Plain => match file.metadata()?.len() {
            size if size >= MMAP_THRESHOLD => Box::new(MappedReader::new(&file)?),
            size if size >= LARGE_BUFFER_SIZE as u64 * 10 => {
                Box::new(BufReader::with_capacity(LARGE_BUFFER_SIZE, file))
            }
            _ => Box::new(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)),
        },
    })
}

/// Byte line iterator that reuses one buffer across lines
pub struct ByteLineIterator<R: BufRead> {
    reader: R,
    buffer: Vec<u8>,
    line_number: usize,
}

impl<R: BufRead> ByteLineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
            line_number: 0,
        }
    }

    /// Read the next line as bytes, without the line terminator
    pub fn next_line(&mut self) -> Option<io::Result<&[u8]>> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                let mut line: &[u8] = &self.buffer;
                if let Some(rest) = line.strip_suffix(b"\n") {
                    line = rest.strip_suffix(b"\r").unwrap_or(rest);
                }
                Some(Ok(line))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// 1-based number of the line last returned
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read_all(mut reader: InputReader) -> io::Result<String> {
        let mut s = String::new();
        reader.read_to_string(&mut s)?;
        Ok(s)
    }

    #[test]
    fn test_detect_plain() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        writeln!(temp, "chr1\t0\t10\t0.5")?;
        temp.flush()?;
        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Plain);
        assert_eq!(read_all(open_input(temp.path())?)?, "chr1\t0\t10\t0.5\n");
        Ok(())
    }

    #[test]
    fn test_gzip_by_magic() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        {
            let mut enc = flate2::write::GzEncoder::new(&mut temp, flate2::Compression::default());
            enc.write_all(b"chr1\t0\t10\t0.5\n")?;
            enc.finish()?;
        }
        temp.flush()?;
        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Gzip);
        assert_eq!(read_all(open_input(temp.path())?)?, "chr1\t0\t10\t0.5\n");
        Ok(())
    }

    #[test]
    fn test_bzip2_by_magic() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        {
            let mut enc = bzip2::write::BzEncoder::new(&mut temp, bzip2::Compression::default());
            enc.write_all(b"chr2\t5\t6\t0.1\n")?;
            enc.finish()?;
        }
        temp.flush()?;
        assert_eq!(detect_compression(temp.path())?, CompressionFormat::Bzip2);
        assert_eq!(read_all(open_input(temp.path())?)?, "chr2\t5\t6\t0.1\n");
        Ok(())
    }

    #[test]
    fn test_byte_line_iterator() -> io::Result<()> {
        let data: &[u8] = b"line1\r\nline2\nline3";
        let mut iter = ByteLineIterator::new(data);

        assert_eq!(iter.next_line().unwrap()?, b"line1");
        assert_eq!(iter.next_line().unwrap()?, b"line2");
        assert_eq!(iter.next_line().unwrap()?, b"line3");
        assert_eq!(iter.line_number(), 3);
        assert!(iter.next_line().is_none());
        Ok(())
    }

    #[test]
    fn test_mapped_reader() -> io::Result<()> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(b"test content")?;
        temp.flush()?;

        let file = File::open(temp.path())?;
        let mut reader = MappedReader::new(&file)?;
        assert_eq!(reader.len(), 12);
        assert!(!reader.is_empty());

        let mut s = String::new();
        reader.read_to_string(&mut s)?;
        assert_eq!(s, "test content");
        Ok(())
    }
}
