use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{Decoder, Encoder, Error, FileOptions, Mode, Result};

/// Archive writing to a file.
pub type FileEncoder = Encoder<FileSink>;
/// Archive reading from a file.
pub type FileDecoder = Decoder<FileSource>;

fn open_error(path: &Path, mode: Mode, source: io::Error) -> Error {
    warn!("Failed to open {} for {mode}: {source}", path.display());
    Error::Open {
        path: path.to_owned(),
        mode,
        source,
    }
}

/// Buffered output file, exclusively owned for the life of one archive.
///
/// The handle is closed on drop whether or not anything was written. Call
/// [`Encoder::finish`] to see flush errors instead of losing them in `Drop`.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    inner: BufWriter<File>,
    sync: bool,
}

impl FileSink {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: &Path, options: &FileOptions) -> Result<Self> {
        if options.create_dirs
            && let Some(parent) = path.parent()
        {
            fs::create_dir_all(parent).map_err(|e| open_error(path, Mode::Write, e))?;
        }

        let file = File::create(path).map_err(|e| open_error(path, Mode::Write, e))?;
        debug!("File created: {}", path.display());

        Ok(Self {
            path: path.to_owned(),
            inner: BufWriter::with_capacity(options.buffer_capacity, file),
            sync: options.sync,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for FileSink {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()?;
        if self.sync {
            self.inner.get_ref().sync_all()?;
            debug!("File synced: {}", self.path.display());
        }
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        debug!("File closed: {}", self.path.display());
    }
}

/// Buffered input file, exclusively owned for the life of one archive.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    inner: BufReader<File>,
}

impl FileSource {
    pub fn open(path: &Path, options: &FileOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| open_error(path, Mode::Read, e))?;
        debug!("File opened: {}", path.display());

        Ok(Self {
            path: path.to_owned(),
            inner: BufReader::with_capacity(options.buffer_capacity, file),
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for FileSource {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }

    #[inline]
    fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.inner.read_exact(buf)
    }
}

impl Drop for FileSource {
    fn drop(&mut self) {
        debug!("File closed: {}", self.path.display());
    }
}

impl Encoder<FileSink> {
    /// Opens `path` for writing with default [`FileOptions`].
    pub fn create(path: &Path) -> Result<Self> {
        Self::create_with(path, &FileOptions::default())
    }

    pub fn create_with(path: &Path, options: &FileOptions) -> Result<Self> {
        Ok(Self::new(FileSink::create(path, options)?))
    }
}

impl Decoder<FileSource> {
    /// Opens `path` for reading with default [`FileOptions`].
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(path, &FileOptions::default())
    }

    pub fn open_with(path: &Path, options: &FileOptions) -> Result<Self> {
        Ok(Self::new(FileSource::open(path, options)?))
    }
}
