const ONE_KIB: usize = 1024;

/// Default capacity of the buffered reader/writer wrapped around a file.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * ONE_KIB;

/// Options for opening file archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOptions {
    /// Capacity of the `BufReader`/`BufWriter` around the file.
    pub buffer_capacity: usize,
    /// Create missing parent directories before writing.
    pub create_dirs: bool,
    /// `sync_all` the file when the encoder is finished.
    pub sync: bool,
}

impl FileOptions {
    pub fn new() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            create_dirs: false,
            sync: false,
        }
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

impl Default for FileOptions {
    fn default() -> Self {
        Self::new()
    }
}
