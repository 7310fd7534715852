use include_dir::{include_dir, Dir};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/data");

/// Where raw word-list bytes come from
pub trait WordSource: Send {
    /// Read the named resource, or an io error if it cannot be read
    fn read(&self, name: &str) -> io::Result<Vec<u8>>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// Word lists compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl WordSource for EmbeddedSource {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        DATA_DIR
            .get_file(name)
            .map(|f| f.contents().to_vec())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{name} not bundled")))
    }

    fn describe(&self) -> String {
        "embedded".to_string()
    }
}

/// Word lists read from a directory on disk
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl WordSource for DirSource {
    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(name))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
