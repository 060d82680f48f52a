#![allow(dead_code)]

use goautoimports::insertion::scan::declared_imports;
use goautoimports::{InventorySource, SourceFileRecord, ToolingResult};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const AUTOMAXPROCS: &str = "go.uber.org/automaxprocs";
pub const AUTOMEMLIMIT: &str = "github.com/KimMachineGun/automemlimit";

pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.dir.path().join(path)).expect("Failed to read file")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Every file under the project with its contents, sorted by path
    pub fn snapshot(&self) -> Vec<(PathBuf, String)> {
        let mut files = Vec::new();
        collect_files(self.dir.path(), &mut files);
        files.sort();
        files
            .into_iter()
            .map(|p| {
                let content = fs::read_to_string(&p).expect("Failed to read file");
                (p, content)
            })
            .collect()
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).expect("Failed to read dir") {
        let path = entry.expect("Failed to read entry").path();
        if path.is_dir() {
            collect_files(&path, out);
        } else {
            out.push(path);
        }
    }
}

/// Inventory that reads the project tree the way `go list` would:
/// every `.go` file whose package clause names the entry package.
pub struct DiskInventory {
    root: PathBuf,
}

impl DiskInventory {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl InventorySource for DiskInventory {
    fn list(&self, entry_name: &str) -> ToolingResult<Vec<SourceFileRecord>> {
        let mut files = Vec::new();
        collect_files(&self.root, &mut files);
        files.sort();

        let clause = format!("package {entry_name}");
        Ok(files
            .into_iter()
            .filter(|p| p.extension().is_some_and(|e| e == "go"))
            .filter_map(|p| {
                let source = fs::read_to_string(&p).ok()?;
                source
                    .lines()
                    .any(|l| l.trim_end() == clause)
                    .then(|| SourceFileRecord::new(&p, declared_imports(&source)))
            })
            .collect())
    }
}

/// Writer whose contents stay readable after being boxed into an `OutputManager`
#[derive(Clone, Default)]
pub struct SharedBuf(std::rc::Rc<std::cell::RefCell<Vec<u8>>>);

impl std::io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("utf-8 output")
    }

    /// Contents with terminal styling removed
    pub fn plain_contents(&self) -> String {
        console::strip_ansi_codes(&self.contents()).into_owned()
    }
}
