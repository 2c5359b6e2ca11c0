//! Common test utilities for ctxpack integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A fixture repository for integration tests
#[allow(dead_code)]
pub struct TestRepo {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to repository root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestRepo {
    /// Create a new empty fixture repository
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Create a fixture repository with a small multi-language layout
    pub fn with_sample_files() -> Self {
        let repo = Self::new();
        repo.write_file(
            "src/auth.py",
            "import jwt\n\ndef refresh_token(token):\n    return jwt.decode(token)\n",
        );
        repo.write_file(
            "src/users.py",
            "from src.auth import refresh_token\n\ndef login(user):\n    return refresh_token(user.token)\n",
        );
        repo.write_file("src/billing.py", "def charge(amount):\n    return amount\n");
        repo.write_file("README.md", "# sample project\n");
        repo.write_file("package.json", "{\n  \"name\": \"sample\"\n}\n");
        repo
    }

    /// Write a file in the repository, creating parent directories
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the repository
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in the repository
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Path as a string argument for the CLI
    pub fn path_arg(&self) -> String {
        self.path.display().to_string()
    }
}
