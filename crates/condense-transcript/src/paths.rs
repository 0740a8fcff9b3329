//! Path resolution for session logs and settings

use std::path::{Path, PathBuf};

/// Resolves standard paths under `~/.claude`
#[derive(Debug, Clone)]
pub struct Paths {
    pub home_claude: PathBuf,
}

impl Paths {
    /// Create a new Paths resolver rooted at the user's home directory
    pub fn new() -> std::io::Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self::with_home_claude(home.join(".claude")))
    }

    pub fn with_home_claude(home_claude: impl Into<PathBuf>) -> Self {
        Self {
            home_claude: home_claude.into(),
        }
    }

    /// Directory holding one folder of session logs per project
    pub fn projects_dir(&self) -> PathBuf {
        self.home_claude.join("projects")
    }

    /// Session log folder for the current working directory
    pub fn project_dir(&self) -> std::io::Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(self.project_dir_for(&cwd))
    }

    /// Session log folder for a given project root
    pub fn project_dir_for(&self, project: &Path) -> PathBuf {
        self.projects_dir().join(project_hash(project))
    }

    /// Get condense.json settings path
    pub fn config_file(&self) -> PathBuf {
        self.home_claude.join("condense.json")
    }
}

/// Folder name for a project: its path with `/` and `.` replaced by `-`
pub fn project_hash(project: &Path) -> String {
    project.to_string_lossy().replace(['/', '.'], "-")
}
