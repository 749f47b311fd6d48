use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// One advertiser account to pull orders for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectConfig {
    /// Account login, used as the path segment of the orders endpoint.
    pub login: String,
    /// Display project name written to every row.
    pub project: String,
    pub store_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectsFile {
    pub projects: Vec<ProjectConfig>,
}

impl ProjectsFile {
    #[must_use]
    pub fn find(&self, login: &str) -> Option<&ProjectConfig> {
        self.projects.iter().find(|p| p.login == login)
    }
}

/// Load and validate the project list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_projects(path: &Path) -> Result<ProjectsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProjectsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_projects(&content)
}

/// Parse and validate the project list from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_projects(content: &str) -> Result<ProjectsFile, ConfigError> {
    let projects_file: ProjectsFile = serde_yaml::from_str(content)?;
    validate_projects(&projects_file)?;
    Ok(projects_file)
}

fn validate_projects(projects_file: &ProjectsFile) -> Result<(), ConfigError> {
    if projects_file.projects.is_empty() {
        return Err(ConfigError::Validation(
            "at least one project must be configured".to_string(),
        ));
    }

    let mut seen_logins = HashSet::new();

    for entry in &projects_file.projects {
        if entry.login.trim().is_empty() {
            return Err(ConfigError::Validation(
                "project login must be non-empty".to_string(),
            ));
        }

        if entry.project.trim().is_empty() || entry.store_name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "project '{}' must have a non-empty project and store_name",
                entry.login
            )));
        }

        if !seen_logins.insert(entry.login.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate project login: '{}'",
                entry.login
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "projects_test.rs"]
mod tests;
