use crate::document_model::Pattern;
use crate::error::{Result, ScrubError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;
const MAX_ITERATIONS_LIMIT: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ScrubConfig {
    pub delimiters: String,
    pub remove_hidden: bool,
    pub remove_fragments: bool,
    /// Attempts allowed per region and pattern before the region is abandoned.
    pub max_iterations: usize,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            delimiters: "{}".to_string(),
            remove_hidden: true,
            remove_fragments: true,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl ScrubConfig {
    /// Patterns to run, hidden text first.
    pub fn patterns(&self) -> Result<Vec<Pattern>> {
        let mut patterns = Vec::new();
        if self.remove_hidden {
            patterns.push(Pattern::HiddenRun);
        }
        if self.remove_fragments {
            patterns.push(Pattern::from_delimiters(&self.delimiters)?);
        }
        if patterns.is_empty() {
            return Err(ScrubError::InvalidPatternConfig(
                "both hidden text and fragment removal are disabled".to_string(),
            ));
        }
        Ok(patterns)
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for .scrubrc in:
    /// 1. Current directory
    /// 2. Home directory (~/.scrubrc)
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(".scrubrc");
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(".scrubrc");
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    pub fn load_config() -> ScrubConfig {
        match Self::get_rc_path() {
            Some(rc_path) => Self::load_from(&rc_path),
            None => ScrubConfig::default(),
        }
    }

    /// Load a specific file; an unreadable file yields the defaults.
    pub fn load_from(path: &Path) -> ScrubConfig {
        let mut config = ScrubConfig::default();

        match fs::read_to_string(path) {
            Ok(content) => Self::parse_config_content(&content, &mut config),
            Err(e) => log::debug!("Ignoring config {}: {}", path.display(), e),
        }

        config
    }

    fn parse_config_content(content: &str, config: &mut ScrubConfig) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut ScrubConfig) {
        // Inline comments need a space before '#', which may itself be a delimiter.
        let line = match line.find(" #") {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        if let Some(stripped) = line.strip_prefix("set ") {
            let setting = stripped.trim();

            match setting {
                "hidden" => config.remove_hidden = true,
                "nohidden" => config.remove_hidden = false,
                "fragments" => config.remove_fragments = true,
                "nofragments" => config.remove_fragments = false,
                _ => {
                    if let Some((key, value)) = setting.split_once('=') {
                        Self::apply_value(key.trim(), value.trim(), config);
                    }
                }
            }
        } else if let Some((key, value)) = line.split_once('=') {
            Self::apply_value(key.trim(), value.trim(), config);
        }
    }

    fn apply_value(key: &str, value: &str, config: &mut ScrubConfig) {
        match key {
            "delimiters" | "delims" => {
                if Pattern::from_delimiters(value).is_ok() {
                    config.delimiters = value.to_string();
                }
            }
            "maxiter" | "max_iterations" => {
                if let Ok(max) = value.parse::<usize>() {
                    if max > 0 && max <= MAX_ITERATIONS_LIMIT {
                        config.max_iterations = max;
                    }
                }
            }
            "hidden" | "remove_hidden" => {
                config.remove_hidden = parse_flag(value);
            }
            "fragments" | "remove_fragments" => {
                config.remove_fragments = parse_flag(value);
            }
            _ => {} // Unknown setting, ignore
        }
    }

    pub fn generate_sample_rc() -> String {
        r#"# scrub configuration file (.scrubrc)
# Lines starting with # or " are comments

set hidden              # Remove hidden text (or set nohidden)
set fragments           # Remove bracketed fragments (or set nofragments)
set delimiters={}       # Opening and closing delimiter, exactly two characters
set maxiter=10000       # Attempts per region before giving up on it

# Alternative key=value syntax:
# remove_hidden=true
# remove_fragments=true
# delimiters=[]
# max_iterations=500
"#
        .to_string()
    }
}

fn parse_flag(value: &str) -> bool {
    value == "true" || value == "1" || value == "yes"
}
