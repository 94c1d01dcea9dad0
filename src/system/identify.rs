//! Decides whether a raw process-table record is a monitored CLI session.
//!
//! Misses are preferred over false hits, so known lookalikes are rejected
//! before the permissive token match runs.

use regex::Regex;

use crate::config::IdentifyConfig;

#[derive(Debug, Clone)]
pub struct Identifier {
    token_pattern: Option<Regex>,
    excluded_paths: Vec<String>,
    gui_markers: Vec<String>,
    self_names: Vec<String>,
}

impl Identifier {
    pub fn from_config(config: &IdentifyConfig) -> Self {
        let token_pattern = (!config.token.is_empty())
            .then(|| format!(r"(^|\s|/){}(\s|$|--)", regex::escape(&config.token)))
            .and_then(|pattern| Regex::new(&pattern).ok());

        Self {
            token_pattern,
            excluded_paths: non_empty(&config.excluded_paths),
            gui_markers: non_empty(&config.gui_markers),
            self_names: non_empty(&config.self_names),
        }
    }

    pub fn is_monitored(&self, line: &str) -> bool {
        if self.excluded_paths.iter().any(|p| line.contains(p.as_str())) {
            return false;
        }
        if self.gui_markers.iter().any(|m| line.contains(m.as_str())) {
            return false;
        }
        if self.self_names.iter().any(|n| line.contains(n.as_str())) {
            return false;
        }
        self.token_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(line))
    }
}

impl Default for Identifier {
    fn default() -> Self {
        Self::from_config(&IdentifyConfig::default())
    }
}

fn non_empty(values: &[String]) -> Vec<String> {
    values.iter().filter(|v| !v.is_empty()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "4242 4100 5.0 1.2 S Mon Jan 1 12:00:00 2024";

    fn line(command: &str) -> String {
        format!("{PREFIX} {command}")
    }

    #[test]
    fn accepts_plain_invocations() {
        let id = Identifier::default();
        assert!(id.is_monitored(&line("/Users/me/.local/bin/claude --cwd=/a/b")));
        assert!(id.is_monitored(&line("claude")));
        assert!(id.is_monitored(&line("node /opt/homebrew/bin/claude --resume")));
        assert!(id.is_monitored(&line("claude --dangerously-skip-permissions")));
        assert!(id.is_monitored("claude"));
    }

    #[test]
    fn flag_prefix_counts_as_boundary() {
        let id = Identifier::default();
        assert!(id.is_monitored(&line("/bin/claude--print")));
    }

    #[test]
    fn rejects_token_embedded_in_other_words() {
        let id = Identifier::default();
        assert!(!id.is_monitored(&line("/usr/bin/claudette --serve")));
        assert!(!id.is_monitored(&line("myclaude run")));
        assert!(!id.is_monitored(&line("vim notes-claude.md")));
        assert!(!id.is_monitored(&line("python manage.py")));
    }

    #[test]
    fn rejects_shell_snapshot_helpers() {
        let id = Identifier::default();
        let helper = line(
            "/bin/zsh -c source /Users/me/.claude/shell-snapshots/snapshot-zsh-1.sh && claude --version",
        );
        assert!(!id.is_monitored(&helper));
    }

    #[test]
    fn rejects_desktop_app_and_self() {
        let id = Identifier::default();
        assert!(!id.is_monitored(&line(
            "/Applications/Claude.app/Contents/MacOS/claude --type=renderer"
        )));
        assert!(!id.is_monitored(&line("/usr/local/bin/clauditor claude")));
        assert!(!id.is_monitored(&line("claude-monitor claude")));
    }

    #[test]
    fn empty_token_matches_nothing() {
        let config = IdentifyConfig {
            token: String::new(),
            ..IdentifyConfig::default()
        };
        assert!(!Identifier::from_config(&config).is_monitored(&line("claude")));
    }

    #[test]
    fn custom_token_is_escaped() {
        let config = IdentifyConfig {
            token: "c++".to_string(),
            ..IdentifyConfig::default()
        };
        let id = Identifier::from_config(&config);
        assert!(id.is_monitored(&line("/usr/bin/c++ main.cc")));
        assert!(!id.is_monitored(&line("/usr/bin/cxx main.cc")));
    }
}
