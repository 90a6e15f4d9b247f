//! Output mode detection

use std::io::IsTerminal;

/// Set to force plain output even on a terminal
pub const PLAIN_OUTPUT_ENV: &str = "PKGRESTORE_PLAIN";

/// Set by build agents, where restores run unattended
const BUILD_AGENT_VARS: [&str; 6] = [
    "CI",
    "GITHUB_ACTIONS",
    "TF_BUILD",
    "TEAMCITY_VERSION",
    "JENKINS_URL",
    "BUILDKITE",
];

/// How a command reports progress and asks for confirmation
#[derive(Debug, Clone, Copy, Default)]
pub struct UiContext {
    fancy: bool,
    auto_yes: bool,
}

impl UiContext {
    /// Spinners and prompts on a terminal; plain lines under build agents and pipes
    pub fn detect() -> Self {
        // Status output and prompts use stderr and stdin, stdout may be piped
        let terminal = std::io::stderr().is_terminal() && std::io::stdin().is_terminal();
        Self {
            fancy: terminal && !plain_requested(|name| std::env::var_os(name).is_some()),
            auto_yes: false,
        }
    }

    /// Plain line output; prompts take their default answer
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn with_auto_yes(mut self, yes: bool) -> Self {
        self.auto_yes = yes;
        self
    }

    pub fn auto_yes(&self) -> bool {
        self.auto_yes
    }

    pub fn use_fancy_output(&self) -> bool {
        self.fancy
    }
}

fn plain_requested(is_set: impl Fn(&str) -> bool) -> bool {
    is_set(PLAIN_OUTPUT_ENV) || BUILD_AGENT_VARS.iter().any(|var| is_set(var))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_context() {
        let ctx = UiContext::plain();
        assert!(!ctx.use_fancy_output());
        assert!(!ctx.auto_yes());
        assert!(ctx.with_auto_yes(true).auto_yes());
    }

    #[test]
    fn build_agents_and_override_force_plain() {
        assert!(!plain_requested(|_| false));
        assert!(plain_requested(|name| name == PLAIN_OUTPUT_ENV));
        assert!(plain_requested(|name| name == "TF_BUILD"));
        assert!(!plain_requested(|name| name == "HOME"));
    }
}
