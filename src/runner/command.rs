// Dusk invocation builder — structured options in, one command line out.

use serde::{Deserialize, Serialize};

/// Options for one `run_dusk_test` invocation. Built per call from tool
/// arguments; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunOptions {
    /// A single test file or class to run, passed through verbatim as the
    /// positional argument (e.g. `tests/Browser/LoginTest.php`).
    #[serde(default)]
    pub test: Option<String>,

    /// `--filter` value, quoted in the final command line.
    #[serde(default)]
    pub filter: Option<String>,

    /// `--group` value.
    #[serde(default)]
    pub group: Option<String>,

    /// Run headless (default). `false` appends `--browse` so the browser
    /// window is visible.
    #[serde(default = "default_headless")]
    pub headless: bool,
}

fn default_headless() -> bool {
    true
}

impl Default for TestRunOptions {
    fn default() -> Self {
        Self {
            test: None,
            filter: None,
            group: None,
            headless: true,
        }
    }
}

/// Build the `php artisan dusk` command line for `options`.
///
/// Argument order is part of the contract: positional test first, then
/// `--filter`, then `--group`, then `--browse`. Some runner versions parse
/// their own argv positionally, so the order must not change.
pub fn build_dusk_command(options: &TestRunOptions) -> String {
    let mut command = String::from("php artisan dusk");

    if let Some(test) = &options.test {
        command.push(' ');
        command.push_str(test);
    }
    if let Some(filter) = &options.filter {
        command.push_str(&format!(" --filter \"{filter}\""));
    }
    if let Some(group) = &options.group {
        command.push_str(&format!(" --group {group}"));
    }
    if !options.headless {
        command.push_str(" --browse");
    }

    command
}
