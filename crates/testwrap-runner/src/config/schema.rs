use serde::Deserialize;
use testwrap_core::error::{Result, TestwrapError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub version: u32,

    #[serde(default = "default_tool")]
    pub tool: ToolCommand,

    #[serde(default)]
    pub formatter: FormatterSection,

    #[serde(default = "default_cover_tool")]
    pub cover_tool: ToolCommand,

    #[serde(default)]
    pub discovery: DiscoverySection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub defaults: DefaultsSection,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            version: 1,
            tool: default_tool(),
            formatter: FormatterSection::default(),
            cover_tool: default_cover_tool(),
            discovery: DiscoverySection::default(),
            output: OutputSection::default(),
            defaults: DefaultsSection::default(),
        }
    }
}

impl FileConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TestwrapError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.tool.validate("tool")?;
        self.formatter.command().validate("formatter")?;
        self.cover_tool.validate("cover_tool")?;
        self.discovery.validate()?;
        Ok(())
    }
}

/// A program plus leading arguments.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolCommand {
    fn validate(&self, section: &str) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(TestwrapError::BadConfig(format!(
                "{section}.program must not be empty"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatterSection {
    #[serde(default = "default_formatter_program")]
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Printed when the formatter is not installed.
    #[serde(default = "default_install_hint")]
    pub install_hint: String,
}

impl Default for FormatterSection {
    fn default() -> Self {
        Self {
            program: default_formatter_program(),
            args: Vec::new(),
            install_hint: default_install_hint(),
        }
    }
}

impl FormatterSection {
    pub fn command(&self) -> ToolCommand {
        ToolCommand {
            program: self.program.clone(),
            args: self.args.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoverySection {
    #[serde(default = "default_test_suffix")]
    pub test_suffix: String,

    /// Directory names pruned at any depth.
    #[serde(default = "default_prune")]
    pub prune: Vec<String>,

    /// Root-relative directories only scanned when the optional group is on.
    #[serde(default = "default_optional")]
    pub optional: Vec<String>,
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            test_suffix: default_test_suffix(),
            prune: default_prune(),
            optional: default_optional(),
        }
    }
}

impl DiscoverySection {
    fn validate(&self) -> Result<()> {
        if self.test_suffix.trim().is_empty() {
            return Err(TestwrapError::BadConfig(
                "discovery.test_suffix must not be empty".into(),
            ));
        }
        if self.prune.iter().any(|p| p.contains('/')) {
            return Err(TestwrapError::BadConfig(
                "discovery.prune entries are directory names, not paths".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
        }
    }
}

/// Defaults for every environment toggle. Environment always wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsSection {
    #[serde(default = "default_timeout")]
    pub timeout: String,
    #[serde(default)]
    pub include_optional: bool,
    #[serde(default = "default_true")]
    pub cover: bool,
    #[serde(default = "default_cover_flags")]
    pub cover_flags: String,
    #[serde(default = "default_true")]
    pub race: bool,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub cover_dir: Option<String>,
    #[serde(default)]
    pub junit: bool,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            include_optional: false,
            cover: true,
            cover_flags: default_cover_flags(),
            race: true,
            dry_run: false,
            cover_dir: None,
            junit: false,
            flags: String::new(),
            fail_fast: false,
        }
    }
}

fn default_tool() -> ToolCommand {
    ToolCommand {
        program: "go".into(),
        args: vec!["test".into()],
    }
}
fn default_formatter_program() -> String {
    "go-junit-report".into()
}
fn default_cover_tool() -> ToolCommand {
    ToolCommand {
        program: "go".into(),
        args: vec!["tool".into(), "cover".into()],
    }
}
fn default_install_hint() -> String {
    "install it with: go install github.com/jstemmer/go-junit-report/v2@latest".into()
}
fn default_test_suffix() -> String {
    "_test.go".into()
}
fn default_prune() -> Vec<String> {
    ["vendor", "_output", ".git", "testdata"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_optional() -> Vec<String> {
    vec!["test/integration".into()]
}
fn default_log_dir() -> String {
    "_output/test".into()
}
fn default_timeout() -> String {
    "60s".into()
}
fn default_cover_flags() -> String {
    "-cover -covermode=atomic".into()
}
fn default_true() -> bool {
    true
}
