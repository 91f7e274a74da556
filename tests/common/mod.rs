//! Shared fixtures for end-to-end directive tests.

use plume::directive_core::tests::MockHost;
use plume::{BuildConfig, ConfigValueSpec, Directive, Registry};
use std::path::PathBuf;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Minimal host application: a directive table plus build configuration,
/// dispatching directives the way a real pipeline would.
pub struct MockApp {
    pub directives: Vec<Box<dyn Directive<MockHost>>>,
    pub config: BuildConfig,
}

impl MockApp {
    pub fn new() -> Self {
        init_logging();
        MockApp {
            directives: Vec::new(),
            config: BuildConfig::new(),
        }
    }

    /// Looks up a registered directive by name.
    pub fn directive(&self, name: &str) -> &dyn Directive<MockHost> {
        self.directives
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.as_ref())
            .expect("directive not registered")
    }
}

impl Registry<MockHost> for MockApp {
    fn add_directive(&mut self, directive: Box<dyn Directive<MockHost>>) {
        self.directives.push(directive);
    }

    fn add_config_value(&mut self, spec: ConfigValueSpec) {
        self.config.declare(&spec);
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Writes an XML fixture into `dir` and returns its path.
pub fn write_xml(dir: &tempfile::TempDir, name: &str, xml: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, xml).expect("failed to write fixture");
    path
}
