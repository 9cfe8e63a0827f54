pub mod lua;

use crate::error::*;
use crate::signal::SignalSpec;

use std::path::{Path, PathBuf};


/// Everything a script says about the module to generate.
///
/// Fields a script leaves unset stay `None` (or empty) and are filled in from the command
/// line or defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Description {
    pub module_name: Option<String>,
    pub comment: Option<String>,
    pub template: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub signals: Vec<SignalSpec>,
}

impl Description {
    /// Make relative paths relative to `base` instead of the working directory.
    ///
    /// A template is only rebased if it exists next to the script; otherwise the name is
    /// kept so it can still be found in the config template directory.
    pub fn rebase(mut self, base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let rebase_path = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };

        self.template = self.template.map(|path| {
            let rebased = rebase_path(path.clone());
            if rebased.is_file() {
                rebased
            } else {
                path
            }
        });
        self.output = self.output.map(rebase_path);
        self
    }
}

pub trait LoadDescription {
    fn load_description(&mut self, source: &str, chunk_name: &str) -> Result<Description>;
}
