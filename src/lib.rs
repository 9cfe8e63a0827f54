pub mod config;
pub mod error;
pub mod scripts;
pub mod signal;
pub mod signal_set;
pub mod template;

use config::Config;
use error::*;
use scripts::{lua::LuaInterpreter, Description};
use signal::SignalSpec;
use template::Template;

use clap::Parser;
use std::path::PathBuf;
use tracing::info;


/// A fully resolved generation request.
#[derive(Debug)]
pub struct Job {
    pub template: Template,
    pub module_name: String,
    pub comment: String,
    pub signals: Vec<SignalSpec>,
    pub output: PathBuf,
}

impl Job {
    pub fn run(self) -> Result<PathBuf> {
        let Job { template, module_name, comment, signals, output } = self;

        template.generate(&module_name, &comment, signals, &output)?;

        Ok(output)
    }
}

/// Combine script contents with command line overrides.
pub fn resolve(opts: Opts, description: Description, config: &Config) -> Result<Job> {
    let Description { module_name, comment, template, output, signals } = description;

    let module_name = opts.module
        .or(module_name)
        .ok_or_else(|| Error::MissingArgument(
            "module".into(),
            "Set `module` in the script or pass --module".into()))?;

    let comment = opts.comment
        .or(comment)
        .unwrap_or_default();

    let template = match opts.template.or(template) {
        Some(name) => {
            let path = config.find_template(&name)?;
            info!(template = %path.display(), "using template");
            Template::load(path)?
        }
        None => Template::builtin(),
    };

    let output = opts.output
        .or(output)
        .unwrap_or_else(|| PathBuf::from(format!("{}.va", module_name)));

    Ok(Job {
        template,
        module_name,
        comment,
        signals,
        output,
    })
}

pub fn setup(opts: Opts, config: &Config) -> Result<Job> {
    let mut interpreter = LuaInterpreter::new()?;
    let description = interpreter.run_file(&opts.script)?;

    resolve(opts, description, config)
}

/// Generate a Verilog-A module that plays back digital waveforms.
#[derive(Parser, Debug)]
pub struct Opts {
    /// Lua script describing the module and its signals
    pub script: PathBuf,

    /// Template file or name of a template in the config directory
    #[clap(short, long)]
    pub template: Option<PathBuf>,

    /// Output file, defaults to `<module>.va`
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Module name, overrides the script
    #[clap(short, long)]
    pub module: Option<String>,

    /// Header comment, overrides the script
    #[clap(short, long)]
    pub comment: Option<String>,

    /// Increase log verbosity
    #[clap(short, long, parse(from_occurrences))]
    pub verbose: u64,
}
