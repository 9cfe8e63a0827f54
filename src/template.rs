use crate::error::*;
use crate::signal::{check_identifier, SignalSpec};
use crate::signal_set::SignalSet;

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

const BUILTIN_TEMPLATE: &str = include_str!("../templates/default.va");

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

/// One alternation of all tokens, longest first, so no token can shadow another.
fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| {
        let mut tokens: Vec<&str> = Placeholder::ALL.iter().map(Placeholder::token).collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()));

        let alternation = tokens.into_iter()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");

        Regex::new(&alternation).expect("invalid regex pattern")
    })
}

/// Tokens recognized in a template, in substitution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    HeadNotes,
    ModuleName,
    PortList,
    InputDeclaration,
    OutputDeclaration,
    SignalDeclaration,
    CountDeclaration,
    WavelistDeclaration,
    SignalInitial,
    CountInitial,
    SignalGenerate,
    CountGenerate,
    SignalOutput,
}

impl Placeholder {
    pub const ALL: [Placeholder; 13] = [
        Placeholder::HeadNotes,
        Placeholder::ModuleName,
        Placeholder::PortList,
        Placeholder::InputDeclaration,
        Placeholder::OutputDeclaration,
        Placeholder::SignalDeclaration,
        Placeholder::CountDeclaration,
        Placeholder::WavelistDeclaration,
        Placeholder::SignalInitial,
        Placeholder::CountInitial,
        Placeholder::SignalGenerate,
        Placeholder::CountGenerate,
        Placeholder::SignalOutput,
    ];

    pub fn token(&self) -> &'static str {
        use Placeholder::*;

        match self {
            HeadNotes           => "$TEMPLATE_HEAD_NOTES",
            ModuleName          => "$TEMPLATE_MODULE_NAME",
            PortList            => "$TEMPLATE_PORT_LIST",
            InputDeclaration    => "$TEMPLATE_INPUT_DECLARATION",
            OutputDeclaration   => "$TEMPLATE_OUTPUT_DECLARATION",
            SignalDeclaration   => "$TEMPLATE_SIGNAL_DECLARATION",
            CountDeclaration    => "$TEMPLATE_COUNT_DECLARATION",
            WavelistDeclaration => "$TEMPLATE_WAVELIST_DECLARATION",
            SignalInitial       => "$TEMPLATE_SIGNAL_INITIAL",
            CountInitial        => "$TEMPLATE_COUNT_INITIAL",
            SignalGenerate      => "$TEMPLATE_SIGNAL_GENERATE",
            CountGenerate       => "$TEMPLATE_COUNT_GENERATE",
            SignalOutput        => "$TEMPLATE_SIGNAL_OUTPUT",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter()
            .copied()
            .find(|p| p.token() == token)
    }
}


/// Replacement text for every placeholder, aligned with `Placeholder::ALL`.
#[derive(Debug, Clone)]
pub struct Fragments {
    values: Vec<String>,
}

impl Fragments {
    pub fn build(module_name: &str, comment: &str, signals: &SignalSet) -> Self {
        let values = vec![
            comment.to_string(),
            module_name.to_string(),
            signals.port_list(),
            signals.input_declaration(),
            signals.output_declaration(),
            signals.signal_declaration(),
            signals.count_declaration(),
            signals.wavelist_declaration(),
            signals.signal_initial(),
            signals.count_initial(),
            signals.signal_generate(),
            signals.count_generate(),
            signals.signal_output(),
        ];

        Self { values }
    }

    pub fn get(&self, placeholder: Placeholder) -> &str {
        &self.values[placeholder as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Placeholder, &str)> {
        Placeholder::ALL.iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }
}


pub struct Template {
    text: String,
    source: Option<PathBuf>,
    matcher: &'static Regex,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        f.debug_struct("Template")
            .field("source", &self.source)
            .field("len", &self.text.len())
            .finish()
    }
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
            matcher: placeholder_regex(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_TEMPLATE)
    }

    pub fn load(filename: impl AsRef<Path>) -> Result<Self> {
        let path = filename.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::TemplateAccess(path.to_path_buf(), e))?;

        debug!(template = %path.display(), "loaded template");

        let mut template = Self::new(text);
        template.source = Some(path.to_path_buf());

        let missing = template.missing_placeholders();
        if !missing.is_empty() {
            let tokens: Vec<&str> = missing.iter().map(Placeholder::token).collect();
            warn!(template = %path.display(), missing = ?tokens,
                "template does not contain all placeholders");
        }

        Ok(template)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn missing_placeholders(&self) -> Vec<Placeholder> {
        Placeholder::ALL.iter()
            .copied()
            .filter(|p| !self.text.contains(p.token()))
            .collect()
    }

    /// Replace every placeholder in a single pass. Inserted text is not scanned again.
    pub fn fill(&self, fragments: &Fragments) -> String {
        let lookup: HashMap<&str, &str> = fragments.iter()
            .map(|(p, value)| (p.token(), value))
            .collect();

        self.matcher
            .replace_all(&self.text, |caps: &Captures| {
                let token = &caps[0];
                lookup.get(token).copied().unwrap_or(token).to_string()
            })
            .into_owned()
    }

    pub fn render(&self, module_name: &str, comment: &str, signals: Vec<SignalSpec>) -> Result<String> {
        check_identifier(module_name)?;

        let set = SignalSet::new(signals)?;
        let fragments = Fragments::build(module_name, comment, &set);

        debug!(module = module_name, signals = set.len(), "rendering module");

        Ok(self.fill(&fragments))
    }

    /// Render the module and write it to `dest`, replacing any existing file.
    pub fn generate(
        &self,
        module_name: &str,
        comment: &str,
        signals: Vec<SignalSpec>,
        dest: impl AsRef<Path>,
    ) -> Result<()> {
        let dest = dest.as_ref();
        let content = self.render(module_name, comment, signals)?;

        write_whole(dest, &content)?;
        info!(module = module_name, output = %dest.display(), "wrote Verilog-A module");

        Ok(())
    }
}

fn write_whole(dest: &Path, content: &str) -> Result<()> {
    let mut tmp_name = dest.file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| Error::MissingArgument("output".into(), "Destination is not a file path".into()))?;
    tmp_name.push(".tmp");
    let tmp = dest.with_file_name(tmp_name);

    let written = fs::write(&tmp, content)
        .and_then(|_| fs::rename(&tmp, dest));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    Ok(())
}
