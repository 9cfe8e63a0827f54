use crate::error::*;
use crate::signal::{SignalCode, SignalSpec};

/// Ordered collection of signals rendered into one module.
///
/// The order of the signals fixes the port order and the order of every aggregated
/// fragment.
#[derive(Debug, Clone)]
pub struct SignalSet {
    signals: Vec<SignalCode>,
}

impl SignalSet {
    pub fn new(specs: impl IntoIterator<Item = SignalSpec>) -> Result<Self> {
        let signals = specs.into_iter()
            .map(SignalCode::new)
            .collect::<Result<Vec<_>>>()?;

        if signals.is_empty() {
            return Err(Error::NoSignals);
        }

        Ok(Self { signals })
    }

    pub fn signals(&self) -> &[SignalCode] {
        &self.signals
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Signal names separated by `, `.
    pub fn port_list(&self) -> String {
        // non-empty by construction
        let (last, init) = match self.signals.split_last() {
            Some(parts) => parts,
            None => return String::new(),
        };

        init.iter()
            .map(|s| format!("{}, ", s.name()))
            .chain(std::iter::once(last.name().to_string()))
            .collect()
    }

    /// Input pins are not generated, so this is always empty.
    pub fn input_declaration(&self) -> String {
        String::new()
    }

    pub fn output_declaration(&self) -> String {
        self.concat(SignalCode::output_declaration)
    }

    pub fn signal_declaration(&self) -> String {
        self.concat(SignalCode::signal_declaration)
    }

    pub fn count_declaration(&self) -> String {
        self.concat(SignalCode::count_declaration)
    }

    pub fn wavelist_declaration(&self) -> String {
        self.concat(SignalCode::wavelist_declaration)
    }

    pub fn signal_initial(&self) -> String {
        self.concat(SignalCode::signal_initial)
    }

    pub fn count_initial(&self) -> String {
        self.concat(SignalCode::count_initial)
    }

    pub fn signal_generate(&self) -> String {
        self.concat(SignalCode::signal_generate)
    }

    pub fn count_generate(&self) -> String {
        self.concat(SignalCode::count_generate)
    }

    pub fn signal_output(&self) -> String {
        self.concat(SignalCode::signal_output)
    }

    fn concat(&self, fragment: impl Fn(&SignalCode) -> &str) -> String {
        self.signals.iter()
            .fold(String::new(), |mut acc, signal| {
                acc.push_str(fragment(signal));
                acc.push('\n');
                acc
            })
    }
}
