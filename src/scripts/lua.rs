mod api;

use super::*;
use crate::signal::parse_sample;
use mlua::{
    self as lua,
    Lua,Value,FromLua,Table
};
use rug::Integer;
use std::fs::File;

use std::io::Read;
use tracing::debug;

pub struct LuaInterpreter {
    lua: Lua,
}

impl LuaInterpreter {
    pub fn new() -> Result<Self> {
        let lua = Lua::new();

        let clock = lua.create_function(api::clock)?;
        lua.globals().set("clock", clock)?;

        let counter = lua.create_function(api::counter)?;
        lua.globals().set("counter", counter)?;

        let bits = lua.create_function(api::bits)?;
        lua.globals().set("bits", bits)?;

        Ok(Self {
            lua
        })
    }

    /// Run a description script. A relative `output` path is taken relative to the script's
    /// directory, as is a relative `template` if that file exists there.
    pub fn run_file(&mut self, filename: impl AsRef<Path>) -> Result<Description> {
        let filename = filename.as_ref();
        let mut file = File::open(filename)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let chunk_name = filename.display().to_string();
        let description = self.load_description(&contents, &chunk_name)?;

        match filename.parent() {
            Some(dir) => Ok(description.rebase(dir)),
            None => Ok(description),
        }
    }
}


fn conversion_error(message: String) -> lua::Error {
    lua::Error::FromLuaConversionError {
        from: "table",
        to: "SignalSpec",
        message: Some(message),
    }
}

fn sample_from_lua(signal: &str, value: Value) -> lua::Result<Integer> {
    match value {
        Value::Integer(i) if i >= 0 => Ok(Integer::from(i)),

        Value::Number(n) if n >= 0.0 && n.fract() == 0.0 && n < u64::MAX as f64 => {
            Ok(Integer::from(n as u64))
        }

        Value::String(s) => {
            parse_sample(signal, s.to_str()?)
                .map_err(|e| conversion_error(e.to_string()))
        }

        other => {
            Err(conversion_error(format!(
                "Signal '{}': sample of type {} is not a non-negative integer",
                signal, other.type_name()
            )))
        }
    }
}

impl<'lua> FromLua<'lua> for SignalSpec {
    fn from_lua(lua_value: Value<'lua>, _: &'lua Lua) -> lua::Result<Self> {
        let table = match lua_value {
            Value::Table(table) => table,

            Value::Nil => {
                return Err(conversion_error("Expected signal table, but found nil".to_string()));
            }

            other => {
                return Err(conversion_error(format!("Expected signal table, but found {}", other.type_name())));
            }
        };

        let name: String = table.get("name")?;
        let width: Option<u32> = table.get("width")?;
        let length: Option<usize> = table.get("length")?;
        let waves: Option<Table> = table.get("waves")?;

        let waves = match waves {
            Some(waves) => {
                waves.sequence_values::<Value>()
                    .map(|v| sample_from_lua(&name, v?))
                    .collect::<lua::Result<Vec<_>>>()?
            }
            None => vec![],
        };

        let length = length.unwrap_or_else(|| waves.len());

        Ok(SignalSpec::new(name, width.unwrap_or(1), length, waves))
    }
}

impl LoadDescription for LuaInterpreter {
    fn load_description(&mut self, source: &str, chunk_name: &str) -> Result<Description> {
        let chunk = self.lua.load(source)
            .set_name(chunk_name)?;
        chunk.exec()?;

        let globals = self.lua.globals();
        let module_name: Option<String> = globals.get("module")?;
        let comment: Option<String> = globals.get("comment")?;
        let template: Option<String> = globals.get("template")?;
        let output: Option<String> = globals.get("output")?;
        let signal_table: Option<Table> = globals.get("signals")?;

        let signals = match signal_table {
            Some(table) => {
                table.sequence_values::<SignalSpec>()
                    .collect::<lua::Result<Vec<_>>>()?
            }
            None => vec![],
        };

        debug!(script = chunk_name, signals = signals.len(), "loaded description");

        Ok(Description {
            module_name,
            comment,
            template: template.map(PathBuf::from),
            output: output.map(PathBuf::from),
            signals,
        })
    }
}
