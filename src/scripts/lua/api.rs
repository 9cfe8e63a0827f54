use super::*;

fn signal_table<'lua>(lua: &'lua Lua, name: String, width: u32, waves: Vec<i64>) -> mlua::Result<Table<'lua>>
{
    let table = lua.create_table()?;
    table.set("name", name)?;
    table.set("width", width)?;
    table.set("length", waves.len())?;
    table.set("waves", waves)?;

    Ok(table)
}

/// `clock(name [, half_period])`: scalar clock, low for `half_period` samples, then high.
pub(super) fn clock<'lua>(lua: &'lua Lua, args: (String, Option<usize>)) -> mlua::Result<Table<'lua>>
{
    let (name, half_period) = args;
    let half_period = half_period.unwrap_or(1).max(1);

    let waves = std::iter::repeat(0).take(half_period)
        .chain(std::iter::repeat(1).take(half_period))
        .collect();

    signal_table(lua, name, 1, waves)
}

/// `counter(name, width [, length])`: counts up from 0, wrapping at `2^width`.
pub(super) fn counter<'lua>(lua: &'lua Lua, args: (String, u32, Option<usize>)) -> mlua::Result<Table<'lua>>
{
    let (name, width, length) = args;

    if width < 1 || width > 62 {
        return Err(mlua::Error::RuntimeError(
            format!("counter '{}': width {} out of range 1..62", name, width)));
    }

    let modulus = 1i64 << width;
    let length = match length {
        Some(length) => length,
        None if width <= 16 => modulus as usize,
        None => {
            return Err(mlua::Error::RuntimeError(
                format!("counter '{}': length required for width {}", name, width)));
        }
    };

    let waves = (0..length as i64)
        .map(|i| i % modulus)
        .collect();

    signal_table(lua, name, width, waves)
}

/// `bits(name, "0110")`: scalar pattern from a bit string, `_` and blanks are ignored.
pub(super) fn bits<'lua>(lua: &'lua Lua, args: (String, String)) -> mlua::Result<Table<'lua>>
{
    let (name, pattern) = args;

    let waves = pattern.chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .map(|c| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => Err(mlua::Error::RuntimeError(
                format!("bits '{}': unexpected character '{}'", name, other))),
        })
        .collect::<mlua::Result<Vec<i64>>>()?;

    signal_table(lua, name, 1, waves)
}
