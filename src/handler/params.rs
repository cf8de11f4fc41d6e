//! Placement parameter resolution
//!
//! `grids`, `rows` and `seed` arrive as optional text fields. An absent or
//! empty field takes its default; anything else must parse as a base-10
//! integer. No range checks are applied.

use crate::engine::{PlacementParams, DEFAULT_GRIDS, DEFAULT_ROWS, DEFAULT_SEED};
use crate::error::{ProcessError, Result};

use super::form::FormData;

pub fn resolve(form: &FormData) -> Result<PlacementParams> {
    Ok(PlacementParams {
        grids: int_field(form, "grids", DEFAULT_GRIDS)?,
        rows: int_field(form, "rows", DEFAULT_ROWS)?,
        seed: int_field(form, "seed", DEFAULT_SEED)?,
    })
}

fn int_field(form: &FormData, field: &'static str, default: i64) -> Result<i64> {
    match form.field(field) {
        Some(raw) => parse_int(field, &raw, default),
        None => Ok(default),
    }
}

fn parse_int(field: &'static str, raw: &str, default: i64) -> Result<i64> {
    if raw.is_empty() {
        return Ok(default);
    }
    raw.trim()
        .parse::<i64>()
        .map_err(|source| ProcessError::InvalidParam {
            field,
            value: raw.to_string(),
            source,
        })
}
