//! JSON string round-trip for snapshot records. The caller owns any persistence.

use eyre::{Report, WrapErr};
use serde::{Deserialize, Serialize};

pub fn json_stringify<T: Serialize>(obj: &T) -> Result<String, Report> {
  serde_json::to_string_pretty(obj).wrap_err("When converting an entry to JSON string")
}

pub fn json_parse<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Report> {
  serde_json::from_str(s).wrap_err("When parsing JSON")
}

#[cfg(test)]
mod json_tests {
  use super::*;
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use serde::{Deserialize, Serialize};

  #[derive(Debug, PartialEq, Serialize, Deserialize)]
  struct Snapshot {
    width: usize,
    starts: Vec<i32>,
  }

  #[test]
  fn round_trips_a_record() -> Result<(), Report> {
    let snapshot = Snapshot { width: 4, starts: vec![1, -2, 7] };
    let text = json_stringify(&snapshot)?;
    assert_eq!(json_parse::<Snapshot>(&text)?, snapshot);
    Ok(())
  }
}
