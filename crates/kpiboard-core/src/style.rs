//! Display styles: colors, chart types and icons.
//!
//! Each style is identified to users by a short abbreviation that is unique
//! within its kind.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
  Color,
  Chart,
  Icon,
}

impl StyleKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Color => "color",
      Self::Chart => "chart",
      Self::Icon => "icon",
    }
  }
}

impl fmt::Display for StyleKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for StyleKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "color" | "colors" => Ok(Self::Color),
      "chart" | "charts" => Ok(Self::Chart),
      "icon" | "icons" => Ok(Self::Icon),
      other => Err(Error::InvalidInput(format!("unknown style kind: {other:?}"))),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
  pub style_id:    Uuid,
  pub kind:        StyleKind,
  pub name:        String,
  pub description: Option<String>,
  pub abbrev:      String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStyle {
  pub kind:        StyleKind,
  pub name:        String,
  #[serde(default)]
  pub description: Option<String>,
  pub abbrev:      String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_parses_singular_and_plural() {
    assert_eq!("colors".parse::<StyleKind>().unwrap(), StyleKind::Color);
    assert_eq!("chart".parse::<StyleKind>().unwrap(), StyleKind::Chart);
    assert!("fonts".parse::<StyleKind>().is_err());
  }
}
