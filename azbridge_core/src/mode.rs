/*
 * Copyright (c) 2025 William Stadtwald Demchick <william.demchick@gmail.com>
 *
 * Permission to use, copy, modify, and distribute this software for any
 * purpose with or without fee is hereby granted, provided that the above
 * copyright notice and this permission notice appear in all copies.
 *
 * THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHOR DISCLAIMS ALL WARRANTIES
 * WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
 * MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR
 * ANY SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
 * WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN
 * ACTION OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF
 * OR IN CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.
 */

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The mode a server build runs in. Unknown names fall back to
/// production, so a typo never turns on development behaviour.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[derive(Deserialize, Serialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Mode {
    Development,
    #[default]
    Production,
    Test
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        use Mode::*;
        match self {
            &Development => "development",
            &Production => "production",
            &Test => "test"
        }
    }
}

impl From<&str> for Mode {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("development") {
            Mode::Development
        } else if value.eq_ignore_ascii_case("test") {
            Mode::Test
        } else {
            Mode::Production
        }
    }
}

impl From<String> for Mode {
    fn from(value: String) -> Self {
        value.as_str().into()
    }
}

impl std::str::FromStr for Mode {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, std::convert::Infallible> {
        Ok(value.into())
    }
}

impl From<Mode> for &'static str {
    fn from(value: Mode) -> &'static str {
        value.as_str()
    }
}

impl Display for Mode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() -> () {
        assert_eq!("development".parse::<Mode>().unwrap(), Mode::Development);
        assert_eq!("Development".parse::<Mode>().unwrap(), Mode::Development);
        assert_eq!("TEST".parse::<Mode>().unwrap(), Mode::Test);
        assert_eq!("production".parse::<Mode>().unwrap(), Mode::Production);

        for x in ["", "staging", "prod", "dev"] {
            assert_eq!(x.parse::<Mode>().unwrap(), Mode::Production);
        }
    }

    #[test]
    fn test_display_round_trips() -> () {
        for mode in [Mode::Development, Mode::Production, Mode::Test] {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }
}
