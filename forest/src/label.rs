// Copyright 2024 Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The binary class of a news text.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Label {
    Real = 0,
    Fake = 1,
}

#[derive(Debug, Error, Copy, Clone, PartialEq)]
#[error("{0} is not a valid label, expected 0 (Real) or 1 (Fake)!")]
pub struct InvalidLabel(pub f64);

impl Label {
    /// All labels in index order.
    pub const ALL: [Label; 2] = [Label::Real, Label::Fake];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Label::Real),
            1 => Some(Label::Fake),
            _ => None
        }
    }

    #[inline]
    pub const fn is_fake(self) -> bool {
        matches!(self, Label::Fake)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Label::Real => "Real",
            Label::Fake => "Fake",
        }
    }
}

impl TryFrom<f64> for Label {
    type Error = InvalidLabel;

    /// Only exactly `0` and `1` are labels.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value == 0.0 {
            Ok(Label::Real)
        } else if value == 1.0 {
            Ok(Label::Fake)
        } else {
            Err(InvalidLabel(value))
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::{InvalidLabel, Label};

    #[test]
    fn converts_numbers() {
        assert_eq!(Ok(Label::Real), Label::try_from(0.0));
        assert_eq!(Ok(Label::Fake), Label::try_from(1.0));
        assert_eq!(Err(InvalidLabel(2.0)), Label::try_from(2.0));
        assert_eq!(Err(InvalidLabel(0.5)), Label::try_from(0.5));
        assert!(Label::try_from(f64::NAN).is_err());
    }

    #[test]
    fn indices_and_names() {
        for label in Label::ALL {
            assert_eq!(Some(label), Label::from_index(label.index()));
        }
        assert_eq!(None, Label::from_index(2));
        assert_eq!("Fake", Label::Fake.to_string());
        assert!(Label::Fake.is_fake());
        assert!(!Label::Real.is_fake());
    }
}
