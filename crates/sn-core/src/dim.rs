//! Degrees of freedom tracked per node.

use core::fmt;

use crate::{CoreError, CoreResult};

/// Number of independent scalar directions of motion per node.
///
/// `One` is the scalar mode: motion along a single fixed axis, geometry
/// ignored. `Two` and `Three` are vector modes where springs act along their
/// current direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub enum Dim {
    One,
    #[default]
    Two,
    Three,
}

impl Dim {
    pub fn count(self) -> usize {
        match self {
            Dim::One => 1,
            Dim::Two => 2,
            Dim::Three => 3,
        }
    }

    /// Axis that gravity acts along: the sole axis in scalar mode, Y otherwise.
    pub fn vertical_axis(self) -> usize {
        match self {
            Dim::One => 0,
            Dim::Two | Dim::Three => 1,
        }
    }

    pub fn is_scalar(self) -> bool {
        self == Dim::One
    }

    pub fn from_count(count: usize) -> CoreResult<Self> {
        match count {
            1 => Ok(Dim::One),
            2 => Ok(Dim::Two),
            3 => Ok(Dim::Three),
            _ => Err(CoreError::InvalidArg {
                what: "dimension must be 1, 2 or 3",
            }),
        }
    }
}

impl TryFrom<u8> for Dim {
    type Error = CoreError;

    fn try_from(value: u8) -> CoreResult<Self> {
        Dim::from_count(value as usize)
    }
}

impl From<Dim> for u8 {
    fn from(dim: Dim) -> Self {
        dim.count() as u8
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.count())
    }
}
