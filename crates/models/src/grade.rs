//! Letter grades derived from marks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Letter grade, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    F,
    D,
    C,
    B,
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Lower bound of each band, best first. Anything below the last band is F.
const BANDS: [(f64, Grade); 5] = [
    (90.0, Grade::APlus),
    (80.0, Grade::A),
    (70.0, Grade::B),
    (60.0, Grade::C),
    (50.0, Grade::D),
];

/// Map a score to its band; a score equal to a threshold belongs to that band.
pub fn grade_of(marks: f64) -> Grade {
    BANDS
        .iter()
        .find(|(floor, _)| marks >= *floor)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::F)
}

/// Grade of the arithmetic mean of `marks`. The mean is not clamped.
pub fn aggregate<I>(marks: I) -> Result<Grade, ModelError>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = marks
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), m| (sum + m, count + 1));
    if count == 0 {
        return Err(ModelError::InvalidState("no subjects to aggregate".into()));
    }
    Ok(grade_of(sum / count as f64))
}
