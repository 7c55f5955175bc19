// src/series_names.rs

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::constants::{
    SECTION_FORWARD_SWEEP, SECTION_HIGHSHEAR, SECTION_PRESHEAR, SECTION_RECOVERY,
    SECTION_REVERSE_SWEEP,
};

/// A labelled sub-interval of a thixotropy (peak-hold) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Preshear,
    Highshear,
    Recovery,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Preshear, Phase::Highshear, Phase::Recovery];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Preshear => "PRESHEAR",
            Phase::Highshear => "HIGHSHEAR",
            Phase::Recovery => "RECOVERY",
        }
    }

    /// Title of the export section holding this phase.
    pub fn section_title(self) -> &'static str {
        match self {
            Phase::Preshear => SECTION_PRESHEAR,
            Phase::Highshear => SECTION_HIGHSHEAR,
            Phase::Recovery => SECTION_RECOVERY,
        }
    }
}

/// Direction of a shear-rate scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sweep {
    Forward,
    Reverse,
}

impl Sweep {
    pub const ALL: [Sweep; 2] = [Sweep::Forward, Sweep::Reverse];

    pub fn label(self) -> &'static str {
        match self {
            Sweep::Forward => "FORWARD",
            Sweep::Reverse => "REVERSE",
        }
    }

    pub fn section_title(self) -> &'static str {
        match self {
            Sweep::Forward => SECTION_FORWARD_SWEEP,
            Sweep::Reverse => SECTION_REVERSE_SWEEP,
        }
    }

    /// Human readable panel title, e.g. "Forward Sweep".
    pub fn title(self) -> &'static str {
        match self {
            Sweep::Forward => "Forward Sweep",
            Sweep::Reverse => "Reverse Sweep",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.label() == s.trim())
            .ok_or_else(|| format!("unknown phase label '{s}'"))
    }
}

impl FromStr for Sweep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sweep::ALL
            .into_iter()
            .find(|d| d.label() == s.trim())
            .ok_or_else(|| format!("unknown sweep label '{s}'"))
    }
}

/// Sample name used for metric tables: the file stem.
pub fn sample_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

/// Dataset label used in plot legends: the file stem up to the first underscore.
pub fn dataset_label(path: &Path) -> String {
    let stem = sample_name(path);
    stem.split('_').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for phase in Phase::ALL {
            assert_eq!(phase.label().parse::<Phase>(), Ok(phase));
        }
        assert_eq!(" REVERSE ".parse::<Sweep>(), Ok(Sweep::Reverse));
        assert!("UP".parse::<Sweep>().is_err());
    }

    #[test]
    fn test_dataset_label_takes_prefix() {
        let path = Path::new("/data/slurryA_2024-03-01_run2.csv");
        assert_eq!(sample_name(path), "slurryA_2024-03-01_run2");
        assert_eq!(dataset_label(path), "slurryA");
    }
}
