//! Run parameters for a scaffolding pass and the clone-library table used to
//! turn mate-pair placements into gap estimates.

use crate::error::{Result, ScaffoldError};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Insert-size statistics for one paired-end library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloneLibraryInformation {
    pub library_name: String,
    pub mean_length_of_insert: f32,
    pub standard_deviation_of_insert: f32,
}

impl CloneLibraryInformation {
    pub fn new(library_name: &str, mean: f32, standard_deviation: f32) -> Self {
        Self {
            library_name: library_name.to_string(),
            mean_length_of_insert: mean,
            standard_deviation_of_insert: standard_deviation,
        }
    }
}

/// Library name -> insert statistics.
///
/// Read IDs carry the library name after the `:` (e.g. `frag.X1:0.5K`).
#[derive(Debug, Clone)]
pub struct CloneLibrary {
    libraries: AHashMap<String, CloneLibraryInformation>,
}

impl CloneLibrary {
    pub fn empty() -> Self {
        Self {
            libraries: AHashMap::new(),
        }
    }

    pub fn from_libraries(libraries: &[CloneLibraryInformation]) -> Self {
        let mut library = Self::empty();
        for info in libraries {
            library.add_library(info.clone());
        }
        library
    }

    /// Adds or replaces a library.
    pub fn add_library(&mut self, info: CloneLibraryInformation) {
        self.libraries.insert(info.library_name.clone(), info);
    }

    pub fn get_library_information(&self, name: &str) -> Option<&CloneLibraryInformation> {
        self.libraries.get(name)
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

impl Default for CloneLibrary {
    fn default() -> Self {
        Self::from_libraries(&default_libraries())
    }
}

/// Standard insert libraries shipped with the scaffolder.
pub fn default_libraries() -> Vec<CloneLibraryInformation> {
    vec![
        CloneLibraryInformation::new("0.5K", 500.0, 20.0),
        CloneLibraryInformation::new("2K", 2000.0, 100.0),
        CloneLibraryInformation::new("5K", 5000.0, 500.0),
        CloneLibraryInformation::new("10K", 10000.0, 1000.0),
    ]
}

/// Parameters for one scaffolding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Seed length for read-to-contig mapping
    pub kmer_length: usize,
    /// Minimum number of mate pairs needed to link two contigs
    pub redundancy: i32,
    /// Worker threads (0 = rayon default)
    pub threads: usize,
    pub libraries: Vec<CloneLibraryInformation>,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            kmer_length: 21,
            // Pop, Kosack & Salzberg (2004), Hierarchical scaffolding with Bambus.
            redundancy: 2,
            threads: num_cpus::get(),
            libraries: default_libraries(),
        }
    }
}

impl ScaffoldConfig {
    /// Parse a JSON document; missing fields fall back to the defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ScaffoldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.kmer_length == 0 {
            return Err(ScaffoldError::invalid_argument(
                "kmer_length",
                "must be positive",
            ));
        }
        if self.redundancy < 0 {
            return Err(ScaffoldError::invalid_argument(
                "redundancy",
                "must be non-negative",
            ));
        }
        for info in &self.libraries {
            if info.mean_length_of_insert < 0.0 || info.standard_deviation_of_insert < 0.0 {
                return Err(ScaffoldError::invalid_argument(
                    "libraries",
                    format!("library {} has negative statistics", info.library_name),
                ));
            }
        }
        Ok(())
    }

    pub fn clone_library(&self) -> CloneLibrary {
        CloneLibrary::from_libraries(&self.libraries)
    }
}
