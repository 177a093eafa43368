//! Lecture catalog data structures.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single course offering as published in the catalog JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lecture {
    /// Course code, unique within the catalog
    pub id: String,

    /// Course title
    pub title: String,

    /// Target grade (1-4)
    pub grade: u8,

    /// Credits as published (e.g. "3", "3(3)")
    pub credits: String,

    /// Major label, may contain `<p>` style markup
    pub major: String,

    /// Raw schedule string, empty when the lecture has no fixed time
    #[serde(default)]
    pub schedule: String,
}

/// The working set of lectures shared by every consumer once loaded.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    lectures: Vec<Arc<Lecture>>,
}

impl Catalog {
    pub fn new(lectures: Vec<Lecture>) -> Self {
        Self {
            lectures: lectures.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn lectures(&self) -> &[Arc<Lecture>] {
        &self.lectures
    }

    pub fn len(&self) -> usize {
        self.lectures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lectures.is_empty()
    }

    /// Find a lecture by its course code.
    pub fn find(&self, id: &str) -> Option<&Arc<Lecture>> {
        self.lectures.iter().find(|lecture| lecture.id == id)
    }

    /// Distinct majors of the unfiltered catalog, in order of first appearance.
    pub fn all_majors(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.lectures
            .iter()
            .map(|lecture| lecture.major.as_str())
            .filter(|major| seen.insert(*major))
            .collect()
    }
}

impl From<Vec<Lecture>> for Catalog {
    fn from(lectures: Vec<Lecture>) -> Self {
        Self::new(lectures)
    }
}
