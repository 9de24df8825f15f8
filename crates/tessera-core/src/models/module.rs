//! Module catalog domain model.
//!
//! Modules are immutable reference data describing the feature
//! families a company can be granted. The catalog is seeded at
//! startup; `archived` soft-deletes an entry.

use serde::{Deserialize, Serialize};

/// Closed enumeration of feature families. Menu provisioning and
/// feature gating dispatch on this, never on raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    Website,
    Education,
    Journal,
    JournalIndex,
    Review,
}

impl ModuleKind {
    /// Wire/storage representation, kept byte-compatible with the
    /// legacy catalog.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Website => "website",
            ModuleKind::Education => "education",
            ModuleKind::Journal => "journal",
            ModuleKind::JournalIndex => "rj-index",
            ModuleKind::Review => "review-and-submission",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "website" => Some(ModuleKind::Website),
            "education" => Some(ModuleKind::Education),
            "journal" => Some(ModuleKind::Journal),
            "rj-index" => Some(ModuleKind::JournalIndex),
            "review-and-submission" => Some(ModuleKind::Review),
            _ => None,
        }
    }

    /// Every catalog kind, in seed order.
    pub fn all() -> [ModuleKind; 5] {
        [
            ModuleKind::Website,
            ModuleKind::Education,
            ModuleKind::Journal,
            ModuleKind::JournalIndex,
            ModuleKind::Review,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    /// Opaque unique key; the public identifier for this catalog entry.
    pub module_key: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: ModuleKind,
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateModule {
    pub module_key: String,
    pub name: String,
    pub description: Option<String>,
    pub kind: ModuleKind,
}
