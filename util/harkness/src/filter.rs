// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Test selection.

use std::collections::BTreeSet;

/// Decides which declared tests run.
///
/// Built from a comma-separated list of names, e.g. `"parse,encode"`. Names
/// are matched verbatim: no trimming, no case folding, no patterns. Empty
/// segments are dropped, so `""` selects nothing and `"a,,b,"` selects `a`
/// and `b`. With `run_all` set every name matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    run_all: bool,
    names: BTreeSet<String>,
}

impl Filter {
    /// Parse a selection. Never fails.
    pub fn parse(selection: &str, run_all: bool) -> Self {
        let names = selection
            .split(',')
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        Self { run_all, names }
    }

    /// Whether a test named `name` should run.
    pub fn matches(&self, name: &str) -> bool {
        self.run_all || self.names.contains(name)
    }

    pub fn run_all(&self) -> bool {
        self.run_all
    }

    /// The distinct names parsed from the selection, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Whether nothing at all can match.
    pub fn is_empty(&self) -> bool {
        !self.run_all && self.names.is_empty()
    }
}
