// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Base/hotfix relationships between version entries

use std::collections::BTreeMap;

use crate::parser::HotfixParser;
use crate::types::{EnrichedVersionEntry, JoinKey, VersionEntry};

/// Group hotfix tags by the base version they were cut from
///
/// Tags within a group are ordered by hotfix sequence; entries with equal
/// sequence keep their input order.
#[must_use]
pub fn build_child_map(
    entries: &[VersionEntry],
    parser: &HotfixParser,
) -> BTreeMap<String, Vec<String>> {
    let mut groups: BTreeMap<String, Vec<(u64, String)>> = BTreeMap::new();

    for entry in entries {
        let parsed = parser.parse(&entry.version);
        if let (Some(base), Some(sequence)) = (parsed.base_version(), parsed.sequence()) {
            groups
                .entry(base.to_string())
                .or_default()
                .push((sequence, entry.tag.clone()));
        }
    }

    groups
        .into_iter()
        .map(|(base, mut members)| {
            members.sort_by_key(|(sequence, _)| *sequence);
            (base, members.into_iter().map(|(_, tag)| tag).collect())
        })
        .collect()
}

/// Attach hotfix fields to every entry and children to main-line entries
///
/// A main-line entry's children are looked up by its `join_key` field.
#[must_use]
pub fn enrich(
    entries: &[VersionEntry],
    parser: &HotfixParser,
    join_key: JoinKey,
) -> Vec<EnrichedVersionEntry> {
    let child_map = build_child_map(entries, parser);

    entries
        .iter()
        .map(|entry| {
            let parsed = parser.parse(&entry.version);
            let is_hotfix = parsed.is_hotfix();
            let children = if is_hotfix {
                Vec::new()
            } else {
                child_map
                    .get(join_key.select(&entry.tag, &entry.version))
                    .cloned()
                    .unwrap_or_default()
            };

            EnrichedVersionEntry {
                entry: entry.clone(),
                is_hotfix,
                base_tag: parsed.base_version().map(String::from),
                hotfix_sequence: parsed.sequence(),
                children,
            }
        })
        .collect()
}
