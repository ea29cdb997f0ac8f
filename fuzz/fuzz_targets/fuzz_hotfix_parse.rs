// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]
use libfuzzer_sys::fuzz_target;
use relgraph::parser::HotfixParser;

fuzz_target!(|version: &str| {
    let parser = HotfixParser::default();
    let parsed = parser.parse(version);

    // A recovered base must be a strict prefix of the input
    if let Some(base) = parsed.base_version() {
        assert!(version.starts_with(base) && base.len() < version.len());
    }
});
