// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]
use libfuzzer_sys::fuzz_target;
use relgraph::pipeline::GraphBuilder;
use relgraph::source::parse_entries;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(entries) = parse_entries(text) {
        let graph = GraphBuilder::default().build(&entries);
        assert_eq!(graph.nodes.len(), entries.len());
        let _ = serde_json::to_string(&graph);
    }
});
