//! Integration tests for reading radare2 call graphs from disk.

use malgraph_graph::dot::parse_dot_file;

#[test]
fn test_call_graph_fixture() {
    let graph = parse_dot_file("tests/fixtures/hello.dot")
        .expect("fixture should parse");

    // Declared nodes come first, then callees that only appear in edges.
    assert_eq!(
        graph.nodes(),
        [
            "0x00401000",
            "0x00401040",
            "0x00401126",
            "0x00401150",
            "0x00401070",
            "0x00403ff0",
            "0x00401030",
        ]
    );

    let data = graph
        .to_edge_graph()
        .expect("fixture should encode")
        .to_geometric();
    assert_eq!(data.num_nodes, 7);
    assert_eq!(
        data.edgelist,
        vec![[0, 4], [1, 5], [2, 6], [2, 3], [3, 6], [3, 3]]
    );
    assert_eq!(
        data.labels,
        vec![[0, 1], [0, 1], [0, 2], [2, 2], [1, 0], [1, 0], [2, 0]]
    );
    assert_eq!(data.labels.len(), data.num_nodes as usize);
}
