use sparrow_challenges::{Challenge, Difficulty, Graph};
use sparrow_utils::{
    parse_graph_csv, read_coords_csv, read_graph_csv, write_coords_csv, write_graph_csv,
    write_graph_csv_to,
};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_parse_graph_csv() {
    let input = "3\n0,1.5,2\n4,0,6.25\n7,8,0\n";
    let graph = parse_graph_csv(input.as_bytes()).unwrap();
    assert_eq!(graph.num_nodes(), 3);
    assert_eq!(
        graph.weight_matrix(),
        &vec![
            vec![0.0, 1.5, 2.0],
            vec![4.0, 0.0, 6.25],
            vec![7.0, 8.0, 0.0]
        ]
    );
}

#[test]
fn test_parse_graph_csv_tolerates_spacing() {
    let input = "2\n 0 , 3 \n1, 0\n";
    let graph = parse_graph_csv(input.as_bytes()).unwrap();
    assert_eq!(graph.weight(0, 1), 3.0);
    assert_eq!(graph.weight(1, 0), 1.0);
}

#[test]
fn test_parse_graph_csv_rejects_malformed() {
    assert!(parse_graph_csv("".as_bytes()).is_err());
    assert!(parse_graph_csv("x\n0\n".as_bytes()).is_err());
    assert!(parse_graph_csv("0\n".as_bytes()).is_err());
    // short row
    assert!(parse_graph_csv("2\n0,1\n1\n".as_bytes()).is_err());
    // missing row
    assert!(parse_graph_csv("3\n0,1,2\n1,0,2\n".as_bytes()).is_err());
    // extra row
    assert!(parse_graph_csv("1\n0\n0\n".as_bytes()).is_err());
    // bad cell
    assert!(parse_graph_csv("2\n0,abc\n1,0\n".as_bytes()).is_err());
    // negative weight
    assert!(parse_graph_csv("2\n0,-1\n1,0\n".as_bytes()).is_err());
}

#[test]
fn test_graph_csv_file_roundtrip() {
    let challenge = Challenge::generate_instance(
        &[9u8; 32],
        &Difficulty {
            num_nodes: 12,
            density: 0.5,
        },
    )
    .unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.csv");
    write_graph_csv(&path, &challenge.graph).unwrap();
    let loaded = read_graph_csv(&path).unwrap();
    assert_eq!(loaded, challenge.graph);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().next(), Some("12"));
    assert_eq!(content.lines().count(), 13);
}

#[test]
fn test_write_graph_csv_layout() {
    let graph = Graph::new(vec![vec![0.0, 2.5], vec![3.0, 0.0]]).unwrap();
    let mut buffer = Vec::new();
    write_graph_csv_to(&mut buffer, &graph).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "2\n0,2.5\n3,0\n");
}

#[test]
fn test_read_graph_csv_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "2").unwrap();
    writeln!(file, "0,10").unwrap();
    writeln!(file, "20,0").unwrap();
    let graph = read_graph_csv(file.path()).unwrap();
    assert_eq!(graph.weight(1, 0), 20.0);

    assert!(read_graph_csv(file.path().with_extension("missing")).is_err());
}

#[test]
fn test_coords_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("coords.csv");
    let positions = vec![(0.25, 0.5), (0.75, 0.125), (0.0, 1.0)];
    write_coords_csv(&path, &positions).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().next(), Some("node,x,y"));
    assert_eq!(read_coords_csv(&path).unwrap(), positions);
}

#[test]
fn test_coords_out_of_order() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "node,x,y").unwrap();
    writeln!(file, "1,0.5,0.5").unwrap();
    assert!(read_coords_csv(file.path()).is_err());
}
