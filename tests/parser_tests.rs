use qsee::{
    key, parse_file, parse_str, parse_str_with_options, title, DiagnosticKind, Error, ParseOptions,
};
use std::cmp::Ordering;
use std::io::Write;

const WATER_DECK: &str = "\
# Water, STO-3G
[Molecule]
charge = 0
mult = 1
geom:
  O  0.000  0.000  0.000
  H  0.757  0.586  0.000
  H -0.757  0.586  0.000

[QM]
reference = RHF
job = SCF

[BASIS]
basis = sto-3g
";

#[test]
fn test_roundtrip_simple_entry() {
    let deck = parse_str("[QM]\nreference = RHF\n");
    let store = deck.store();
    assert!(store.contains_data("QM.REFERENCE"));
    assert_eq!(store.get::<String>("QM.REFERENCE").unwrap(), "RHF");
}

#[test]
fn test_store_order_honors_dot_and_bracket_policy() {
    let expected = ["BASIS", "BASIS.BASIS", "BASIS.X", "BASIS[0]"];
    for pair in expected.windows(2) {
        assert_eq!(
            key::compare(pair[0], pair[1]),
            Ordering::Less,
            "{} < {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_numeric_bracket_ordering_in_parsed_store() {
    let deck = parse_str("list[10] = b\nlist[2] = a\n");
    let keys: Vec<_> = deck.store().keys().collect();
    assert_eq!(keys, vec!["LIST[2]", "LIST[10]"]);
}

#[test]
fn test_continuation_accumulation() {
    let deck = parse_str("[Molecule]\ngeom:\n  H 0 0 0\n  H 0 0 0.74\n");
    let geom = deck.store().get::<String>("MOLECULE.GEOM").unwrap();
    assert_eq!(geom, "H 0 0 0\nH 0 0 0.74");
}

#[test]
fn test_continuation_uppercases_element_symbols() {
    // GEOM is not on the case-sensitive allow-list, so lowercase element
    // symbols are destroyed. Inherited behavior, deliberately preserved.
    let deck = parse_str("[Molecule]\ngeom:\n  Cl 0 0 0\n");
    assert_eq!(
        deck.store().get::<String>("MOLECULE.GEOM").unwrap(),
        "CL 0 0 0"
    );
}

#[test]
fn test_case_sensitive_allow_list_preserves_value() {
    let deck = parse_str("[BASIS]\nbasis = sto-3g\n");
    assert_eq!(
        deck.store().get::<String>("BASIS.BASIS").unwrap(),
        "sto-3g"
    );
}

#[test]
fn test_custom_allow_list() {
    let options = ParseOptions::new().with_case_sensitive_key("MOLECULE.GEOM");
    let deck = parse_str_with_options("[Molecule]\ngeom:\n  Na 0 0 0\n", &options);
    assert_eq!(
        deck.store().get::<String>("MOLECULE.GEOM").unwrap(),
        "Na 0 0 0"
    );
}

#[test]
fn test_section_and_list_queries() {
    let deck = parse_str("[A]\nb = 1\nc[0] = 2\nc[1] = 3\n");
    let store = deck.store();
    assert!(store.contains_section("A"));
    assert!(store.contains_list("A.C"));
    assert_eq!(store.list_size("A.C"), 2);
    assert_eq!(store.data_in_section("A"), vec!["B", "C[0]", "C[1]"]);
}

#[test]
fn test_get_section_strips_prefix() {
    let deck = parse_str(WATER_DECK);
    let qm = deck.store().section("QM");
    assert_eq!(qm.len(), 2);
    assert_eq!(qm.get_raw("REFERENCE"), Some("RHF"));
    assert_eq!(qm.get_raw("JOB"), Some("SCF"));
}

#[test]
fn test_duplicate_key_overwrites_with_one_warning_each() {
    let deck = parse_str("[QM]\nreference = RHF\nreference = UHF\nreference = ROHF\n");
    assert_eq!(deck.store().get_raw("QM.REFERENCE"), Some("ROHF"));
    let duplicates: Vec<_> = deck
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::DuplicateKey)
        .collect();
    assert_eq!(duplicates.len(), 2);
}

#[test]
fn test_empty_value_is_skipped_with_warning() {
    let deck = parse_str("[QM]\nreference =\n");
    assert!(!deck.store().contains_data("QM.REFERENCE"));
    assert_eq!(deck.diagnostics().len(), 1);
    assert_eq!(deck.diagnostics()[0].kind, DiagnosticKind::EmptyValue);
}

#[test]
fn test_unmatched_bracket_warns_but_parses_on() {
    let deck = parse_str("[QM]\na) = junk\nreference = RHF\n");
    assert!(deck
        .diagnostics()
        .iter()
        .any(|d| d.kind == DiagnosticKind::UnmatchedBracket));
    assert_eq!(deck.store().get_raw("QM.REFERENCE"), Some("RHF"));
}

#[test]
fn test_bool_coercion() {
    let deck = parse_str("[SCF]\ndamp = on\ndiis = false\nguess = maybe\n");
    let store = deck.store();
    assert!(store.get::<bool>("SCF.DAMP").unwrap());
    assert!(!store.get::<bool>("SCF.DIIS").unwrap());
    assert!(matches!(
        store.get::<bool>("SCF.GUESS"),
        Err(Error::InvalidBool { .. })
    ));
}

#[test]
fn test_numeric_coercion_failures_are_lookup_errors() {
    let deck = parse_str("[QM]\nreference = RHF\n");
    assert!(matches!(
        deck.store().get::<i64>("QM.REFERENCE"),
        Err(Error::InvalidNumber { .. })
    ));
    assert!(matches!(
        deck.store().get::<f64>("QM.MISSING"),
        Err(Error::KeyNotFound { .. })
    ));
}

#[test]
fn test_missing_file_fails_before_parsing() {
    let result = parse_file("/no/such/deck.inp");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_parse_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(WATER_DECK.as_bytes()).unwrap();

    let deck = parse_file(file.path()).unwrap();
    assert!(deck.diagnostics().is_empty());
    assert_eq!(deck.store().get::<i64>("MOLECULE.CHARGE").unwrap(), 0);
    assert_eq!(deck.store().get::<i64>("MOLECULE.MULT").unwrap(), 1);
    assert_eq!(deck.store().list_size("MOLECULE"), 0);
}

#[test]
fn test_title_extraction() {
    assert_eq!(title(WATER_DECK), Some("Water, STO-3G".to_string()));
    assert_eq!(title("[QM]\n# too late\n"), None);
}

#[test]
fn test_full_enumeration_is_store_ordered() {
    let deck = parse_str(WATER_DECK);
    let keys: Vec<_> = deck.store().keys().collect();
    assert_eq!(
        keys,
        vec![
            "BASIS.BASIS",
            "MOLECULE.CHARGE",
            "MOLECULE.GEOM",
            "MOLECULE.MULT",
            "QM.JOB",
            "QM.REFERENCE",
        ]
    );
}

#[test]
fn test_separator_inside_brackets_is_literal() {
    let deck = parse_str("[BASIS]\nbasis = 6-31G(d)\nopts = {scale: 1.2}\n");
    let store = deck.store();
    assert_eq!(store.get_raw("BASIS.BASIS"), Some("6-31G(d)"));
    assert_eq!(store.get_raw("BASIS.OPTS"), Some("{SCALE: 1.2}"));
}

#[test]
fn test_colon_separator_and_comments() {
    let deck = parse_str("[QM]\nreference: RHF # restricted\n");
    assert_eq!(deck.store().get_raw("QM.REFERENCE"), Some("RHF"));
}

#[test]
fn test_molecule_extraction_end_to_end() {
    let deck = parse_str(WATER_DECK);
    let molecule = qsee::Molecule::from_store(deck.store());
    assert_eq!(molecule.atoms.len(), 3);
    assert_eq!(molecule.formula(), "H2O");
    assert_eq!(molecule.charge, 0);
    assert_eq!(molecule.multiplicity, 1);
}
