use super::*;

fn record(
    directory: &str,
    file: &str,
    command: Option<&str>,
    arguments: Option<&[&str]>,
) -> EntryRecord {
    EntryRecord {
        directory: directory.to_string(),
        file: file.to_string(),
        command: command.map(str::to_string),
        arguments: arguments.map(|args| args.iter().map(|s| s.to_string()).collect()),
    }
}

#[test]
fn test_parse_entry_with_arguments() {
    let record = record(
        "/proj",
        "src/a.cpp",
        None,
        Some(&["clang++", "-Iinclude", "src/a.cpp"]),
    );
    let entry = CompilationEntry::from_record(&record).unwrap();
    assert_eq!(entry.directory, PathBuf::from("/proj"));
    assert_eq!(entry.main_file, PathBuf::from("src/a.cpp"));
    assert_eq!(entry.arguments, vec!["clang++", "-Iinclude", "src/a.cpp"]);
}

#[test]
fn test_parse_entry_with_command() {
    let record = record(
        "/proj",
        "a b.cpp",
        Some(r#"clang++ -DFOO="a b" 'a b.cpp' e\ f.cpp"#),
        None,
    );
    let entry = CompilationEntry::from_record(&record).unwrap();
    assert_eq!(
        entry.arguments,
        vec!["clang++", "-DFOO=a b", "a b.cpp", "e f.cpp"]
    );
}

#[test]
fn test_entry_with_both_forms_rejected() {
    let record = record("/proj", "a.cpp", Some("clang++ a.cpp"), Some(&["clang++"]));
    let err = CompilationEntry::from_record(&record).unwrap_err();
    assert!(matches!(err, CompdbError::MalformedEntry(_)));
}

#[test]
fn test_entry_with_neither_form_rejected() {
    let record = record("/proj", "a.cpp", None, None);
    let err = CompilationEntry::from_record(&record).unwrap_err();
    assert!(matches!(err, CompdbError::MalformedEntry(_)));
}

#[test]
fn test_unterminated_quote_rejected() {
    let err = lexer::split_command("clang++ 'a.cpp").unwrap_err();
    assert!(matches!(err, CompdbError::MalformedEntry(_)));
}

#[test]
fn test_split_command_empty_quoted_token() {
    let tokens = lexer::split_command("clang -D ''").unwrap();
    assert_eq!(tokens, vec!["clang", "-D", ""]);
}

#[test]
fn test_split_command_double_quote_escape() {
    let tokens = lexer::split_command(r#"clang "-DSTR=\"x\"" a.cpp"#).unwrap();
    assert_eq!(tokens, vec!["clang", r#"-DSTR="x""#, "a.cpp"]);
}

#[test]
fn test_retarget_rewrites_only_matching_tokens() {
    let mut entry = CompilationEntry {
        main_file: PathBuf::from("src/a.cpp"),
        directory: PathBuf::from("/proj"),
        arguments: vec![
            "clang++".to_string(),
            "-Iinclude".to_string(),
            "src/a.cpp".to_string(),
            "-DFOO".to_string(),
        ],
    };
    entry.retarget_main_file(Path::new("a.min.cpp"));
    assert_eq!(entry.main_file, PathBuf::from("a.min.cpp"));
    assert_eq!(
        entry.arguments,
        vec!["clang++", "-Iinclude", "a.min.cpp", "-DFOO"]
    );
}

#[test]
fn test_retarget_rewrites_substring_occurrences() {
    // The old path is replaced wherever it appears inside a token, e.g. in
    // the object-file argument. Documented substring-matching behavior.
    let mut entry = CompilationEntry {
        main_file: PathBuf::from("src/a.cpp"),
        directory: PathBuf::from("/proj"),
        arguments: vec![
            "clang++".to_string(),
            "src/a.cpp".to_string(),
            "-obuild/src/a.cpp.o".to_string(),
        ],
    };
    entry.retarget_main_file(Path::new("a.min.cpp"));
    assert_eq!(
        entry.arguments,
        vec!["clang++", "a.min.cpp", "-obuild/a.min.cpp.o"]
    );
}

#[test]
fn test_record_round_trip() {
    let entry = CompilationEntry {
        main_file: PathBuf::from("src/a.cpp"),
        directory: PathBuf::from("/proj"),
        arguments: vec!["clang++".to_string(), "src/a.cpp".to_string()],
    };
    let reparsed = CompilationEntry::from_record(&entry.to_record()).unwrap();
    assert_eq!(reparsed, entry);
}

#[test]
fn test_to_record_never_emits_command() {
    let entry = CompilationEntry {
        main_file: PathBuf::from("a.cpp"),
        directory: PathBuf::from("/proj"),
        arguments: vec!["clang++".to_string(), "a.cpp".to_string()],
    };
    let value = serde_json::to_value(entry.to_record()).unwrap();
    assert!(value.get("command").is_none());
    assert!(value.get("arguments").is_some());
    assert_eq!(value["file"], "a.cpp");
    assert_eq!(value["directory"], "/proj");
}

#[test]
fn test_load_single_entry_rejects_empty_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compile_commands.json");
    fs::write(&path, "[]").unwrap();
    let err = load_single_entry(&path).unwrap_err();
    match err {
        CompdbError::MalformedEntry(msg) => assert!(msg.contains("found 0")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_single_entry_rejects_two_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compile_commands.json");
    let entry = serde_json::json!({
        "directory": "/proj",
        "file": "a.cpp",
        "arguments": ["clang++", "a.cpp"],
    });
    fs::write(
        &path,
        serde_json::to_string(&vec![entry.clone(), entry]).unwrap(),
    )
    .unwrap();
    let err = load_single_entry(&path).unwrap_err();
    match err {
        CompdbError::MalformedEntry(msg) => assert!(msg.contains("found 2")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_single_entry_accepts_one_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compile_commands.json");
    fs::write(
        &path,
        r#"[{"directory": "/proj", "file": "a.cpp", "command": "clang++ -c a.cpp"}]"#,
    )
    .unwrap();
    let entry = load_single_entry(&path).unwrap();
    assert_eq!(entry.arguments, vec!["clang++", "-c", "a.cpp"]);
}
