use std::path::PathBuf;

use snippet_lib::{Placeholder, SnippetError, Template, TextSpan};

#[test]
fn hello_world_placeholders() {
    let template = Template::new("Hello $1 ${2:name}!");
    assert_eq!(
        template.placeholders(),
        &[
            Placeholder::new(1, None, TextSpan::new(6, 2)),
            Placeholder::new(2, Some("name".to_string()), TextSpan::new(9, 9)),
        ]
    );
    assert_eq!(template.render_for_display(), "Hello  name!");
    assert_eq!(template.render(|_, _| Some("X")), "Hello X X!");
}

#[test]
fn construction_is_deterministic() {
    let text = "${3:c} $1 ${1:a} $2 $0";
    assert_eq!(Template::new(text), Template::new(text));
    assert_eq!(
        Template::new(text).placeholders(),
        Template::from(text.to_string()).placeholders()
    );
}

#[test]
fn absent_text_is_an_error() {
    let err = Template::from_optional(None::<&str>).unwrap_err();
    assert!(matches!(err, SnippetError::MissingText));
    assert!(err.to_string().contains("missing"));
}

#[test]
fn loads_template_from_file() -> Result<(), SnippetError> {
    let template = Template::from_path(fixture_path("storage.snippet"))?;

    let indices: Vec<u32> = template.placeholders().iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);

    let display = template.render_for_display();
    assert!(display.starts_with("resource storageAccount 'Microsoft.Storage"));
    assert!(display.contains("  name: name\n"));
    assert!(display.contains("  kind: \n"));
    assert!(!display.contains('$'));
    Ok(())
}

#[test]
fn missing_file_reports_path() {
    let path = fixture_path("does-not-exist.snippet");
    let err = Template::from_path(&path).unwrap_err();
    match err {
        SnippetError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reads_file_written_at_runtime() -> Result<(), SnippetError> {
    let dir = tempfile::tempdir().map_err(|source| SnippetError::Io {
        path: PathBuf::from("<tempdir>"),
        source,
    })?;
    let path = dir.path().join("loop.snippet");
    std::fs::write(&path, "for ${1:item} in ${2:items}:\n    $0").map_err(|source| {
        SnippetError::Io {
            path: path.clone(),
            source,
        }
    })?;

    let template = Template::from_path(&path)?;
    assert_eq!(template.render_for_display(), "for item in items:\n    ");
    Ok(())
}

#[test]
fn json_round_trip_reparses_text() {
    let template = Template::new("$2 ${1:first}");
    let json = serde_json::to_value(&template).unwrap();
    assert_eq!(json["text"], "$2 ${1:first}");
    assert_eq!(json["placeholders"][0]["index"], 1);
    assert_eq!(json["placeholders"][0]["name"], "first");
    assert_eq!(json["placeholders"][0]["span"]["position"], 3);
    assert_eq!(json["placeholders"][1]["name"], serde_json::Value::Null);

    // placeholders in the payload are ignored; only the text is trusted
    let forged = serde_json::json!({
        "text": "$1",
        "placeholders": [{ "index": 9, "name": null, "span": { "position": 0, "length": 2 } }]
    });
    let restored: Template = serde_json::from_value(forged).unwrap();
    assert_eq!(restored, Template::new("$1"));
}

#[test]
fn shared_template_renders_concurrently() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Template>();

    let template = Template::new("<$1|${2:two}>");
    let results: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let template = &template;
                scope.spawn(move || template.render(|_, _| Some(worker.to_string())))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    for (worker, rendered) in results.iter().enumerate() {
        assert_eq!(rendered, &format!("<{worker}|{worker}>"));
    }
    assert_eq!(template.text(), "<$1|${2:two}>");
}

fn fixture_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(file)
}
