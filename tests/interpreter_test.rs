#![allow(missing_docs)]

use delve::proto::QueryStream;
use delve::render::{Printer, RenderOpts, Renderer};

/// Drive a wire script through the full decode and render pipeline,
/// returning the plain-text output.
async fn rendered(script: &str, opts: RenderOpts) -> String {
    let mut source = QueryStream::new(script.as_bytes());
    let mut renderer = Renderer::new(Printer::new(Vec::new(), false), opts);
    renderer.render_stream(&mut source).await.unwrap();
    String::from_utf8(renderer.into_printer().into_inner()).unwrap()
}

/// Integration test: a representative query session renders end to end.
///
/// Covers print text, a warning with extra fields, edit dots collapsing
/// onto one line, a node with properties, tags and tagprops, and the
/// completion line.
#[tokio::test]
async fn test_full_session_renders_in_order() {
    let script = concat!(
        r#"["print", {"mesg": "query starting"}]"#,
        "\n",
        r#"["warn", {"mesg": "index cold", "shard": 2}]"#,
        "\n",
        r#"["node:edits", {"edits": [{"changes": [[0], [1]]}]}]"#,
        "\n",
        r#"["node:edits", {"edits": [{"changes": [[2]]}]}]"#,
        "\n",
        r#"["node", {"form": "inet:fqdn", "valu": "vertex.link", "#,
        r#""props": {"issuffix": "false", ".created": "2024/01/02 03:04:05.006"}, "#,
        r#""tags": {"rep.vt": "(2020/01/01, 2021/01/01)", "cno": null}, "#,
        r#""tagprops": {"rep.vt": [["score", "100"]]}}]"#,
        "\n",
        r#"["fini", {"took": 250, "count": 1}]"#,
        "\n",
    );

    let output = rendered(script, RenderOpts::default()).await;
    let expected = concat!(
        "query starting\n",
        "WARNING: index cold shard=2\n",
        "...\n",
        "inet:fqdn=vertex.link\n",
        "        .created = 2024/01/02 03:04:05.006\n",
        "        :issuffix = false\n",
        "        #cno\n",
        "        #rep.vt = (2020/01/01, 2021/01/01)\n",
        "        #rep.vt:score = 100\n",
        "complete. 1 nodes in 250 ms (4/sec).\n",
    );
    assert_eq!(output, expected);
}

/// Integration test: kinds this client does not handle vanish silently.
#[tokio::test]
async fn test_unhandled_kinds_are_invisible() {
    let script = concat!(
        r#"["init", {"tick": 12345}]"#,
        "\n",
        r#"["node:add", {"form": "inet:ipv4"}]"#,
        "\n",
        "\n",
        r#"["fini", {"took": 5, "count": 0}]"#,
        "\n",
    );

    let output = rendered(script, RenderOpts::default()).await;
    assert_eq!(output, "complete. 0 nodes in 5 ms (0/sec).\n");
}

/// Integration test: a sub-millisecond query still reports a sane rate.
#[tokio::test]
async fn test_instant_query_statistics() {
    let script = concat!(r#"["fini", {"took": 0, "count": 5}]"#, "\n");
    let output = rendered(script, RenderOpts::default()).await;
    assert_eq!(output, "complete. 5 nodes in 1 ms (5000/sec).\n");
}

/// Integration test: node detail can be suppressed per side.
#[tokio::test]
async fn test_hide_flags() {
    let script = concat!(
        r#"["node", {"form": "inet:ipv4", "valu": "1.2.3.4", "#,
        r#""props": {"asn": "80"}, "tags": {"cno": null}}]"#,
        "\n",
    );

    let both = RenderOpts {
        hide_props: true,
        hide_tags: true,
    };
    assert_eq!(rendered(script, both).await, "inet:ipv4=1.2.3.4\n");

    let props_only = RenderOpts {
        hide_props: false,
        hide_tags: true,
    };
    assert_eq!(
        rendered(script, props_only).await,
        "inet:ipv4=1.2.3.4\n        :asn = 80\n"
    );
}

/// Integration test: a positioned syntax error renders the three-line
/// caret display and silences the rest of the stream.
#[tokio::test]
async fn test_syntax_error_caret_display() {
    let script = concat!(
        r#"["err", ["BadSyntax", {"at": 13, "text": "inet:ipv4 | | limit 1", "mesg": "Unexpected token"}]]"#,
        "\n",
        r#"["fini", {"took": 1, "count": 0}]"#,
        "\n",
    );

    let output = rendered(script, RenderOpts::default()).await;
    let expected = format!(
        "inet:ipv4 | | limit 1\n{}^\nSyntax Error: Unexpected token\n",
        " ".repeat(13)
    );
    assert_eq!(output, expected);
}

/// Integration test: long query text is windowed around the error with
/// the caret pinned past the left trim marker.
#[tokio::test]
async fn test_syntax_error_window_on_long_text() {
    let text = "q".repeat(100);
    let script = format!(
        "[\"err\", [\"BadSyntax\", {{\"at\": 50, \"text\": \"{text}\", \"mesg\": \"boom\"}}]]\n"
    );

    let output = rendered(&script, RenderOpts::default()).await;
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], format!("...{}...", "q".repeat(60)));
    assert_eq!(lines[1], format!("{}^", " ".repeat(33)));
    assert_eq!(lines[2], "Syntax Error: boom");
}

/// Integration test: non-syntax errors report and let the stream finish.
#[tokio::test]
async fn test_generic_error_does_not_stop_stream() {
    let script = concat!(
        r#"["err", ["AuthDeny", {"mesg": "user cannot read inet:ipv4"}]]"#,
        "\n",
        r#"["fini", {"took": 2, "count": 0}]"#,
        "\n",
    );

    let output = rendered(script, RenderOpts::default()).await;
    assert_eq!(
        output,
        "ERROR: user cannot read inet:ipv4\ncomplete. 0 nodes in 2 ms (0/sec).\n"
    );
}

/// Integration test: garbage on the wire surfaces as a stream error
/// instead of silently truncated output.
#[tokio::test]
async fn test_wire_garbage_is_a_fault() {
    let script = "{\"kind\": \"node\"}\n";
    let mut source = QueryStream::new(script.as_bytes());
    let mut renderer = Renderer::new(Printer::new(Vec::new(), false), RenderOpts::default());

    assert!(renderer.render_stream(&mut source).await.is_err());
}

/// Integration test: edit dots from many batches stay on one line until
/// the next full line of output.
#[tokio::test]
async fn test_edit_dots_flow_into_completion() {
    let script = concat!(
        r#"["node:edits", {"edits": [{"changes": [[0]]}, {"changes": [[1], [2]]}]}]"#,
        "\n",
        r#"["node:edits", {"edits": [{"changes": [[3]]}]}]"#,
        "\n",
        r#"["fini", {"took": 8, "count": 4}]"#,
        "\n",
    );

    let output = rendered(script, RenderOpts::default()).await;
    assert_eq!(output, "....\ncomplete. 4 nodes in 8 ms (500/sec).\n");
}
