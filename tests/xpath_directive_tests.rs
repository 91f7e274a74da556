mod common;

use common::{MockApp, TestResult, write_xml};
use plume::directive_core::tests::MockHost;
use plume::{DirectiveContext, DirectiveError, Invocation, SourceLocation, XPATH_FILE, setup};

const STRUCTURE: &str = "<project>\n  <class name=\"Parser\">\n    <docstring>Parses input.\n\nSee the *format* notes.</docstring>\n  </class>\n  <class name=\"Writer\">\n    <docstring>Writes output.</docstring>\n  </class>\n</project>";

fn invocation(expr: &str) -> Invocation {
    Invocation::new(SourceLocation::new("api.rst", 42)).argument(expr)
}

#[test]
fn test_setup_installs_directive_and_config_default() {
    let mut app = MockApp::new();
    let info = setup(&mut app);

    assert!(info.parallel_read_safe);
    assert_eq!(app.directives.len(), 1);
    assert_eq!(app.directive("xpath").name(), "xpath");
    // The declared default is the empty string, meaning "unset".
    assert_eq!(app.config.get(XPATH_FILE), Some(""));
}

#[test]
fn test_directive_splices_matched_text_in_document_order() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_xml(&dir, "structure.xml", STRUCTURE);

    let mut app = MockApp::new();
    setup(&mut app);
    app.config.set(XPATH_FILE, path.to_str().unwrap());

    let mut host = MockHost::new();
    let nodes = app.directive("xpath").run(
        &invocation("//docstring"),
        &mut DirectiveContext {
            host: &mut host,
            config: &app.config,
        },
    )?;

    // Document order of matches, then line order of content per match.
    let texts: Vec<_> = nodes.iter().map(|n| n.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Parses input.",
            "",
            "See the *format* notes.",
            "Writes output.",
        ]
    );

    // Locators carry the fixture path and increment from each node's line.
    let file = path.to_str().unwrap();
    let sources: Vec<_> = nodes.iter().map(|n| n.source.as_str()).collect();
    assert_eq!(
        sources,
        vec![
            format!("{}:3:<xpath>", file),
            format!("{}:4:<xpath>", file),
            format!("{}:5:<xpath>", file),
            format!("{}:8:<xpath>", file),
        ]
    );

    assert_eq!(host.dependencies, vec![path]);
    assert!(host.errors.is_empty());
    Ok(())
}

#[test]
fn test_unset_default_without_option_is_a_configuration_error() {
    let mut app = MockApp::new();
    setup(&mut app);

    let mut host = MockHost::new();
    let err = app
        .directive("xpath")
        .run(
            &invocation("//docstring"),
            &mut DirectiveContext {
                host: &mut host,
                config: &app.config,
            },
        )
        .unwrap_err();

    assert!(matches!(err, DirectiveError::Config(_)));
    assert!(err.to_string().contains("xpath_file"));
}

#[test]
fn test_file_option_wins_without_touching_the_default() -> TestResult {
    let dir = tempfile::tempdir()?;
    let default = write_xml(&dir, "default.xml", "<r><v>from default</v></r>");
    let other = write_xml(&dir, "other.xml", "<r><v>from option</v></r>");

    let mut app = MockApp::new();
    setup(&mut app);
    app.config.set(XPATH_FILE, default.to_str().unwrap());

    let mut host = MockHost::new();
    let with_option = invocation("//v").option("file", other.to_str().unwrap());
    let nodes = app.directive("xpath").run(
        &with_option,
        &mut DirectiveContext {
            host: &mut host,
            config: &app.config,
        },
    )?;
    assert_eq!(nodes[0].text, "from option");

    let nodes = app.directive("xpath").run(
        &invocation("//v"),
        &mut DirectiveContext {
            host: &mut host,
            config: &app.config,
        },
    )?;
    assert_eq!(nodes[0].text, "from default");
    Ok(())
}

#[test]
fn test_query_failure_reports_once_and_build_goes_on() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_xml(&dir, "broken.xml", "<project><class></project>");

    let mut app = MockApp::new();
    setup(&mut app);
    app.config.set(XPATH_FILE, path.to_str().unwrap());

    let mut host = MockHost::new();
    let nodes = app.directive("xpath").run(
        &invocation("//docstring"),
        &mut DirectiveContext {
            host: &mut host,
            config: &app.config,
        },
    )?;

    assert!(nodes.is_empty());
    assert_eq!(host.errors.len(), 1);
    assert!(host.errors[0].contains("api.rst:42"));
    assert!(host.errors[0].contains("//docstring"));
    Ok(())
}
