use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, stderr, stdout};

const GREETING: &str = r#"{namespace app}
{template .greet}
  {msg desc="greeting"}Hello, {$name}!{/msg}
{/template}
"#;

#[test]
fn test_output_file() -> Result<()> {
    let test = CliTest::with_file("templates/app.soy", GREETING)?;

    let to_stdout = test.extract(&["templates"])?;
    let to_file = test.extract(&["templates", "-o", "messages.pot"])?;
    assert!(to_file.status.success(), "{}", stderr(&to_file));
    assert_eq!(stdout(&to_file), "");
    assert_eq!(test.read_file("messages.pot")?, stdout(&to_stdout));

    Ok(())
}

#[test]
fn test_json_format() -> Result<()> {
    let test = CliTest::with_file("templates/app.soy", GREETING)?;

    let output = test.extract(&["--format", "json", "templates"])?;
    assert!(output.status.success(), "{}", stderr(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let entry = &value["entries"][0];
    assert_eq!(value["header"]["project"], "PACKAGE VERSION");
    assert_eq!(entry["msgid"], "Hello, {NAME}!");
    assert_eq!(entry["extractedComment"], "greeting");
    assert_eq!(entry["references"][0], "templates/app.soy:3");
    assert!(entry["references"][1].as_str().unwrap_or_default().starts_with("id="));

    Ok(())
}

#[test]
fn test_project_header() -> Result<()> {
    let test = CliTest::with_file("app.soy", GREETING)?;

    let output = test.extract(&["--project", "shop 1.4", "app.soy"])?;
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("\"Project-Id-Version: shop 1.4\\n\"\n"));

    Ok(())
}

#[test]
fn test_extension_option() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("templates/app.tpl", GREETING)?;
    test.write_file("templates/broken.soy", "{namespace")?;

    let output = test.extract(&["--extension", "tpl", "templates"])?;
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("#: templates/app.tpl:3\n"));

    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".xgettext-soy.json",
        r#"{
          "ignores": ["**/generated/**"],
          "project": "configured 2.0",
          "format": "json"
      }"#,
    )?;
    test.write_file("templates/app.soy", GREETING)?;
    test.write_file("templates/generated/broken.soy", "{namespace")?;

    let output = test.extract(&["templates"])?;
    assert!(output.status.success(), "{}", stderr(&output));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["header"]["project"], "configured 2.0");
    assert_eq!(value["entries"].as_array().map(Vec::len), Some(1));

    // Arguments win over the config file.
    let output = test.extract(&["--format", "po", "templates"])?;
    assert!(stdout(&output).starts_with("msgid \"\"\n"));

    Ok(())
}

#[test]
fn test_invalid_config_file() -> Result<()> {
    let test = CliTest::with_file("app.soy", GREETING)?;
    test.write_file(".xgettext-soy.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let output = test.extract(&["app.soy"])?;
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).contains("Invalid glob pattern in 'ignores'"));

    Ok(())
}

#[test]
fn test_verbose_notes() -> Result<()> {
    let test = CliTest::with_file("templates/app.soy", GREETING)?;

    let output = test.extract(&["-v", "templates"])?;
    assert!(output.status.success(), "{}", stderr(&output));
    let notes = stderr(&output);
    assert!(notes.contains("note: found 1 template file(s)"));
    assert!(notes.contains("note: registered 1 template(s)"));
    assert!(notes.contains("note: extracted 1 message(s)"));

    Ok(())
}
